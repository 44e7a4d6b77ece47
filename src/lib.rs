//! oob-prober - fire-and-forget out-of-band interaction prober.
//!
//! For every target host, port and candidate path the prober opens a plain TCP
//! or TLS connection, writes a single HTTP request whose `Host` header names an
//! external collaborator listener, waits a few milliseconds and hangs up. Any
//! server-side fetch the request triggers shows up later at the collaborator.
//!
//! The engine is a bounded producer/consumer pipeline:
//! - `core::scanner::targets` parses the domain and path files
//! - `core::scanner::jobs` expands targets × ports × paths in a fixed order
//! - `core::scanner::pool` runs worker threads behind a bounded queue
//! - `core::scanner::dispatch` dials, writes, lingers and closes

pub mod app;
pub mod cli;
pub mod core;
pub mod logging;

pub use app::{App, ScanSettings};
pub use core::errors::{ProbeError, TransportError};
pub use core::models::{Job, ScanConfig, ScanReport, TargetDescriptor, Transport};
pub use core::scanner::dispatch::{Dispatch, NetDispatcher};
pub use core::sink::{LogSink, TracingSink};
