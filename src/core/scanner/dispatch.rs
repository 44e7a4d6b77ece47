// src/core/scanner/dispatch.rs

use tracing::{debug, trace};

use crate::core::errors::{ProbeError, TransportError};
use crate::core::models::{Job, JobState, ScanConfig, Transport};
use crate::core::scanner::request::ProbeRequest;
use crossbeam::channel::{self, RecvTimeoutError};
use native_tls::TlsConnector;
use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

/// Performs a single delivery attempt for a job.
///
/// Called synchronously from a worker thread; blocking is expected.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, job: &Job) -> Result<(), TransportError>;
}

/// Builds the connector shared by every TLS job. Probe targets are arbitrary
/// hosts, often with self-signed or mismatched certificates, so neither the
/// chain nor the hostname is verified.
pub fn insecure_tls_connector() -> Result<TlsConnector, ProbeError> {
    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()?;
    Ok(connector)
}

/// Fire-and-forget dispatcher over real sockets: dial, write the request,
/// linger, close. The response is never read.
#[derive(Debug, Clone, Copy)]
pub struct NetDispatcher {
    dial_timeout: Duration,
    linger: Duration,
}

impl NetDispatcher {
    pub fn new(dial_timeout: Duration, linger: Duration) -> Self {
        Self {
            dial_timeout,
            linger,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.dial_timeout(), config.linger())
    }

    /// Resolves `address` and connects to the first reachable socket address.
    /// The dial timeout is one deadline covering resolution and every connect
    /// attempt.
    fn dial(&self, address: &str) -> Result<TcpStream, TransportError> {
        let deadline = Instant::now() + self.dial_timeout;
        let candidates = resolve(address, deadline)?;
        connect_any(&candidates, deadline, address)
    }

    /// Writes the whole payload, then holds the connection for the linger
    /// interval so the remote end can start processing before it sees EOF.
    fn send<S: Write>(&self, stream: &mut S, payload: &[u8], address: &str) -> Result<(), TransportError> {
        stream
            .write_all(payload)
            .and_then(|_| stream.flush())
            .map_err(|source| TransportError::Write {
                address: address.to_string(),
                source,
            })?;
        debug!(address, state = %JobState::RequestSent, bytes = payload.len());
        thread::sleep(self.linger);
        Ok(())
    }
}

impl Default for NetDispatcher {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl Dispatch for NetDispatcher {
    fn dispatch(&self, job: &Job) -> Result<(), TransportError> {
        let address = job.address();
        trace!(address = %address, state = %JobState::Dialing, transport = %job.transport());
        let stream = self.dial(&address)?;
        debug!(address = %address, state = %JobState::Connected);
        self.deliver(job, stream, &address)
    }
}

impl NetDispatcher {
    /// Sends the job's request over an already connected socket, wrapping it
    /// in TLS first when the job's transport asks for it.
    pub(crate) fn deliver(&self, job: &Job, mut stream: TcpStream, address: &str) -> Result<(), TransportError> {
        let payload = ProbeRequest::for_job(job).to_bytes();

        match job.transport() {
            Transport::Tcp => {
                self.send(&mut stream, &payload, address)?;
            }
            Transport::Tls => {
                // The handshake counts as part of the dial, so it gets the same bound.
                let bound = Some(self.dial_timeout);
                stream
                    .set_read_timeout(bound)
                    .and_then(|_| stream.set_write_timeout(bound))
                    .map_err(|e| TransportError::Handshake {
                        address: address.to_string(),
                        reason: e.to_string(),
                    })?;

                let mut tls = job
                    .tls()
                    .connect(job.domain(), stream)
                    .map_err(|e| TransportError::Handshake {
                        address: address.to_string(),
                        reason: e.to_string(),
                    })?;
                self.send(&mut tls, &payload, address)?;
                let _ = tls.shutdown();
            }
        }

        trace!(address, state = %JobState::Closed);
        Ok(())
    }
}

/// Shortest slice of the deadline a single connect attempt gets while more
/// than one candidate is left.
const MIN_ATTEMPT: Duration = Duration::from_secs(2);

/// Resolves `address` before `deadline`. Literal socket addresses skip the
/// resolver; names are looked up on a helper thread so a stalled lookup
/// cannot outlive the deadline.
fn resolve(address: &str, deadline: Instant) -> Result<Vec<SocketAddr>, TransportError> {
    if let Ok(addr) = address.parse::<SocketAddr>() {
        return Ok(vec![addr]);
    }

    let resolve_error = |source: io::Error| TransportError::Resolve {
        address: address.to_string(),
        source,
    };

    let (tx, rx) = channel::bounded(1);
    let name = address.to_string();
    thread::Builder::new()
        .name("probe-resolver".into())
        .spawn(move || {
            let found = name.to_socket_addrs().map(|addrs| addrs.collect::<Vec<_>>());
            // The dialer may have given up already.
            let _ = tx.send(found);
        })
        .map_err(resolve_error)?;

    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(found) => found.map_err(resolve_error),
        Err(RecvTimeoutError::Timeout) => Err(resolve_error(io::Error::new(
            io::ErrorKind::TimedOut,
            "name resolution timed out",
        ))),
        Err(RecvTimeoutError::Disconnected) => Err(resolve_error(io::Error::other("resolver thread exited"))),
    }
}

/// Tries `candidates` in order until one connects or `deadline` passes.
fn connect_any(candidates: &[SocketAddr], deadline: Instant, address: &str) -> Result<TcpStream, TransportError> {
    if candidates.is_empty() {
        return Err(TransportError::Resolve {
            address: address.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
        });
    }

    let mut last_error = None;
    for (index, addr) in candidates.iter().enumerate() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            last_error = Some(io::Error::new(io::ErrorKind::TimedOut, "dial timeout elapsed"));
            break;
        }
        let timeout = attempt_timeout(remaining, candidates.len() - index);
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                trace!(%addr, error = %e, "Connect attempt failed.");
                last_error = Some(e);
            }
        }
    }

    Err(TransportError::Dial {
        address: address.to_string(),
        source: last_error.unwrap_or_else(|| io::Error::from(io::ErrorKind::TimedOut)),
    })
}

/// Splits what is left of the deadline evenly over the remaining candidates,
/// never going below `MIN_ATTEMPT` unless the deadline itself is shorter.
fn attempt_timeout(remaining: Duration, left: usize) -> Duration {
    let share = remaining / left.max(1) as u32;
    if share < MIN_ATTEMPT {
        remaining.min(MIN_ATTEMPT)
    } else {
        share
    }
}
