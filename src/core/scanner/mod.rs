// src/core/scanner/mod.rs

// Public interface of the `scanner` module: input parsing, job expansion,
// the worker pool and the socket dispatcher.
pub mod dispatch;
pub mod jobs;
pub mod pool;
pub mod request;
pub mod targets;

use tracing::{info, Level};

use crate::core::errors::ProbeError;
use crate::core::models::{JobParams, ScanConfig, ScanReport, TargetDescriptor};
use crate::core::sink::LogSink;
use self::dispatch::Dispatch;
use self::jobs::{generate_jobs, job_count};
use self::pool::WorkerPool;
use native_tls::TlsConnector;
use std::sync::Arc;
use std::time::Instant;

/// Runs one full probing pass and blocks until it is over.
///
/// Workers are started first, then every job is pushed through the bounded
/// queue in generation order; the queue is closed after the last push and the
/// call returns once every worker has drained it. Per-job transport failures
/// only show up in `sink` and in the report counters, so this returns `Ok`
/// however many jobs failed.
///
/// # Arguments
///
/// * `config` - Worker count, queue size and request parameters.
/// * `targets` / `paths` - Parsed input, shared read-only by every job.
/// * `tls` - Connector used by jobs on the TLS port.
/// * `dispatcher` - Performs the actual delivery of each job.
/// * `sink` - Receives the start, failure and completion lines.
pub fn run_scan<D>(
    config: &ScanConfig,
    targets: &[TargetDescriptor],
    paths: &[Arc<str>],
    tls: Arc<TlsConnector>,
    dispatcher: Arc<D>,
    sink: Arc<dyn LogSink>,
) -> Result<ScanReport, ProbeError>
where
    D: Dispatch + 'static,
{
    let started = Instant::now();
    let total = job_count(targets, paths);
    let mut pool = WorkerPool::spawn(config.threads, config.queue_capacity, dispatcher, sink.clone())?;

    sink.append(
        Level::INFO,
        &format!(
            "Scan has been started... ({total} jobs, {} targets, {} paths, {} workers)",
            targets.len(),
            paths.len(),
            pool.workers()
        ),
    );

    let params = JobParams::new(config, tls);
    for job in generate_jobs(targets, paths, &params) {
        pool.submit(job)?;
    }
    info!(enqueued = total, "All jobs queued, closing the queue.");

    let mut report = pool.finish();
    report.elapsed = started.elapsed();

    sink.append(
        Level::INFO,
        &format!(
            "Scan finished successfully! {} attempted, {} sent, {} dial failures, {} write failures in {:.2}s",
            report.attempted,
            report.sent,
            report.dial_failures,
            report.write_failures,
            report.elapsed.as_secs_f64()
        ),
    );
    Ok(report)
}
