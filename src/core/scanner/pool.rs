// src/core/scanner/pool.rs

use tracing::{debug, info, Level};

use crate::core::errors::{ProbeError, TransportError};
use crate::core::models::{Job, JobState, ScanReport};
use crate::core::scanner::dispatch::Dispatch;
use crate::core::sink::LogSink;
use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::sync::WaitGroup;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Per-run counters, updated by every worker.
#[derive(Debug, Default)]
struct PoolStats {
    attempted: AtomicUsize,
    sent: AtomicUsize,
    dial_failures: AtomicUsize,
    write_failures: AtomicUsize,
}

impl PoolStats {
    fn record(&self, outcome: &Result<(), TransportError>) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            Ok(()) => &self.sent,
            Err(e) if e.state() == JobState::WriteFailed => &self.write_failures,
            Err(_) => &self.dial_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fixed set of worker threads draining a bounded job queue.
///
/// `submit` blocks while the queue is full, which is what keeps the generator
/// from running ahead of the sockets. `finish` closes the queue and waits on
/// the completion barrier until every worker has drained it and exited.
pub struct WorkerPool {
    sender: Sender<Job>,
    done: WaitGroup,
    stats: Arc<PoolStats>,
    workers: usize,
    enqueued: usize,
}

impl WorkerPool {
    /// Spawns `threads` workers (at least one) sharing a queue of `capacity`.
    pub fn spawn<D>(
        threads: usize,
        capacity: usize,
        dispatcher: Arc<D>,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, ProbeError>
    where
        D: Dispatch + 'static,
    {
        let threads = threads.max(1);
        let (sender, receiver) = channel::bounded::<Job>(capacity.max(1));
        let done = WaitGroup::new();
        let stats = Arc::new(PoolStats::default());

        for id in 0..threads {
            let receiver = receiver.clone();
            let dispatcher = dispatcher.clone();
            let sink = sink.clone();
            let stats = stats.clone();
            let done = done.clone();
            thread::Builder::new()
                .name(format!("probe-worker-{id}"))
                .spawn(move || {
                    work(id, receiver, dispatcher.as_ref(), sink.as_ref(), &stats);
                    drop(done);
                })
                .map_err(ProbeError::WorkerSpawn)?;
        }

        info!(workers = threads, capacity, "Worker pool started.");
        Ok(Self {
            sender,
            done,
            stats,
            workers: threads,
            enqueued: 0,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Queues a job, blocking while the queue is full.
    pub fn submit(&mut self, job: Job) -> Result<(), ProbeError> {
        self.sender.send(job).map_err(|_| ProbeError::QueueClosed)?;
        self.enqueued += 1;
        Ok(())
    }

    /// Closes the queue and blocks until every worker has exited.
    pub fn finish(self) -> ScanReport {
        let WorkerPool {
            sender,
            done,
            stats,
            enqueued,
            ..
        } = self;

        // Dropping the only sender is the one-shot close signal.
        drop(sender);
        done.wait();
        debug!(enqueued, "All workers exited.");

        ScanReport {
            enqueued,
            attempted: stats.attempted.load(Ordering::Relaxed),
            sent: stats.sent.load(Ordering::Relaxed),
            dial_failures: stats.dial_failures.load(Ordering::Relaxed),
            write_failures: stats.write_failures.load(Ordering::Relaxed),
            ..ScanReport::default()
        }
    }
}

fn work(id: usize, jobs: Receiver<Job>, dispatcher: &dyn Dispatch, sink: &dyn LogSink, stats: &PoolStats) {
    debug!(worker = id, "Worker started.");
    // Ends once the queue is closed and drained.
    for job in jobs.iter() {
        let outcome = dispatcher.dispatch(&job);
        if let Err(e) = &outcome {
            sink.append(Level::WARN, &format!("{e} [{}, path {}]", e.state(), job.path()));
        }
        stats.record(&outcome);
    }
    debug!(worker = id, "Worker exiting.");
}
