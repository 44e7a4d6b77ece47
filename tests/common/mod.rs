#![allow(dead_code)]

use oob_prober::{Dispatch, Job, LogSink, TransportError, Transport};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;
use tracing::Level;

/// What a dispatcher was asked to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub domain: String,
    pub port: String,
    pub path: String,
    pub transport: Transport,
}

impl Delivery {
    pub fn new(domain: &str, port: &str, path: &str, transport: Transport) -> Self {
        Self {
            domain: domain.to_string(),
            port: port.to_string(),
            path: path.to_string(),
            transport,
        }
    }
}

/// Records every job instead of touching the network. Ports listed in
/// `refuse` fail with a dial error.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub deliveries: Mutex<Vec<Delivery>>,
    pub refuse: Vec<String>,
}

impl RecordingDispatcher {
    pub fn refusing(ports: &[&str]) -> Self {
        Self {
            refuse: ports.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }
}

impl Dispatch for RecordingDispatcher {
    fn dispatch(&self, job: &Job) -> Result<(), TransportError> {
        self.deliveries.lock().unwrap().push(Delivery::new(
            job.domain(),
            job.port(),
            job.path(),
            job.transport(),
        ));
        if self.refuse.iter().any(|p| p == job.port()) {
            return Err(TransportError::Dial {
                address: job.address(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            });
        }
        Ok(())
    }
}

/// Keeps log lines in memory.
#[derive(Default)]
pub struct MemorySink {
    pub lines: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for MemorySink {
    fn append(&self, level: Level, line: &str) {
        self.lines.lock().unwrap().push((level, line.to_string()));
    }
}

/// Writes a domain file and a path file into a fresh temporary directory.
pub fn write_inputs(domains: &str, paths: &str) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let domain_file = dir.path().join("domains.txt");
    let path_file = dir.path().join("paths.txt");
    std::fs::File::create(&domain_file)
        .unwrap()
        .write_all(domains.as_bytes())
        .unwrap();
    std::fs::File::create(&path_file)
        .unwrap()
        .write_all(paths.as_bytes())
        .unwrap();
    (dir, domain_file, path_file)
}
