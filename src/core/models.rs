// src/core/models.rs

use native_tls::TlsConnector;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;

// --- Scan Configuration ---

/// Port token that is dispatched over TLS. Every other token goes over plain TCP.
pub const TLS_PORT: &str = "443";

/// Default capacity of the pending job queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8192;

/// Configuration settings for a probing run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of concurrent worker threads.
    pub threads: usize,

    /// HTTP method written on the request line.
    pub method: String,

    /// Value of the `Host` header, the listener that records interactions.
    pub collaborator_host: String,

    /// Capacity of the bounded job queue between the generator and the workers.
    pub queue_capacity: usize,

    /// Timeout in milliseconds for the TCP dial (and TLS handshake).
    pub dial_timeout_ms: u64,

    /// Pause in milliseconds between a successful write and closing the socket.
    pub linger_ms: u64,
}

impl ScanConfig {
    pub fn dial_timeout(&self) -> Duration {
        Duration::from_millis(self.dial_timeout_ms)
    }

    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threads: 5,
            method: "GET".to_string(),
            collaborator_host: String::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            dial_timeout_ms: 5_000,
            linger_ms: 10,
        }
    }
}

// --- Targets ---

/// A domain paired with the ports to probe on it.
///
/// Ports keep the exact token text from the domain file, in file order and
/// with duplicates, so that the dialed address matches what the operator wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub domain: Arc<str>,
    pub ports: Vec<Arc<str>>,
}

impl TargetDescriptor {
    pub fn new(domain: &str, ports: &[&str]) -> Self {
        Self {
            domain: Arc::from(domain),
            ports: ports.iter().map(|p| Arc::from(*p)).collect(),
        }
    }
}

// --- Jobs ---

/// Transport a job is dispatched over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Transport {
    Tcp,
    Tls,
}

impl Transport {
    /// Literal port rule: only the token `"443"` selects TLS. No probing of the
    /// remote end is done, so `"8443"` or `"0443"` stay on plain TCP.
    pub fn for_port(port: &str) -> Self {
        if port == TLS_PORT {
            Transport::Tls
        } else {
            Transport::Tcp
        }
    }
}

/// Lifecycle of a single dispatch attempt. Every path ends in `Closed` or a
/// failure state; nothing goes back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum JobState {
    Pending,
    Dialing,
    Connected,
    DialFailed,
    RequestSent,
    WriteFailed,
    Closed,
}

/// Parameters shared by every job of a run.
#[derive(Clone)]
pub struct JobParams {
    pub method: Arc<str>,
    pub collaborator_host: Arc<str>,
    pub tls: Arc<TlsConnector>,
}

impl JobParams {
    pub fn new(config: &ScanConfig, tls: Arc<TlsConnector>) -> Self {
        Self {
            method: Arc::from(config.method.as_str()),
            collaborator_host: Arc::from(config.collaborator_host.as_str()),
            tls,
        }
    }
}

/// One request to one `domain:port`. Built by the generator, consumed by a
/// single dispatch attempt and then dropped.
#[derive(Clone)]
pub struct Job {
    domain: Arc<str>,
    port: Arc<str>,
    path: Arc<str>,
    method: Arc<str>,
    collaborator_host: Arc<str>,
    transport: Transport,
    tls: Arc<TlsConnector>,
}

impl Job {
    pub fn new(domain: Arc<str>, port: Arc<str>, path: Arc<str>, params: &JobParams) -> Self {
        let transport = Transport::for_port(&port);
        Self {
            domain,
            port,
            path,
            method: params.method.clone(),
            collaborator_host: params.collaborator_host.clone(),
            transport,
            tls: params.tls.clone(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn collaborator_host(&self) -> &str {
        &self.collaborator_host
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn use_tls(&self) -> bool {
        self.transport == Transport::Tls
    }

    pub fn tls(&self) -> &TlsConnector {
        &self.tls
    }

    /// `domain:port` as it is handed to the resolver.
    pub fn address(&self) -> String {
        format!("{}:{}", self.domain, self.port)
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("domain", &self.domain)
            .field("port", &self.port)
            .field("path", &self.path)
            .field("method", &self.method)
            .field("collaborator_host", &self.collaborator_host)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

// --- Run Summary ---

/// Totals for a finished run. Counts only; no per-job results are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub enqueued: usize,
    pub attempted: usize,
    pub sent: usize,
    pub dial_failures: usize,
    pub write_failures: usize,
    pub elapsed: Duration,
}

impl ScanReport {
    pub fn failures(&self) -> usize {
        self.dial_failures + self.write_failures
    }
}
