// src/core/errors.rs

use crate::core::models::JobState;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a run before (or instead of) dispatching.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("cannot read input file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Wrong format of the {} (line {line}): {reason}", file.display())]
    Format {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] io::Error),

    #[error("job queue closed before all jobs were enqueued")]
    QueueClosed,
}

/// A per-job failure. Logged and contained inside the worker loop.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{address}: cannot resolve: {source}")]
    Resolve {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("{address}: dial failed: {source}")]
    Dial {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("{address}: TLS handshake failed: {reason}")]
    Handshake { address: String, reason: String },

    #[error("{address}: write failed: {source}")]
    Write {
        address: String,
        #[source]
        source: io::Error,
    },
}

impl TransportError {
    pub fn address(&self) -> &str {
        match self {
            TransportError::Resolve { address, .. }
            | TransportError::Dial { address, .. }
            | TransportError::Handshake { address, .. }
            | TransportError::Write { address, .. } => address,
        }
    }

    /// Terminal state of the job that produced this error.
    pub fn state(&self) -> JobState {
        match self {
            TransportError::Write { .. } => JobState::WriteFailed,
            _ => JobState::DialFailed,
        }
    }
}
