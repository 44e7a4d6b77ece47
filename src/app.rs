// src/app.rs

use tracing::{error, info};

use crate::core::errors::ProbeError;
use crate::core::models::{ScanConfig, ScanReport, TargetDescriptor};
use crate::core::scanner::dispatch::{insecure_tls_connector, Dispatch, NetDispatcher};
use crate::core::scanner::jobs::job_count;
use crate::core::scanner::run_scan;
use crate::core::scanner::targets::{load_paths, load_targets};
use crate::core::sink::LogSink;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything needed to start a run: the two input files and the engine
/// configuration.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub domain_file: PathBuf,
    pub path_file: PathBuf,
    pub config: ScanConfig,
}

/// A run whose input has been loaded and validated.
///
/// Loading is the only fallible step that can stop the program; once an `App`
/// exists, running it always ends with a report.
pub struct App {
    config: ScanConfig,
    targets: Vec<TargetDescriptor>,
    paths: Vec<Arc<str>>,
    sink: Arc<dyn LogSink>,
}

impl App {
    /// Reads and validates both input files. Any missing file or malformed
    /// domain line fails here, before a single connection is made.
    pub fn load(settings: ScanSettings, sink: Arc<dyn LogSink>) -> Result<Self, ProbeError> {
        let targets = load_targets(&settings.domain_file).inspect_err(|e| error!(error = %e, "Domain file rejected."))?;
        let paths = load_paths(&settings.path_file)?;
        info!(
            targets = targets.len(),
            paths = paths.len(),
            domain_file = %settings.domain_file.display(),
            path_file = %settings.path_file.display(),
            "Input loaded."
        );
        Ok(Self {
            config: settings.config,
            targets,
            paths,
            sink,
        })
    }

    pub fn job_count(&self) -> usize {
        job_count(&self.targets, &self.paths)
    }

    /// Runs the scan over real sockets.
    pub fn run(self) -> Result<ScanReport, ProbeError> {
        let dispatcher = Arc::new(NetDispatcher::from_config(&self.config));
        self.run_with(dispatcher)
    }

    /// Runs the scan with a caller-supplied dispatcher.
    pub fn run_with<D>(self, dispatcher: Arc<D>) -> Result<ScanReport, ProbeError>
    where
        D: Dispatch + 'static,
    {
        let tls = Arc::new(insecure_tls_connector()?);
        run_scan(&self.config, &self.targets, &self.paths, tls, dispatcher, self.sink)
    }
}
