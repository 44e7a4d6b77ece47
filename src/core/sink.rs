// src/core/sink.rs

use tracing::{debug, error, info, trace, warn, Level};

/// Destination for the run's log lines.
///
/// Implementations are shared by every worker thread and must accept
/// concurrent appends.
pub trait LogSink: Send + Sync {
    fn append(&self, level: Level, line: &str);
}

/// Forwards lines to the global `tracing` subscriber set up in `logging`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn append(&self, level: Level, line: &str) {
        // `tracing` needs the level at compile time.
        if level == Level::ERROR {
            error!("{line}");
        } else if level == Level::WARN {
            warn!("{line}");
        } else if level == Level::INFO {
            info!("{line}");
        } else if level == Level::DEBUG {
            debug!("{line}");
        } else {
            trace!("{line}");
        }
    }
}
