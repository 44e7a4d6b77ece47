// src/core/mod.rs

/// Data structures shared across the prober: configuration, targets, jobs and
/// the run report.
pub mod models;

/// Error types for loading input and for individual deliveries.
pub mod errors;

/// The logging capability handed to the scan engine.
pub mod sink;

/// Input parsing, job generation, the worker pool and the socket dispatcher.
pub mod scanner;

/// Conversion of nmap XML reports into domain-file lines.
pub mod nmap;
