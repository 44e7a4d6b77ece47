// src/core/scanner/jobs.rs

use crate::core::models::{Job, JobParams, TargetDescriptor};
use std::sync::Arc;

/// Number of jobs `generate_jobs` yields: every port of every target, once
/// per path.
pub fn job_count(targets: &[TargetDescriptor], paths: &[Arc<str>]) -> usize {
    targets.iter().map(|t| t.ports.len()).sum::<usize>() * paths.len()
}

/// Expands targets × ports × paths into jobs.
///
/// Order is deterministic: targets in file order, then each target's ports in
/// file order, then paths in file order. Jobs are built lazily so the producer
/// only materialises what the queue can hold.
pub fn generate_jobs<'a>(
    targets: &'a [TargetDescriptor],
    paths: &'a [Arc<str>],
    params: &'a JobParams,
) -> impl Iterator<Item = Job> + 'a {
    targets.iter().flat_map(move |target| {
        target.ports.iter().flat_map(move |port| {
            paths.iter().map(move |path| {
                Job::new(target.domain.clone(), port.clone(), path.clone(), params)
            })
        })
    })
}
