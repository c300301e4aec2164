//! Metric aggregation, disabled entirely in speed-test mode.
//!
//! Each driver task accumulates counts thread-locally in a [`LocalMetrics`]
//! and folds them into the shared [`Metrics`] once, at task end, instead of
//! contending on the atomics per-operation.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalMetrics {
    pub total_ops: u64,
    pub total_lookups: u64,
    pub successful_lookups: u64,
    pub missed_lookups: u64,
    pub total_inserts: u64,
    pub mismatches: u64,
}

impl LocalMetrics {
    pub fn record_lookup(&mut self, found: u64, expected_in_input: u64) {
        self.total_ops += 1;
        self.total_lookups += 1;
        if found == crate::INVALID_VALUE {
            self.missed_lookups += 1;
        } else {
            self.successful_lookups += 1;
            if found != expected_in_input {
                self.mismatches += 1;
            }
        }
    }

    pub fn record_insert(&mut self) {
        self.total_ops += 1;
        self.total_inserts += 1;
    }
}

#[derive(Debug, Default)]
pub struct Metrics {
    pub total_ops: AtomicU64,
    pub total_lookups: AtomicU64,
    pub successful_lookups: AtomicU64,
    pub missed_lookups: AtomicU64,
    pub total_inserts: AtomicU64,
    pub mismatches: AtomicU64,
}

impl Metrics {
    pub fn merge(&self, local: &LocalMetrics) {
        self.total_ops.fetch_add(local.total_ops, Ordering::Relaxed);
        self.total_lookups.fetch_add(local.total_lookups, Ordering::Relaxed);
        self.successful_lookups.fetch_add(local.successful_lookups, Ordering::Relaxed);
        self.missed_lookups.fetch_add(local.missed_lookups, Ordering::Relaxed);
        self.total_inserts.fetch_add(local.total_inserts, Ordering::Relaxed);
        self.mismatches.fetch_add(local.mismatches, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_ops: self.total_ops.load(Ordering::Relaxed),
            total_lookups: self.total_lookups.load(Ordering::Relaxed),
            successful_lookups: self.successful_lookups.load(Ordering::Relaxed),
            missed_lookups: self.missed_lookups.load(Ordering::Relaxed),
            total_inserts: self.total_inserts.load(Ordering::Relaxed),
            mismatches: self.mismatches.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub total_ops: u64,
    pub total_lookups: u64,
    pub successful_lookups: u64,
    pub missed_lookups: u64,
    pub total_inserts: u64,
    pub mismatches: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total ops:            {}", self.total_ops)?;
        writeln!(f, "total lookups:        {}", self.total_lookups)?;
        writeln!(f, "successful lookups:   {}", self.successful_lookups)?;
        writeln!(f, "missed lookups:       {}", self.missed_lookups)?;
        writeln!(f, "total inserts:        {}", self.total_inserts)?;
        write!(f, "key/value mismatches: {}", self.mismatches)
    }
}
