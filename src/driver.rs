//! The driver loop: interleaves concurrent task dispatch with resize
//! quiescence.
//!
//! One producer -- the thread that calls [`run`] -- reads the input in
//! newline-aligned chunks and spawns a task per chunk onto the shared
//! `rayon` pool. `rayon::Scope::spawn`'s scope only returns once every task
//! it spawned has completed, which is exactly the source design's
//! "await task completion" drain: by construction no operation can straddle
//! the resize that follows. End-of-file is declared only when a read
//! yields zero bytes (see [`crate::input::ChunkReader`]), not inferred from
//! a partially filled task batch.

use std::io::Read;
use std::sync::atomic::Ordering;

use crate::input::{parse_line, ChunkReader, Record};
use crate::metrics::{LocalMetrics, Metrics};
use crate::table::Table;
use crate::{insert, lookup, resize};

/// Mirrors the source design's bound on outstanding tasks between resize
/// checks.
pub const DEFAULT_MAX_TASK_POOL: usize = 64;
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

pub struct DriverConfig {
    pub chunk_size: usize,
    pub max_task_pool: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig { chunk_size: DEFAULT_CHUNK_SIZE, max_task_pool: DEFAULT_MAX_TASK_POOL }
    }
}

/// Drains `reader` against `table`, dispatching `lookup`/`insert` tasks on
/// `pool` and performing collective resizes as they're triggered. Returns
/// the final metrics snapshot, or `None` if metrics are disabled
/// (speed-test mode).
pub fn run<R: Read>(
    table: &Table,
    reader: R,
    pool: &rayon::ThreadPool,
    config: DriverConfig,
) -> std::io::Result<Option<crate::metrics::MetricsSnapshot>> {
    let metrics = if table.config().speed_test { None } else { Some(Metrics::default()) };
    let mut chunk_reader = ChunkReader::new(reader, config.chunk_size);
    let mut end_of_file = false;

    while !end_of_file {
        pool.scope(|scope| {
            let mut dispatched = 0usize;
            while dispatched < config.max_task_pool.saturating_sub(1) {
                if table.resize_needed_flag().load(Ordering::Acquire) {
                    break;
                }
                let chunk = match chunk_reader.next_chunk() {
                    Ok(Some(chunk)) => chunk,
                    // A read returning zero bytes is the only end-of-file
                    // signal; a mid-stream I/O error is treated the same
                    // way rather than aborting the run.
                    Ok(None) | Err(_) => {
                        end_of_file = true;
                        break;
                    }
                };
                dispatched += 1;
                let metrics = metrics.as_ref();
                scope.spawn(move |_| process_chunk(table, &chunk, metrics));
            }
        });
        // `pool.scope` above only returns once every spawned task has
        // completed: the drain-then-barrier the source design performs
        // before touching `resize_needed` is implicit in that return.
        if table.resize_needed_flag().load(Ordering::Acquire) {
            tracing::info!(
                old_buckets = table.current().num_buckets(),
                "resize triggered, rehashing"
            );
            resize::resize(table, pool);
            tracing::info!(new_buckets = table.current().num_buckets(), "resize complete");
        }
    }

    Ok(metrics.map(|m| m.snapshot()))
}

fn process_chunk(table: &Table, chunk: &[u8], metrics: Option<&Metrics>) {
    let text = String::from_utf8_lossy(chunk);
    let mut local = LocalMetrics::default();
    for line in text.lines() {
        match parse_line(line) {
            Some(Record::Insert { key, value }) => {
                insert(table, key, value);
                local.record_insert();
            }
            Some(Record::Lookup { key, value }) => {
                let found = lookup(table, key);
                local.record_lookup(found, value);
            }
            None => {}
        }
    }
    if let Some(metrics) = metrics {
        metrics.merge(&local);
    }
}
