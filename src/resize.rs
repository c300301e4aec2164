//! The collective resize: doubles the bucket count (and, for the striped
//! variant, the lock count) and rehashes every live entry into the new
//! generation.
//!
//! The algorithm is a stop-the-world rehash, not an incremental
//! split-ordered scheme: it is only ever invoked by [`crate::driver`]
//! between task batches, once every worker has drained its outstanding
//! lookups/inserts, so there is no operation racing the rehash itself. The
//! one piece of genuine concurrency during `resize` is threads within the
//! rehash racing each other's CAS/lock on a shared destination bucket in
//! the new generation, which both variants' `resize_insert` already
//! tolerates.
//!
//! `rayon`'s work-stealing `par_iter` over old bucket indices is this
//! crate's stand-in for the source design's "barrier, then static
//! work-sharing partition of buckets across threads": each old bucket is
//! independent rehash work, and rayon schedules it across the pool the
//! driver already owns instead of hand-rolling a partition-and-barrier
//! loop. See DESIGN.md for the full rationale.

use rayon::prelude::*;
use std::sync::atomic::Ordering;

use crate::config::Variant;
use crate::table::{BucketArray, Table};
use crate::{lockfree, striped};

/// Doubles `table`'s bucket (and lock) count and rehashes every entry into
/// the new generation, then atomically swaps it in and frees the old one.
///
/// Must only be called once the caller has guaranteed quiescence: no other
/// thread may be inside [`crate::lookup`] or [`crate::insert`] on `table`
/// for the duration of this call. [`crate::driver`] is the only caller that
/// should ever invoke this directly.
pub fn resize(table: &Table, pool: &rayon::ThreadPool) {
    let variant = table.config().variant;
    let old_num_buckets = table.current().num_buckets();
    let old_num_locks = table.current().num_locks();
    let new_num_buckets = old_num_buckets * 2;
    let new_num_locks = if old_num_locks == 0 { 0 } else { old_num_locks * 2 };

    let new_generation = Box::new(BucketArray::new(new_num_buckets, new_num_locks, variant));
    // num_items is copied verbatim; resize never re-counts (DESIGN.md).
    let carried_items = table.num_items_counter().load(Ordering::Relaxed);

    pool.install(|| {
        (0..old_num_buckets).into_par_iter().for_each(|bucket_index| {
            rehash_bucket(table, bucket_index, &new_generation, variant);
        });
    });

    // SAFETY: caller guarantees no in-flight lookup/insert on `table`.
    let mut old_generation = unsafe { table.swap_generation(new_generation) };
    table.num_items_counter().store(carried_items, Ordering::Relaxed);
    table.resize_needed_flag().store(false, Ordering::Release);
    // The rehash above copied every node's payload into the new generation;
    // the old chains themselves are now unreachable and must be freed
    // explicitly, since `BucketArray` has no `Drop` impl of its own.
    old_generation.free_all_chains();
}

fn rehash_bucket(table: &Table, bucket_index: usize, new_generation: &BucketArray, variant: Variant) {
    let old_generation = table.current();
    let mut cur = old_generation.buckets[bucket_index].head.load(Ordering::Relaxed);
    while !cur.is_null() {
        // SAFETY: the driver has quiesced all other threads, so these nodes
        // are only being read here, by the rehashing thread.
        let node = unsafe { &*cur };
        let key = node.key;
        let value = node.value.load(Ordering::Relaxed);
        match variant {
            Variant::Striped => striped::resize_insert(new_generation, key, value),
            Variant::LockFree => lockfree::resize_insert(new_generation, key, value),
        }
        cur = node.next.load(Ordering::Relaxed);
    }
}
