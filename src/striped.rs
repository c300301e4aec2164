//! Striped-lock variant: one of a fixed-size array of cache-line-padded
//! locks guards each bucket, chosen by `bucket_index mod num_locks`.
//!
//! Each operation acquires at most one bucket lock and never holds two
//! locks at once (resize_insert below locks only the destination bucket in
//! the new generation), so the variant is deadlock-free by construction.

use parking_lot::Mutex;
use std::sync::atomic::Ordering;

use crate::hash::bucket_for;
use crate::node::Node;
use crate::table::{BucketArray, Table};

/// A single bucket's mutex, padded to its own cache line so that adjacent
/// stripes don't false-share under contention.
#[repr(align(64))]
pub(crate) struct PaddedLock(Mutex<()>);

impl PaddedLock {
    pub(crate) fn new() -> Self {
        PaddedLock(Mutex::new(()))
    }
}

fn lock_for(generation: &BucketArray, bucket_index: usize) -> &PaddedLock {
    let locks = generation.locks.as_ref().expect("striped variant always has a lock array");
    &locks[bucket_index % locks.len()]
}

pub(crate) fn lookup(table: &Table, key: u64) -> u64 {
    let generation = table.current();
    let bucket_index = bucket_for(key, generation.num_buckets());
    let _guard = lock_for(generation, bucket_index).0.lock();
    generation.buckets[bucket_index].find(key, Ordering::Relaxed)
}

pub(crate) fn insert(table: &Table, key: u64, value: u64) {
    let generation = table.current();
    let bucket_index = bucket_for(key, generation.num_buckets());
    let bucket = &generation.buckets[bucket_index];
    let guard = lock_for(generation, bucket_index).0.lock();

    let mut depth = 0usize;
    let mut cur = bucket.head.load(Ordering::Relaxed);
    while !cur.is_null() {
        // SAFETY: mutation of this chain only ever happens under this same
        // lock, which we hold.
        let node = unsafe { &*cur };
        if node.key == key {
            node.value.store(value, Ordering::Relaxed);
            return;
        }
        depth += 1;
        cur = node.next.load(Ordering::Relaxed);
    }

    let old_head = bucket.head.load(Ordering::Relaxed);
    let new_node = Node::alloc(key, value, old_head);
    bucket.head.store(new_node, Ordering::Relaxed);
    depth += 1;
    drop(guard);

    table.record_new_node(depth);
}

/// Bulk insert used only by the resize coordinator while rehashing: locks
/// the destination bucket in `new_generation` and prepends, with no
/// uniqueness check (the old table already satisfied I1).
pub(crate) fn resize_insert(new_generation: &BucketArray, key: u64, value: u64) {
    let bucket_index = bucket_for(key, new_generation.num_buckets());
    let bucket = &new_generation.buckets[bucket_index];
    let _guard = lock_for(new_generation, bucket_index).0.lock();
    let old_head = bucket.head.load(Ordering::Relaxed);
    let new_node = Node::alloc(key, value, old_head);
    bucket.head.store(new_node, Ordering::Relaxed);
}
