//! Lock-free variant: bucket chains are mutated with compare-and-swap on
//! the head pointer; per-slot value updates are plain atomic writes.
//!
//! Lookup never takes a lock and never retries: it is wait-free, bounded
//! only by the length of the chain it walks. Insert retries around a CAS
//! on the head, which is lock-free (some thread always makes progress)
//! but not wait-free under contention.

use std::sync::atomic::Ordering;

use crate::hash::bucket_for;
use crate::node::Node;
use crate::table::{BucketArray, Table};

pub(crate) fn lookup(table: &Table, key: u64) -> u64 {
    let generation = table.current();
    let bucket_index = bucket_for(key, generation.num_buckets());
    // Acquire synchronises with the Release CAS that published the chain;
    // once that hand-off is observed, every node's `next` is safe to read
    // with Relaxed because it is written exactly once, before publication
    // (invariant I4), never mutated again.
    generation.buckets[bucket_index].find(key, Ordering::Acquire)
}

pub(crate) fn insert(table: &Table, key: u64, value: u64) {
    let generation = table.current();
    let bucket_index = bucket_for(key, generation.num_buckets());
    let bucket = &generation.buckets[bucket_index];

    loop {
        let expected = bucket.head.load(Ordering::Acquire);

        let mut depth = 0usize;
        let mut cur = expected;
        let mut found = false;
        while !cur.is_null() {
            // SAFETY: nodes are never freed while reachable from a live
            // generation; see the module-level note on I4.
            let node = unsafe { &*cur };
            if node.key == key {
                node.value.store(value, Ordering::Relaxed);
                found = true;
                break;
            }
            depth += 1;
            cur = node.next.load(Ordering::Relaxed);
        }
        if found {
            return;
        }

        let new_node = Node::alloc(key, value, expected);
        match bucket.head.compare_exchange_weak(
            expected,
            new_node,
            Ordering::Release,
            Ordering::Relaxed,
        ) {
            Ok(_) => {
                depth += 1;
                table.record_new_node(depth);
                return;
            }
            Err(_) => {
                // SAFETY: `new_node` was never linked into any chain, so no
                // other thread can hold a reference to it.
                unsafe { Node::free_unpublished(new_node) };
            }
        }
    }
}

/// Bulk insert used only by the resize coordinator while rehashing:
/// CAS-prepend into the new generation with no uniqueness check. Safe
/// because the old table held at most one node per key (I1) and the
/// driver's quiescence barrier guarantees no concurrent inserter can cross
/// the resize boundary and introduce a duplicate.
pub(crate) fn resize_insert(new_generation: &BucketArray, key: u64, value: u64) {
    let bucket_index = bucket_for(key, new_generation.num_buckets());
    let bucket = &new_generation.buckets[bucket_index];
    loop {
        let expected = bucket.head.load(Ordering::Relaxed);
        let new_node = Node::alloc(key, value, expected);
        match bucket.head.compare_exchange_weak(
            expected,
            new_node,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return,
            Err(_) => unsafe { Node::free_unpublished(new_node) },
        }
    }
}
