//! The table object: owns the bucket array, the optional lock array, and
//! the atomics that both variants and the resize coordinator share.
//!
//! Resize replaces `inner` with a freshly allocated, larger generation;
//! `Table` itself is never replaced, which is the literal sense in which
//! `resize` "updates the handle in place" (see DESIGN.md for why a plain
//! `&mut Table` can't work across a thread team and this atomic-pointer
//! swap is the idiomatic stand-in).

use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, AtomicU64, Ordering};

use crate::config::{Config, Variant};
use crate::node::Bucket;
use crate::striped::PaddedLock;
use crate::{lockfree, striped, INVALID_KEY, INVALID_VALUE};

/// One generation of the table's storage: a bucket array and, for the
/// striped variant, the lock array that guards it.
pub(crate) struct BucketArray {
    pub(crate) buckets: Box<[Bucket]>,
    pub(crate) locks: Option<Box<[PaddedLock]>>,
}

impl BucketArray {
    pub(crate) fn new(num_buckets: usize, num_locks: usize, variant: Variant) -> Self {
        assert!(num_buckets >= 1, "num_buckets must be at least 1");
        let buckets = (0..num_buckets).map(|_| Bucket::default()).collect();
        let locks = match variant {
            Variant::Striped => {
                let num_locks = num_locks.max(1);
                Some((0..num_locks).map(|_| PaddedLock::new()).collect())
            }
            Variant::LockFree => None,
        };
        BucketArray { buckets, locks }
    }

    pub(crate) fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn num_locks(&self) -> usize {
        self.locks.as_ref().map_or(0, |l| l.len())
    }

    /// Frees every chain reachable from this generation. Only called once
    /// the generation is unreachable and quiescent (table drop, or the old
    /// generation after a completed resize).
    pub(crate) fn free_all_chains(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.free_chain();
        }
    }
}

/// A concurrent, dynamically resizable bucketized hash map from `u64` to
/// `u64`. See the crate docs for the external contract; [`crate::striped`]
/// and [`crate::lockfree`] implement the two synchronisation disciplines.
pub struct Table {
    inner: AtomicPtr<BucketArray>,
    num_items: AtomicU64,
    resize_needed: AtomicBool,
    config: Config,
}

impl Table {
    pub(crate) fn current(&self) -> &BucketArray {
        // SAFETY: `inner` always points at a live, fully initialised
        // `BucketArray` until `Table` itself is dropped; old generations are
        // only freed after the driver has quiesced all other threads.
        unsafe { &*self.inner.load(Ordering::Acquire) }
    }

    pub(crate) fn config(&self) -> Config {
        self.config
    }

    pub(crate) fn resize_needed_flag(&self) -> &AtomicBool {
        &self.resize_needed
    }

    pub(crate) fn num_items_counter(&self) -> &AtomicU64 {
        &self.num_items
    }

    /// Whether a worker has observed a chain deep enough to request a
    /// resize. Exposed so a driver can poll it between task batches.
    pub fn resize_needed(&self) -> bool {
        self.resize_needed.load(Ordering::Relaxed)
    }

    /// Number of buckets in the table's current generation.
    pub fn num_buckets(&self) -> usize {
        self.current().num_buckets()
    }

    pub(crate) fn record_new_node(&self, depth: usize) {
        if !self.config.speed_test {
            self.num_items.fetch_add(1, Ordering::Relaxed);
        }
        if self.config.resize_enabled && depth >= crate::MAX_CHAIN_SIZE {
            if !self.resize_needed.load(Ordering::Relaxed) {
                self.resize_needed.store(true, Ordering::Relaxed);
            }
        }
    }

    /// Number of entries the table has acknowledged via `insert`. Only
    /// meaningful when the table was created without speed-test mode.
    pub fn len(&self) -> u64 {
        self.num_items.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swaps in a newly rehashed generation, returning the previous one so
    /// the resize coordinator can free it once quiescence is certain.
    ///
    /// # Safety
    /// Must only be called from the single designated resize coordinator,
    /// after every worker thread has stopped issuing lookups/inserts.
    pub(crate) unsafe fn swap_generation(&self, new: Box<BucketArray>) -> Box<BucketArray> {
        let new_ptr = Box::into_raw(new);
        let old_ptr = self.inner.swap(new_ptr, Ordering::Release);
        Box::from_raw(old_ptr)
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        let ptr = *self.inner.get_mut();
        if !ptr.is_null() {
            // SAFETY: `Table` is being dropped, so nothing else can hold a
            // reference into this generation any more.
            let mut generation = unsafe { Box::from_raw(ptr) };
            generation.free_all_chains();
            *self.inner.get_mut() = ptr::null_mut();
        }
    }
}

/// Allocates a table, zeroing its buckets and (striped variant only)
/// initialising its lock array. `num_locks` is ignored for the lock-free
/// variant.
pub fn create_table(num_buckets: usize, num_locks: usize, config: Config) -> Table {
    let generation = BucketArray::new(num_buckets, num_locks, config.variant);
    Table {
        inner: AtomicPtr::new(Box::into_raw(Box::new(generation))),
        num_items: AtomicU64::new(0),
        resize_needed: AtomicBool::new(false),
        config,
    }
}

/// Frees all nodes, buckets and locks owned by `table`.
pub fn destroy_table(table: Table) {
    drop(table);
}

/// Returns the value stored under `key`, or [`INVALID_VALUE`] if absent.
/// `key == INVALID_KEY` is rejected immediately, per the reserved-sentinel
/// rule.
pub fn lookup(table: &Table, key: u64) -> u64 {
    if key == INVALID_KEY {
        return INVALID_VALUE;
    }
    match table.config().variant {
        Variant::Striped => striped::lookup(table, key),
        Variant::LockFree => lockfree::lookup(table, key),
    }
}

/// Inserts `(key, value)`, overwriting any existing value for `key`.
/// Silently does nothing if `key == INVALID_KEY` or `value == INVALID_VALUE`.
pub fn insert(table: &Table, key: u64, value: u64) {
    if key == INVALID_KEY || value == INVALID_VALUE {
        return;
    }
    match table.config().variant {
        Variant::Striped => striped::insert(table, key, value),
        Variant::LockFree => lockfree::insert(table, key, value),
    }
}
