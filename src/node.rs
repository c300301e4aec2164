//! Chain node and bucket head, shared by both synchronisation variants.
//!
//! A bucket is nothing more than the atomic head pointer of a singly linked
//! chain. `Node::next` is write-once from the moment it is published: chains
//! only ever grow at the head (invariant I4), which is what lets readers in
//! the lock-free variant walk a chain without taking any lock.

use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicU64, Ordering};

use crate::INVALID_VALUE;

pub(crate) struct Node {
    pub(crate) key: u64,
    pub(crate) value: AtomicU64,
    pub(crate) next: AtomicPtr<Node>,
}

impl Node {
    fn new_boxed(key: u64, value: u64, next: *mut Node) -> *mut Node {
        Box::into_raw(Box::new(Node { key, value: AtomicU64::new(value), next: AtomicPtr::new(next) }))
    }

    /// Allocates a detached node, not yet linked into any chain.
    pub(crate) fn alloc(key: u64, value: u64, next: *mut Node) -> *mut Node {
        Self::new_boxed(key, value, next)
    }

    /// Drops a node that was allocated but never published (lost a CAS race,
    /// or turned out to already be present under the bucket lock).
    ///
    /// # Safety
    /// `ptr` must be a live pointer produced by [`Node::alloc`] that has not
    /// been linked into a chain reachable from any other thread.
    pub(crate) unsafe fn free_unpublished(ptr: *mut Node) {
        drop(Box::from_raw(ptr));
    }
}

#[repr(align(64))]
pub(crate) struct Bucket {
    pub(crate) head: AtomicPtr<Node>,
}

impl Default for Bucket {
    fn default() -> Self {
        Bucket { head: AtomicPtr::new(ptr::null_mut()) }
    }
}

impl Bucket {
    /// Searches the chain for `key`, returning its value or `INVALID_VALUE`.
    /// Used by both variants: the lock-free reader takes no lock at all, and
    /// the striped reader calls this while holding the bucket's lock.
    #[inline]
    pub(crate) fn find(&self, key: u64, head_order: Ordering) -> u64 {
        let mut cur = self.head.load(head_order);
        while !cur.is_null() {
            // SAFETY: nodes are only unlinked wholesale during resize/destroy,
            // both of which require external quiescence before freeing.
            let node = unsafe { &*cur };
            if node.key == key {
                return node.value.load(Ordering::Relaxed);
            }
            cur = node.next.load(Ordering::Relaxed);
        }
        INVALID_VALUE
    }

    /// Frees every node in the chain. Only safe once nothing else can be
    /// walking or mutating the bucket (table destruction, or the old
    /// generation of a completed resize).
    pub(crate) fn free_chain(&mut self) {
        let mut cur = *self.head.get_mut();
        while !cur.is_null() {
            // SAFETY: caller guarantees exclusive access; see doc comment.
            let node = unsafe { Box::from_raw(cur) };
            cur = node.next.load(Ordering::Relaxed);
            // `node` drops here, freeing it.
        }
        self.head = AtomicPtr::new(ptr::null_mut());
    }
}
