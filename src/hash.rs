//! The table's single, fixed hash function.
//!
//! Both variants route every key through this function and only this
//! function: collisions are resolved purely by chaining, there is no
//! secondary probe. Changing the constants changes the distribution and
//! saturation behaviour that the resize-trigger tests depend on, so treat
//! them as part of the wire contract, not an implementation detail.

/// `h(k) = ((k * 37) + 13) mod num_buckets`, with wrapping arithmetic so the
/// function stays total over the full `u64` key space.
#[inline]
pub(crate) fn bucket_for(key: u64, num_buckets: usize) -> usize {
    debug_assert!(num_buckets > 0);
    (key.wrapping_mul(37).wrapping_add(13) % num_buckets as u64) as usize
}
