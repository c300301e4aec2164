//! Process-wide behaviour that the original implementation kept as mutable
//! globals. Here each lives on the `Table` that owns it (or in a `Config`
//! passed at construction), so multiple tables in one process never share
//! state that isn't meant to be shared.

/// Which synchronisation discipline a [`crate::Table`] uses internally.
/// Both variants expose the exact same four operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// One of a fixed array of locks guards each bucket, indexed by
    /// `bucket_index mod num_locks`.
    Striped,
    /// Bucket chains are mutated with compare-and-swap on the head pointer.
    LockFree,
}

/// Construction-time configuration for a [`crate::Table`].
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub variant: Variant,
    /// When false, chain-depth resize triggers are ignored entirely.
    pub resize_enabled: bool,
    /// Speed-test mode: suppresses `num_items`/metric bookkeeping.
    pub speed_test: bool,
}

impl Config {
    pub fn striped() -> Self {
        Config { variant: Variant::Striped, resize_enabled: true, speed_test: false }
    }

    pub fn lock_free() -> Self {
        Config { variant: Variant::LockFree, resize_enabled: true, speed_test: false }
    }

    pub fn with_resize_enabled(mut self, enabled: bool) -> Self {
        self.resize_enabled = enabled;
        self
    }

    pub fn with_speed_test(mut self, speed_test: bool) -> Self {
        self.speed_test = speed_test;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::striped()
    }
}
