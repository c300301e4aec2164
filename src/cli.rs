//! Command-line surface for the `bucketmap` driver binary.
//!
//! Flag set mirrors the source design (`-f -b -t -r -s`); `--variant` is a
//! supplement this rewrite adds since the source only ever shipped one
//! synchronisation discipline per build and this crate carries both (see
//! DESIGN.md's open-question log).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, Variant};

pub const DEFAULT_NUM_BUCKETS: i64 = 64;
pub const DEFAULT_NUM_THREADS: i64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Striped,
    LockFree,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Striped => Variant::Striped,
            VariantArg::LockFree => Variant::LockFree,
        }
    }
}

/// Concurrent bucketized hash map load-test driver.
#[derive(Debug, Parser)]
#[command(name = "bucketmap", version, about)]
pub struct CliArgs {
    /// Input file: one operation per line.
    #[arg(short = 'f', long = "file")]
    pub input: PathBuf,

    /// Initial bucket count. Values < 1 reset to the default.
    #[arg(short = 'b', long = "buckets", default_value_t = DEFAULT_NUM_BUCKETS)]
    pub buckets: i64,

    /// Worker thread count. Values < 1 reset to the default.
    #[arg(short = 't', long = "threads", default_value_t = DEFAULT_NUM_THREADS)]
    pub threads: i64,

    /// Disable resizing entirely.
    #[arg(short = 'r', long = "no-resize")]
    pub no_resize: bool,

    /// Speed-test mode: suppress metric tracking and reporting.
    #[arg(short = 's', long = "speed-test")]
    pub speed_test: bool,

    /// Which synchronisation discipline to use.
    #[arg(long, value_enum, default_value_t = VariantArg::Striped)]
    pub variant: VariantArg,
}

impl CliArgs {
    pub fn resolved_buckets(&self) -> usize {
        if self.buckets < 1 {
            DEFAULT_NUM_BUCKETS as usize
        } else {
            self.buckets as usize
        }
    }

    pub fn resolved_threads(&self) -> usize {
        if self.threads < 1 {
            DEFAULT_NUM_THREADS as usize
        } else {
            self.threads as usize
        }
    }

    pub fn table_config(&self) -> Config {
        Config {
            variant: self.variant.into(),
            resize_enabled: !self.no_resize,
            speed_test: self.speed_test,
        }
    }
}
