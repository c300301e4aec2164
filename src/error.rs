//! Errors surfaced at the process boundary. Table operations themselves
//! never fail (allocation failure is fatal and aborts the process; see
//! DESIGN.md), so this enum only covers startup and CLI-facing failures.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BucketMapError {
    #[error("input file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read input file {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
}
