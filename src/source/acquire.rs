//! The transport capability contract concrete backends implement.

use std::path::PathBuf;

use thiserror::Error;

/// Limits a backend must honor while acquiring content.
#[derive(Debug, Clone, Copy)]
pub struct AcquireLimits {
    /// Maximum accepted content size in bytes. 0 disables the check.
    pub max_file_size: u64,
    /// Maximum bytes a backend may read for content-type sniffing.
    pub max_detect_buffer_size: usize,
}

/// What a successful acquisition produced.
///
/// `path` must point at readable content for as long as the source is alive.
/// `name` and `mimetype` are optional hints: file backends can derive the
/// name from the path, network backends from a Content-Disposition header.
/// Fields left `None` are filled by fallback inference in the base.
#[derive(Debug, Clone)]
pub struct Acquired {
    pub path: PathBuf,
    pub name: Option<String>,
    pub mimetype: Option<String>,
}

/// Expected acquisition failures.
///
/// These are normal checked outcomes, not crashes: the base logs them and
/// surfaces the affected property as an absent value.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("resource not found: {0}")]
    Missing(String),
    #[error("content size {actual} exceeds limit of {limit} bytes")]
    TooLarge { limit: u64, actual: u64 },
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("acquisition timed out")]
    TimedOut,
    #[error("transport failure: {0}")]
    Transport(#[from] anyhow::Error),
}

/// The one operation a concrete backend must provide.
///
/// Implementations must enforce `limits.max_file_size` before returning
/// `Ok`, bound any sniffing reads by `limits.max_detect_buffer_size`, and
/// bound their own I/O time (reporting [`AcquireError::TimedOut`]) rather
/// than blocking indefinitely. Returning `Err` must leave nothing partially
/// acquired.
pub trait Acquire: Send + Sync {
    fn acquire(&self, limits: &AcquireLimits) -> Result<Acquired, AcquireError>;
}
