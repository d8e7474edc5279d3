//! # Checkout Guard
//!
//! The transient vLLM checkout modeled as a guaranteed-release scoped
//! resource: the guard is acquired when the pipeline starts and its `Drop`
//! removes the checkout directory on every exit path, including early fatal
//! errors and panics.
//!
//! Removal is best-effort. A failed removal is logged and never alters the
//! run's exit status; the next run will simply reuse the leftover checkout.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Scoped ownership of the transient checkout directory.
pub struct CheckoutGuard {
    path: PathBuf,
}

impl CheckoutGuard {
    /// Take responsibility for removing `path` when the guard is dropped.
    /// The directory does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The guarded checkout path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CheckoutGuard {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("removed transient checkout {}", self.path.display()),
            Err(e) => warn!(
                "failed to remove transient checkout {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
