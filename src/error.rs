//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `xpu-build` application. It uses the `thiserror` library to create an
//! `Error` enum covering every fatal failure mode of the build pipeline,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum representing all fatal errors. Each variant
//!   corresponds to a specific pipeline stage and carries the contextual
//!   information needed to diagnose it (tool name, file path, command,
//!   captured stderr, image repository).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the library to simplify function signatures.
//!
//! Cleanup failures are deliberately absent from this enum: failing to
//! remove the transient checkout never changes the run's exit status, so it
//! is logged by the checkout guard rather than propagated.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for xpu-build operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required external tool is missing from the execution environment.
    #[error("Required tool not found: {tool} - {message}")]
    ToolNotFound { tool: String, message: String },

    /// The build definition file is missing after the checkout was switched
    /// to the requested version.
    #[error("Build definition not found: {} does not exist in the checkout", path.display())]
    DefinitionNotFound { path: PathBuf },

    /// A version-control operation (clone, fetch, checkout) failed.
    ///
    /// Includes the failed command, the captured stderr, and an optional
    /// hint for resolution.
    #[error("Git command failed: {command} - {stderr}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    VersionControl {
        command: String,
        stderr: String,
        /// Optional hint for how to resolve the failure
        hint: Option<String>,
    },

    /// The image build tool exited non-zero.
    #[error("Image build failed for {tag}: {message}")]
    Build { tag: String, message: String },

    /// The build reported success but the image could not be confirmed in
    /// the local image cache, either because it is absent or because the
    /// image query itself failed. Surfaced distinctly from [`Error::Build`]
    /// because it signals a build-tool/registry inconsistency.
    #[error("Image verification failed for {repository}: {message}")]
    Verification { repository: String, message: String },

    /// A nightly date that is not in `YYYYMMDD` form.
    #[error("Invalid nightly date {value:?}: expected YYYYMMDD")]
    InvalidNightlyDate { value: String },

    /// No `.devYYYYMMDD` nightly date present on any scoped requirement
    /// line of the file.
    #[error("No .devYYYYMMDD nightly date found on torch/torchvision/torch_xla lines of {}", path.display())]
    NightlyDateNotFound { path: PathBuf },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
