//! # Build Configuration
//!
//! This module defines [`BuildConfig`], the immutable configuration for a
//! single orchestrator run. It is constructed once at startup from the
//! command-line arguments (or their defaults) and passed explicitly to the
//! orchestration routine; nothing in the pipeline reads global state.

use std::path::PathBuf;

use crate::defaults;

/// Immutable configuration for one image build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Fully qualified target image reference (repository + tag).
    pub image_reference: String,
    /// vLLM version (tag, branch, or commit) to build against. Also passed
    /// to the build as the `VLLM_VERSION` build argument.
    pub vllm_version: String,
    /// Transient checkout directory, relative to the working directory.
    pub checkout_dir: PathBuf,
    /// Build definition file, relative to the checkout directory.
    pub dockerfile: PathBuf,
    /// Upstream vLLM source repository URL.
    pub upstream_url: String,
}

impl BuildConfig {
    /// Create a configuration for the given image reference and vLLM
    /// version, with the fixed checkout/definition/upstream defaults.
    pub fn new(image_reference: impl Into<String>, vllm_version: impl Into<String>) -> Self {
        Self {
            image_reference: image_reference.into(),
            vllm_version: vllm_version.into(),
            checkout_dir: PathBuf::from(defaults::CHECKOUT_DIR),
            dockerfile: PathBuf::from(defaults::DOCKERFILE_PATH),
            upstream_url: defaults::VLLM_UPSTREAM_URL.to_string(),
        }
    }

    /// The repository portion of the image reference: everything before the
    /// final `:` tag separator.
    ///
    /// A `:` that appears before the last `/` belongs to a registry port
    /// (e.g. `localhost:5000/image`) and is not treated as a tag separator.
    pub fn repository(&self) -> &str {
        let reference = self.image_reference.as_str();
        match reference.rfind(':') {
            Some(idx) if idx > reference.rfind('/').unwrap_or(0) => &reference[..idx],
            _ => reference,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new(
            defaults::DEFAULT_IMAGE_REFERENCE,
            defaults::DEFAULT_VLLM_VERSION,
        )
    }
}
