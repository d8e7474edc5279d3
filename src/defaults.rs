//! Default values for xpu-build configuration.
//!
//! This module provides centralized default values used across the CLI and
//! orchestrator, ensuring consistency and avoiding duplication. The image
//! reference and vLLM version can be overridden positionally on the command
//! line; the remaining values are fixed for compatibility with the
//! `docker/Dockerfile.xpu` layout of the vLLM repository.

/// Default fully qualified target image reference (repository + tag).
pub const DEFAULT_IMAGE_REFERENCE: &str = "ghcr.io/llm-d/llm-d-xpu:v0.2.3";

/// Default vLLM version (tag, branch, or commit) to build against.
pub const DEFAULT_VLLM_VERSION: &str = "v0.10.0";

/// Upstream vLLM source repository.
pub const VLLM_UPSTREAM_URL: &str = "https://github.com/vllm-project/vllm.git";

/// Transient checkout directory, relative to the current working directory.
pub const CHECKOUT_DIR: &str = "vllm-source";

/// Build definition file, relative to the checkout directory.
pub const DOCKERFILE_PATH: &str = "docker/Dockerfile.xpu";

/// Name of the build argument carrying the vLLM version into the build.
pub const VERSION_BUILD_ARG: &str = "VLLM_VERSION";
