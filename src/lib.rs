//! # xpu-build Library
//!
//! This library provides the core functionality for the `xpu-build`
//! command-line tool: a thin, linear orchestrator that produces the llm-d
//! XPU container image from a pinned vLLM source checkout.
//!
//! ## Execution Flow
//!
//! The main entry point is [`orchestrator::run`], which executes the
//! following steps in order, aborting on the first failure:
//!
//! 1.  **Tool check**: Verify that `docker` is reachable on this host.
//! 2.  **Checkout**: Clone the vLLM source into the transient checkout
//!     directory, or reuse an existing checkout as-is.
//! 3.  **Version switch**: Fetch all remote refs and check out the requested
//!     vLLM version (tag, branch, or commit).
//! 4.  **Definition check**: Verify `docker/Dockerfile.xpu` exists inside
//!     the checkout before any build is attempted.
//! 5.  **Build**: Run `docker build` against the definition file, tagging
//!     the result and passing the vLLM version as a build argument.
//! 6.  **Verify**: Confirm the image repository is present in the local
//!     image cache; a successful build with no registered image is surfaced
//!     as a distinct inconsistency error.
//! 7.  **Cleanup**: Remove the transient checkout. This runs on every exit
//!     path (success or failure) via a scoped guard, and removal failures
//!     are logged without affecting the exit status.
//!
//! ## Core Concepts
//!
//! - **Configuration ([`config`])**: An immutable [`config::BuildConfig`]
//!   built once at startup and passed explicitly; no global state.
//! - **Toolchain ([`tools`])**: A narrow capability trait over the external
//!   `git` and `docker` commands, so the orchestration logic is testable
//!   against a fake without spawning real processes.
//! - **Checkout guard ([`checkout`])**: The transient checkout modeled as a
//!   guaranteed-release scoped resource.
//! - **Output ([`output`])**: Stage-labeled, colored status lines with
//!   terminal capability detection.
//!
//! The crate also ships the `tpu-nightly` companion binary, backed by the
//! [`nightly`] module: it reads or rewrites the `.devYYYYMMDD` nightly date
//! pinned on the torch / torchvision / torch_xla lines of a TPU
//! requirements file and emits a JSON report.

pub mod checkout;
pub mod config;
pub mod defaults;
pub mod error;
pub mod nightly;
pub mod orchestrator;
pub mod output;
pub mod tools;
