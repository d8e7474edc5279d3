//! # Build Orchestrator
//!
//! The linear pipeline that turns a [`BuildConfig`] into a locally
//! registered image:
//!
//! `tool-check -> checkout -> version-switch -> definition-check -> build ->
//! verify -> cleanup`
//!
//! There is no branching, retrying, or concurrency; the first failing step
//! aborts the run. Cleanup of the transient checkout is handled by a
//! [`CheckoutGuard`] acquired before the checkout step, so it happens on
//! every exit path and its failures never change the exit status.
//!
//! Running two instances concurrently with the same checkout path races on
//! that directory and is not supported.

use crate::checkout::CheckoutGuard;
use crate::config::BuildConfig;
use crate::defaults;
use crate::error::{Error, Result};
use crate::output::OutputConfig;
use crate::tools::Toolchain;

/// Execute the full build pipeline for `config`.
pub fn run(config: &BuildConfig, tools: &impl Toolchain, out: &OutputConfig) -> Result<()> {
    out.info(format!(
        "Building {} from vLLM {}",
        config.image_reference, config.vllm_version
    ));

    if !tools.is_available() {
        return Err(Error::ToolNotFound {
            tool: "docker".to_string(),
            message: "not found on PATH".to_string(),
        });
    }

    // From here on the checkout is removed on every exit path
    let guard = CheckoutGuard::new(&config.checkout_dir);

    if guard.path().exists() {
        out.info(format!(
            "Reusing existing checkout at {}",
            config.checkout_dir.display()
        ));
    } else {
        out.info(format!("Cloning {}", config.upstream_url));
        tools.clone_repo(&config.upstream_url, guard.path())?;
    }

    out.info(format!("Switching checkout to {}", config.vllm_version));
    tools.fetch_and_checkout(guard.path(), &config.vllm_version)?;

    let definition = config.checkout_dir.join(&config.dockerfile);
    if !definition.exists() {
        return Err(Error::DefinitionNotFound { path: definition });
    }

    out.info(format!(
        "Building image {} (this may take a while)",
        config.image_reference
    ));
    tools.build_image(
        guard.path(),
        &config.dockerfile,
        &config.image_reference,
        (defaults::VERSION_BUILD_ARG, &config.vllm_version),
    )?;

    // The build reported success; double-check the image actually landed
    // in the local cache before claiming victory
    if !tools.image_exists(config.repository())? {
        return Err(Error::Verification {
            repository: config.repository().to_string(),
            message: "no local image found".to_string(),
        });
    }

    out.success(format!("Built and verified {}", config.image_reference));
    Ok(())
}
