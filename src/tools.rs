//! # External Toolchain
//!
//! This module abstracts the two external collaborators of the build
//! pipeline - the `git` version-control client and the `docker` image-build
//! tool - behind the narrow [`Toolchain`] capability trait. The orchestrator
//! only talks to this trait, so its logic is testable against a fake without
//! spawning real processes.
//!
//! [`SystemToolchain`] is the production implementation. It uses the system
//! `git` command, which automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Capability interface over the external version-control and image-build
/// tools.
pub trait Toolchain {
    /// Whether the image-build tool is reachable on this host.
    fn is_available(&self) -> bool;

    /// Clone `url` into `dest`.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// Fetch all remote refs in the checkout at `dest`, then switch it to
    /// `git_ref` (tag, branch, or commit).
    fn fetch_and_checkout(&self, dest: &Path, git_ref: &str) -> Result<()>;

    /// Build an image from `definition` (relative to `context`), tagging it
    /// `tag` and passing `build_arg` as a `KEY=VALUE` build argument.
    fn build_image(
        &self,
        context: &Path,
        definition: &Path,
        tag: &str,
        build_arg: (&str, &str),
    ) -> Result<()>;

    /// Whether the local image cache holds an entry for `repository`.
    fn image_exists(&self, repository: &str) -> Result<bool>;
}

/// Production [`Toolchain`] that shells out to `git` and `docker`.
#[derive(Debug, Clone)]
pub struct SystemToolchain {
    git: String,
    docker: String,
}

impl SystemToolchain {
    pub fn new() -> Self {
        Self {
            git: "git".to_string(),
            docker: "docker".to_string(),
        }
    }

    /// Run a git subcommand, capturing output and mapping failures to
    /// [`Error::VersionControl`] with the stderr attached.
    fn run_git(&self, dir: Option<&Path>, args: &[&str]) -> Result<()> {
        let mut cmd = Command::new(&self.git);
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| Error::VersionControl {
            command: args.join(" "),
            stderr: e.to_string(),
            hint: None,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

            // Provide helpful error message for common auth failures
            let hint = if stderr.contains("Authentication failed")
                || stderr.contains("Permission denied")
                || stderr.contains("Could not read from remote repository")
            {
                Some(
                    "Make sure you have access to the repository \
                     (SSH key, credential helper, or access token)"
                        .to_string(),
                )
            } else {
                None
            };

            return Err(Error::VersionControl {
                command: args.join(" "),
                stderr,
                hint,
            });
        }

        Ok(())
    }
}

impl Default for SystemToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolchain for SystemToolchain {
    fn is_available(&self) -> bool {
        Command::new(&self.docker)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        self.run_git(None, &["clone", url, &dest])
    }

    fn fetch_and_checkout(&self, dest: &Path, git_ref: &str) -> Result<()> {
        self.run_git(Some(dest), &["fetch", "--all", "--tags"])?;
        self.run_git(Some(dest), &["checkout", git_ref])
    }

    fn build_image(
        &self,
        context: &Path,
        definition: &Path,
        tag: &str,
        build_arg: (&str, &str),
    ) -> Result<()> {
        // Stdio is inherited so the build log streams to the user
        let status = Command::new(&self.docker)
            .current_dir(context)
            .arg("build")
            .arg("-f")
            .arg(definition)
            .arg("-t")
            .arg(tag)
            .arg("--build-arg")
            .arg(format!("{}={}", build_arg.0, build_arg.1))
            .arg(".")
            .status()
            .map_err(|e| Error::Build {
                tag: tag.to_string(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::Build {
                tag: tag.to_string(),
                message: format!("docker build exited with {}", status),
            });
        }

        Ok(())
    }

    fn image_exists(&self, repository: &str) -> Result<bool> {
        let output = Command::new(&self.docker)
            .args(["images", "--quiet", repository])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            // The build already succeeded at this point; a failed query is
            // a verification problem, not a build problem
            return Err(Error::Verification {
                repository: repository.to_string(),
                message: format!("image query failed: {}", stderr),
            });
        }

        // `docker images --quiet` prints one image ID per matching entry
        Ok(!output.stdout.is_empty())
    }
}
