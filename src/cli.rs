//! CLI argument parsing and dispatch

use std::str::FromStr;

use anyhow::Result;
use clap::builder::{NonEmptyStringValueParser, PossibleValuesParser};
use clap::Parser;

use xpu_build::config::BuildConfig;
use xpu_build::defaults;
use xpu_build::orchestrator;
use xpu_build::output::OutputConfig;
use xpu_build::tools::SystemToolchain;

/// xpu-build - Build the llm-d XPU container image from vLLM source
#[derive(Parser, Debug)]
#[command(name = "xpu-build")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Target image reference (repository:tag)
    #[arg(
        value_name = "IMAGE",
        default_value = defaults::DEFAULT_IMAGE_REFERENCE,
        value_parser = NonEmptyStringValueParser::new()
    )]
    image_reference: String,

    /// vLLM version (tag, branch, or commit) to build against
    #[arg(
        value_name = "VLLM_VERSION",
        default_value = defaults::DEFAULT_VLLM_VERSION,
        value_parser = NonEmptyStringValueParser::new()
    )]
    vllm_version: String,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = PossibleValuesParser::new(["error", "warn", "info", "debug", "trace"])
    )]
    log_level: String,
}

impl Cli {
    /// Execute the build pipeline with the parsed arguments
    pub fn execute(self) -> Result<()> {
        let level =
            log::LevelFilter::from_str(&self.log_level).unwrap_or(log::LevelFilter::Info);
        env_logger::Builder::new().filter_level(level).init();

        let out = OutputConfig::from_env_and_flag(&self.color);
        let config = BuildConfig::new(self.image_reference, self.vllm_version);

        match orchestrator::run(&config, &SystemToolchain::new(), &out) {
            Ok(()) => Ok(()),
            Err(e) => {
                out.failure("Build failed");
                Err(e.into())
            }
        }
    }
}
