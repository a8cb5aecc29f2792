//! Package command: whitelist → staging tree → zip.

use crate::cli::Cli;
use crate::error::convert_pack_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use relpack_core::PackConfig;
use relpack_core::package_release;
use relpack_core::package_release_with_progress;
use std::env;

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let repo_root = match &cli.repo_root {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let mut config = PackConfig::new(repo_root)
        .with_whitelist(&cli.whitelist)
        .with_output(&cli.output)
        .with_root_name(cli.root_name.as_str())
        .with_stage_dir(&cli.stage_dir);
    // clap already enforces 1-9; `validate()` re-checks.
    config.compression_level = cli.compression_level;

    log::debug!("packaging with {config:?}");

    let result = if !cli.quiet && !cli.json && CliProgress::should_show() {
        let mut progress = CliProgress::new("Packaging");
        package_release_with_progress(&config, &mut progress)
    } else {
        package_release(&config)
    };

    let report = result.map_err(convert_pack_error)?;
    formatter.format_pack_result(&report)
}
