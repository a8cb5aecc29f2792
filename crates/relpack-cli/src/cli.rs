//! CLI argument parsing using clap.

use clap::Parser;
use relpack_core::config::DEFAULT_OUTPUT;
use relpack_core::config::DEFAULT_ROOT_NAME;
use relpack_core::config::DEFAULT_STAGE_DIR;
use relpack_core::config::DEFAULT_WHITELIST;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "relpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Whitelist file (relative to the repository root)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_WHITELIST)]
    pub whitelist: PathBuf,

    /// Output zip path (relative to the repository root)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Top-level folder name inside the zip
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ROOT_NAME)]
    pub root_name: String,

    /// Repository root (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub repo_root: Option<PathBuf>,

    /// Staging directory, wiped on every run (relative to the repository root)
    #[arg(long, value_name = "DIR", default_value = DEFAULT_STAGE_DIR)]
    pub stage_dir: PathBuf,

    /// Compression level (1-9)
    #[arg(short = 'l', long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: u8,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,
}
