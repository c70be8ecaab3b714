//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Rotate discovery feeds into a curated OPML feed list
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: feedwheel.toml)
    #[arg(short = 'C', long, default_value = "feedwheel.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Select discovery feeds, update the pool and write the feed list
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Show every pool feed and when it is next eligible
    #[command(visible_alias = "s")]
    Status,
}

/// Arguments of the `run` command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Select and report, but write neither the pool nor the feed list
    #[arg(short, long)]
    pub dry_run: bool,

    /// Seed the random source for a reproducible selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of discovery feeds for this run
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Override the output document path (relative to cwd)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Enable verbose output (per-feed scores)
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

#[allow(unused)]
impl Cli {
    pub const fn is_run(&self) -> bool {
        matches!(self.command, Commands::Run { .. })
    }
    pub const fn is_status(&self) -> bool {
        matches!(self.command, Commands::Status)
    }
}
