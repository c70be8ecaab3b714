//! Feedwheel - rotate discovery feeds into a curated OPML feed list.

#![allow(dead_code)]

mod cli;
mod config;
mod generator;
mod logger;
mod outline;
mod pool;
mod rotation;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = ProjectConfig::load(&cli)?;

    match &cli.command {
        Commands::Run { args } => cli::run::run_rotation(&config, args),
        Commands::Status => cli::status::show_status(&config),
    }
}
