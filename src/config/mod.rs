//! Project configuration management for `feedwheel.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── rotation   # [rotation]
//! │   ├── paths      # [paths]
//! │   └── output     # [output]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section       | Purpose                                             |
//! |---------------|-----------------------------------------------------|
//! | `[rotation]`  | Recency gate, score weights, discovery quota        |
//! | `[paths]`     | Pool, core tree, output, optional rotation document |
//! | `[output]`    | Document title, category name, entry type           |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{OutputConfig, PathsConfig, RotationConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands, RunArgs},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing feedwheel.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Where this config was read from, absolute.
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory holding the config; relative `[paths]` resolve against it.
    #[serde(skip)]
    pub root: PathBuf,

    /// Selection parameters
    #[serde(default)]
    pub rotation: RotationConfig,

    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Generated document labels
    #[serde(default)]
    pub output: OutputConfig,
}

impl ProjectConfig {
    /// Load the config named by `--config`, searching upward from cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine the current directory")?;
        Self::load_from(cli, &cwd)
    }

    /// Load configuration, searching for the config file upward from `start`.
    pub fn load_from(cli: &Cli, start: &Path) -> Result<Self> {
        let config_path = find_config_file(start, &cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.finalize(&config_path);
        config.load_rotation_document()?;
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Set paths after loading.
    fn finalize(&mut self, config_path: &Path) {
        let config_path = crate::utils::path::normalize_path(config_path);
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.config_path = config_path;
        self.set_root(&root);
        self.paths.normalize(&root);
    }

    /// Read and parse the config file. Unknown keys are reported, not fatal.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (config, unknown) = Self::parse_with_ignored(&content)
            .map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;

        let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
        for key in &unknown {
            log!("warning"; "{}: unknown key `{}` ignored", name, key);
        }

        Ok(config)
    }

    /// Parse TOML, returning the dotted paths of keys no section knows.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut unknown = Vec::new();
        let config = serde_ignored::deserialize(toml::Deserializer::new(content), |key| {
            unknown.push(key.to_string());
        })?;
        Ok((config, unknown))
    }

    /// Replace `[rotation]` with the external JSON document, if configured.
    fn load_rotation_document(&mut self) -> Result<()> {
        if let Some(path) = &self.paths.rotation {
            self.rotation = RotationConfig::from_json_file(path)?;
        }
        Ok(())
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// `path` relative to the project root, for log lines.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // command-line overrides
    // ========================================================================

    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Run { args } => self.apply_run_args(args),
            Commands::Status => {}
        }
    }

    fn apply_run_args(&mut self, args: &RunArgs) {
        crate::logger::set_verbose(args.verbose);

        if let Some(count) = args.count {
            self.rotation.num_discovery_feeds = count;
        }

        // `--output` is relative to cwd, like any other shell path
        if let Some(output) = &args.output {
            self.paths.output = crate::utils::path::normalize_path(output);
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Check every section, log warnings, and fail with all errors at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.rotation.validate(&mut diag);
        self.paths.validate(&mut diag);
        self.output.validate(&mut diag);

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// test helpers
// ============================================================================

/// Parse config text for section tests; unknown keys fail the test.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, unknown) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(unknown.is_empty(), "unknown keys in test config: {unknown:?}");
    parsed
}

// ============================================================================
// tests
// ============================================================================
