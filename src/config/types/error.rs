//! Configuration error types.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file `{}` not found", .0.display())]
    NotFound(PathBuf),

    #[error("IO error when reading `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file `{}`", .0.display())]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("invalid rotation document `{}`", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),

    // No #[source]: anyhow would print every diagnostic a second time
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

// ============================================================================
// Diagnostics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Rejects the configuration.
    Error,
    /// Usable, but probably not what was meant.
    Warning,
}

/// One finding about a config field.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub severity: Severity,
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.severity {
            Severity::Error => "error".red().bold().to_string(),
            Severity::Warning => "warning".yellow().bold().to_string(),
        };
        write!(f, "{marker} {}: {}", self.field, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n    {} {hint}", "hint:".cyan())?;
        }
        Ok(())
    }
}

/// Findings collected while validating every section.
///
/// Validation never stops at the first problem; each section appends to the
/// same collector and the caller decides once at the end.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    entries: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, severity: Severity, field: FieldPath, message: String, hint: Option<String>) {
        self.entries.push(ConfigDiagnostic {
            severity,
            field,
            message,
            hint,
        });
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Error, field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(Severity::Error, field, message.into(), Some(hint.into()));
    }

    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Warning, field, message.into(), None);
    }

    fn with_severity(&self, severity: Severity) -> Vec<&ConfigDiagnostic> {
        self.entries
            .iter()
            .filter(|entry| entry.severity == severity)
            .collect()
    }

    pub fn errors(&self) -> Vec<&ConfigDiagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&ConfigDiagnostic> {
        self.with_severity(Severity::Warning)
    }

    /// Log every warning; errors are reported through `Display`.
    pub fn print_warnings(&self) {
        for warning in self.warnings() {
            crate::log!("warning"; "{}: {}", warning.field.as_str(), warning.message);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.severity == Severity::Error)
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors().len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_errors()
    }

    /// `Err(self)` if anything was rejected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.has_errors() { Err(self) } else { Ok(()) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors();
        writeln!(
            f,
            "invalid configuration ({} {}):",
            errors.len(),
            if errors.len() == 1 { "problem" } else { "problems" }
        )?;
        for error in errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
