//! Config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, e.g. `rotation.quality_weight`.
///
/// Sections declare their field paths as associated constants so that
/// diagnostics always point at a key that actually exists.
///
/// ```ignore
/// impl RotationConfig {
///     const QUALITY_WEIGHT: FieldPath = FieldPath::new("rotation.quality_weight");
/// }
///
/// diag.error(RotationConfig::QUALITY_WEIGHT, "must not be negative");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
