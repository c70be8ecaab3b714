//! `[rotation]` section: the per-run selection parameters.
//!
//! The same four fields can also come from a standalone JSON document
//! (`paths.rotation`), which then replaces the table wholesale:
//!
//! ```json
//! {
//!   "min_days_between_includes": 7,
//!   "quality_weight": 0.7,
//!   "randomness_weight": 0.3,
//!   "num_discovery_feeds": 5
//! }
//! ```

use crate::config::{ConfigDiagnostics, ConfigError, FieldPath};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Days a feed must sit out after being included.
    pub min_days_between_includes: u32,
    /// Weight of the normalized quality score (`quality_score / 10`).
    pub quality_weight: f64,
    /// Weight of the uniform random draw.
    pub randomness_weight: f64,
    /// Maximum number of discovery feeds per run.
    pub num_discovery_feeds: u32,
}

/// Strict shape of the JSON rotation document: every field is required.
#[derive(Debug, Deserialize)]
struct RotationDocument {
    min_days_between_includes: u32,
    quality_weight: f64,
    randomness_weight: f64,
    num_discovery_feeds: u32,
}

impl From<RotationDocument> for RotationConfig {
    fn from(doc: RotationDocument) -> Self {
        Self {
            min_days_between_includes: doc.min_days_between_includes,
            quality_weight: doc.quality_weight,
            randomness_weight: doc.randomness_weight,
            num_discovery_feeds: doc.num_discovery_feeds,
        }
    }
}

impl RotationConfig {
    const SECTION: FieldPath = FieldPath::new("rotation");
    const QUALITY_WEIGHT: FieldPath = FieldPath::new("rotation.quality_weight");
    const RANDOMNESS_WEIGHT: FieldPath = FieldPath::new("rotation.randomness_weight");
    const NUM_DISCOVERY_FEEDS: FieldPath = FieldPath::new("rotation.num_discovery_feeds");

    /// Parse a JSON rotation document.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RotationDocument>(content).map(Self::from)
    }

    /// Load a JSON rotation document from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_json(&content).map_err(|err| ConfigError::Json(path.to_path_buf(), err))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, weight) in [
            (Self::QUALITY_WEIGHT, self.quality_weight),
            (Self::RANDOMNESS_WEIGHT, self.randomness_weight),
        ] {
            if !weight.is_finite() {
                diag.error(field, format!("must be a finite number, got {weight}"));
            } else if weight < 0.0 {
                diag.error(field, format!("must not be negative, got {weight}"));
            }
        }

        if self.quality_weight == 0.0 && self.randomness_weight == 0.0 {
            diag.warn(
                Self::SECTION,
                "both weights are zero; every feed scores 0 and pool order decides",
            );
        }
        if self.num_discovery_feeds == 0 {
            diag.warn(
                Self::NUM_DISCOVERY_FEEDS,
                "is 0; no discovery feeds will be rotated in",
            );
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            min_days_between_includes: 7,
            quality_weight: 0.7,
            randomness_weight: 0.3,
            num_discovery_feeds: 5,
        }
    }
}
