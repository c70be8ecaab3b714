//! `[output]` section: labels written into the generated document.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Document title in the `<head>`.
    pub title: String,
    /// Name of the category holding the rotated-in feeds.
    pub category: String,
    /// `type` attribute of each feed entry.
    pub entry_type: String,
}

impl OutputConfig {
    const TITLE: FieldPath = FieldPath::new("output.title");
    const CATEGORY: FieldPath = FieldPath::new("output.category");
    const ENTRY_TYPE: FieldPath = FieldPath::new("output.entry_type");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let labels = [
            (Self::TITLE, &self.title),
            (Self::CATEGORY, &self.category),
            (Self::ENTRY_TYPE, &self.entry_type),
        ];
        for (field, value) in labels {
            if value.trim().is_empty() {
                diag.error(field, "must not be empty");
            }
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            title: "Feed Rotation - Generated".into(),
            category: "Discovery Rotation".into(),
            entry_type: "rss".into(),
        }
    }
}
