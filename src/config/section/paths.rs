//! `[paths]` section: where the inputs live and where the output goes.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::resolve_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Discovery pool document (JSON), rewritten after each run.
    pub pool: PathBuf,
    /// Core feed tree (OPML), read-only.
    pub core: PathBuf,
    /// Generated feed list (OPML).
    pub output: PathBuf,
    /// Optional JSON rotation document replacing the `[rotation]` table.
    pub rotation: Option<PathBuf>,
}

impl PathsConfig {
    const POOL: FieldPath = FieldPath::new("paths.pool");
    const CORE: FieldPath = FieldPath::new("paths.core");
    const OUTPUT: FieldPath = FieldPath::new("paths.output");

    /// Resolve every path against the project root.
    ///
    /// Empty paths stay empty so `validate` can report them; joined onto
    /// the root they would name the project directory itself.
    pub fn normalize(&mut self, root: &Path) {
        let resolve = |path: &Path| {
            if path.as_os_str().is_empty() {
                PathBuf::new()
            } else {
                resolve_path(path, root)
            }
        };

        self.pool = resolve(&self.pool);
        self.core = resolve(&self.core);
        self.output = resolve(&self.output);
        if let Some(rotation) = self.rotation.take() {
            self.rotation = Some(resolve(&rotation));
        }
    }

    /// Output must never overwrite one of the inputs.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.output == self.pool {
            diag.error_with_hint(
                Self::OUTPUT,
                "output document would overwrite the discovery pool",
                "point `paths.output` at the published directory, e.g. `docs/feeds.opml`",
            );
        }
        if self.output == self.core {
            diag.error_with_hint(
                Self::OUTPUT,
                "output document would overwrite the core feed tree",
                "point `paths.output` at the published directory, e.g. `docs/feeds.opml`",
            );
        }
        if self.pool == self.core {
            diag.error(Self::POOL, "discovery pool and core feed tree are the same file");
        }

        for (field, path) in [
            (Self::POOL, &self.pool),
            (Self::CORE, &self.core),
            (Self::OUTPUT, &self.output),
        ] {
            if path.as_os_str().is_empty() {
                diag.error(field, "must not be empty");
            } else if path.is_dir() {
                diag.error(field, format!("`{}` is a directory, expected a file", path.display()));
            }
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            pool: "discovery_pool.json".into(),
            core: "core_feeds.opml".into(),
            output: "docs/feeds.opml".into(),
            rotation: None,
        }
    }
}
