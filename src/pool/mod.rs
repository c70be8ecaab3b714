//! Discovery pool: the rotating feed records and their rotation state.
//!
//! The pool is a JSON document with a `feeds` array:
//!
//! ```json
//! {
//!   "feeds": [
//!     {
//!       "title": "Example",
//!       "xmlUrl": "https://example.com/feed.xml",
//!       "htmlUrl": "https://example.com",
//!       "quality_score": 8,
//!       "category": "Tech",
//!       "last_included": null
//!     }
//!   ]
//! }
//! ```
//!
//! It is loaded whole and saved whole. Saving goes through
//! [`write_atomic`](crate::utils::write_atomic), so a failed run never
//! leaves a truncated pool behind.

mod record;
mod timestamp;

pub use record::{FeedRecord, MAX_QUALITY};
pub use timestamp::Timestamp;

use crate::utils::{WriteError, write_atomic};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::{
    fs,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

const FEEDS_KEY: &str = "feeds";

/// Pool loading errors
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("IO error when reading discovery pool `{}`", .0.display())]
    Io(PathBuf, #[source] io::Error),

    #[error("malformed discovery pool `{}`: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Ordered collection of feed records plus the rest of the pool document.
#[derive(Debug, Clone)]
pub struct Pool {
    feeds: Vec<FeedRecord>,
    /// Top-level document object; its `feeds` entry is rebuilt on save.
    document: Map<String, Value>,
}

impl Pool {
    /// Load and validate the pool document at `path`.
    pub fn load(path: &Path) -> Result<Self, PoolError> {
        let content =
            fs::read_to_string(path).map_err(|err| PoolError::Io(path.to_path_buf(), err))?;
        Self::parse(&content, path)
    }

    /// Parse pool text; `path` only labels errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self, PoolError> {
        let malformed = |reason: String| PoolError::Malformed {
            path: path.to_path_buf(),
            reason,
        };

        let document = match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(malformed("expected a JSON object at the top level".into())),
            Err(e) => return Err(malformed(format!("invalid JSON: {e}"))),
        };

        let entries = match document.get(FEEDS_KEY) {
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(malformed(format!("`{FEEDS_KEY}` must be an array"))),
            None => return Err(malformed(format!("missing `{FEEDS_KEY}` array"))),
        };

        let feeds = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                Value::Object(map) => FeedRecord::from_map(map.clone())
                    .map_err(|reason| malformed(format!("{FEEDS_KEY}[{i}]: {reason}"))),
                _ => Err(malformed(format!("{FEEDS_KEY}[{i}]: expected an object"))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { feeds, document })
    }

    pub fn feeds(&self) -> &[FeedRecord] {
        &self.feeds
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    /// Stamp `last_included = now` on the records at `indices`.
    ///
    /// Indices are positions in [`feeds`](Self::feeds); records not named
    /// are left untouched.
    pub fn stamp(&mut self, indices: impl IntoIterator<Item = usize>, now: DateTime<Utc>) {
        for index in indices {
            if let Some(record) = self.feeds.get_mut(index) {
                record.stamp(now);
            }
        }
    }

    /// Records whose `last_included` lies after `now`.
    pub fn stamped_after(&self, now: DateTime<Utc>) -> impl Iterator<Item = &FeedRecord> {
        self.feeds
            .iter()
            .filter(move |record| record.last_included().is_some_and(|ts| ts.at() > now))
    }

    /// Serialize the whole document, two-space indented, trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut document = self.document.clone();
        let feeds = self.feeds.iter().map(FeedRecord::to_value).collect();
        document.insert(FEEDS_KEY.to_owned(), Value::Array(feeds));

        let mut json = serde_json::to_string_pretty(&Value::Object(document))?;
        json.push('\n');
        Ok(json)
    }

    /// Overwrite `path` with the current pool. Nothing is written if the
    /// pool cannot be serialized.
    pub fn save(&self, path: &Path) -> Result<(), WriteError> {
        let json = self
            .to_json()
            .map_err(|err| WriteError::new(path, io::Error::other(err)))?;
        write_atomic(path, json.as_bytes())
    }
}

#[cfg(test)]
impl Pool {
    /// Pool holding exactly `feeds`.
    pub fn from_records(feeds: Vec<FeedRecord>) -> Self {
        Self {
            feeds,
            document: Map::new(),
        }
    }
}
