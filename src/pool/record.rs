//! A single discovery feed.

use super::Timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Highest `quality_score` a record may carry.
pub const MAX_QUALITY: f64 = 10.0;

/// One entry of the discovery pool.
///
/// Keeps the JSON object it was read from, so saving writes back every key
/// in its original order; only `last_included` is ever rewritten.
#[derive(Debug, Clone)]
pub struct FeedRecord {
    fields: Fields,
    source: Map<String, Value>,
}

/// The keys the rotation understands. Everything else rides along in `source`.
#[derive(Debug, Clone, Deserialize)]
struct Fields {
    title: String,
    #[serde(rename = "xmlUrl")]
    xml_url: String,
    #[serde(rename = "htmlUrl", default)]
    html_url: Option<String>,
    quality_score: f64,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    last_included: Option<Timestamp>,
}

impl FeedRecord {
    /// Build a record from its JSON object.
    ///
    /// The error is a human-readable reason; the pool adds file and index.
    pub fn from_map(source: Map<String, Value>) -> Result<Self, String> {
        let fields: Fields =
            serde_json::from_value(Value::Object(source.clone())).map_err(|e| e.to_string())?;

        let score = fields.quality_score;
        if !score.is_finite() || !(0.0..=MAX_QUALITY).contains(&score) {
            return Err(format!(
                "`quality_score` {score} is outside 0..={MAX_QUALITY}"
            ));
        }

        Ok(Self { fields, source })
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn xml_url(&self) -> &str {
        &self.fields.xml_url
    }

    /// Secondary (site) URL, empty when the record has none.
    pub fn html_url(&self) -> &str {
        self.fields.html_url.as_deref().unwrap_or_default()
    }

    pub fn quality_score(&self) -> f64 {
        self.fields.quality_score
    }

    pub fn category(&self) -> Option<&str> {
        self.fields.category.as_deref()
    }

    pub fn last_included(&self) -> Option<&Timestamp> {
        self.fields.last_included.as_ref()
    }

    /// Record that this feed was included in the run at `now`.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        let stamp = Timestamp::new(now);
        self.source.insert(
            "last_included".to_owned(),
            Value::String(stamp.as_str().to_owned()),
        );
        self.fields.last_included = Some(stamp);
    }

    /// JSON object to persist.
    pub fn to_value(&self) -> Value {
        Value::Object(self.source.clone())
    }
}

#[cfg(test)]
impl FeedRecord {
    /// Minimal record for tests.
    pub fn new(title: &str, quality_score: f64) -> Self {
        let slug = title.to_ascii_lowercase().replace(' ', "-");
        let value = serde_json::json!({
            "title": title,
            "xmlUrl": format!("https://{slug}.example/feed.xml"),
            "quality_score": quality_score,
            "last_included": null,
        });
        let Value::Object(map) = value else {
            unreachable!("json! object literal")
        };
        Self::from_map(map).unwrap()
    }

    pub fn included_at(mut self, at: DateTime<Utc>) -> Self {
        self.stamp(at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_from_map_reads_known_fields() {
        let record = FeedRecord::from_map(object(json!({
            "title": "Lobsters",
            "xmlUrl": "https://lobste.rs/rss",
            "htmlUrl": "https://lobste.rs",
            "quality_score": 8,
            "category": "Tech",
            "last_included": "2025-01-01T00:00:00"
        })))
        .unwrap();

        assert_eq!(record.title(), "Lobsters");
        assert_eq!(record.xml_url(), "https://lobste.rs/rss");
        assert_eq!(record.html_url(), "https://lobste.rs");
        assert_eq!(record.quality_score(), 8.0);
        assert_eq!(record.category(), Some("Tech"));
        assert_eq!(
            record.last_included().map(Timestamp::as_str),
            Some("2025-01-01T00:00:00")
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let record = FeedRecord::from_map(object(json!({
            "title": "Bare",
            "xmlUrl": "https://bare.example/feed",
            "quality_score": 5.5
        })))
        .unwrap();

        assert_eq!(record.html_url(), "");
        assert_eq!(record.category(), None);
        assert!(record.last_included().is_none());
    }

    #[test]
    fn test_missing_quality_score() {
        let err = FeedRecord::from_map(object(json!({
            "title": "No score",
            "xmlUrl": "https://x.example/feed"
        })))
        .unwrap_err();
        assert!(err.contains("quality_score"));
    }

    #[test]
    fn test_missing_xml_url() {
        let err = FeedRecord::from_map(object(json!({
            "title": "No url",
            "quality_score": 3
        })))
        .unwrap_err();
        assert!(err.contains("xmlUrl"));
    }

    #[test]
    fn test_quality_out_of_range() {
        let err = FeedRecord::from_map(object(json!({
            "title": "Too good",
            "xmlUrl": "https://x.example/feed",
            "quality_score": 11
        })))
        .unwrap_err();
        assert!(err.contains("outside"));
    }

    #[test]
    fn test_invalid_last_included() {
        let err = FeedRecord::from_map(object(json!({
            "title": "Bad date",
            "xmlUrl": "https://x.example/feed",
            "quality_score": 3,
            "last_included": "last tuesday"
        })))
        .unwrap_err();
        assert!(err.contains("last tuesday"));
    }

    #[test]
    fn test_stamp_keeps_other_keys_in_order() {
        let mut record = FeedRecord::from_map(object(json!({
            "title": "Ordered",
            "last_included": null,
            "xmlUrl": "https://o.example/feed",
            "quality_score": 7,
            "notes": "hand-picked"
        })))
        .unwrap();

        let now = chrono::DateTime::parse_from_rfc3339("2025-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        record.stamp(now);

        let value = record.to_value();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            ["title", "last_included", "xmlUrl", "quality_score", "notes"]
        );
        assert_eq!(value["last_included"], "2025-03-01T09:00:00Z");
        assert_eq!(value["quality_score"], 7);
        assert_eq!(record.last_included().unwrap().at(), now);
    }
}
