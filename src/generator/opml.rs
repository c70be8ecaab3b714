//! Generated OPML document.
//!
//! # Output Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <opml version="2.0">
//!   <head>
//!     <title>Feed Rotation - Generated</title>
//!     <dateCreated>2025-01-31T08:15:00Z</dateCreated>
//!   </head>
//!   <body>
//!     <!-- core categories, unchanged -->
//!     <outline text="Discovery Rotation" title="Discovery Rotation">
//!       <outline type="rss" text="…" title="…" xmlUrl="…" htmlUrl="…"/>
//!     </outline>
//!   </body>
//! </opml>
//! ```

use crate::{
    config::OutputConfig,
    outline::{Element, Opml},
    pool::FeedRecord,
};
use chrono::{DateTime, SecondsFormat, Utc};

/// Build the output document from `core` and the selected records.
///
/// The core body is copied, so `core` stays usable afterwards. The
/// discovery category is appended only when `selected` is non-empty, and
/// keeps the order of `selected`.
pub fn compose(
    core: &Opml,
    selected: &[&FeedRecord],
    generated_at: DateTime<Utc>,
    output: &OutputConfig,
) -> Opml {
    let mut doc = Opml::new();

    doc.head = Element::new("head")
        .with_child(Element::new("title").with_text(output.title.as_str()))
        .with_child(
            Element::new("dateCreated")
                .with_text(generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );

    doc.body.children = core.body.children.clone();
    if !selected.is_empty() {
        doc.body.push(discovery_category(selected, output));
    }

    doc
}

fn discovery_category(selected: &[&FeedRecord], output: &OutputConfig) -> Element {
    let category = Element::new("outline")
        .with_attr("text", output.category.as_str())
        .with_attr("title", output.category.as_str());

    selected.iter().fold(category, |category, record| {
        category.with_child(entry(record, &output.entry_type))
    })
}

fn entry(record: &FeedRecord, entry_type: &str) -> Element {
    Element::new("outline")
        .with_attr("type", entry_type)
        .with_attr("text", record.title())
        .with_attr("title", record.title())
        .with_attr("xmlUrl", record.xml_url())
        .with_attr("htmlUrl", record.html_url())
}
