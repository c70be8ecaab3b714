//! OPML documents.
//!
//! The core feed tree is treated as opaque: whatever the `<body>` holds is
//! carried into the generated document unchanged. Only the root, `<head>`
//! and `<body>` are looked at.
//!
//! ```text
//! outline/
//! ├── tree     # Element, Node
//! ├── parse    # XML text -> Element
//! └── write    # Element -> XML text
//! ```

mod parse;
mod tree;
mod write;

pub use tree::{Element, Node};

use anyhow::Result;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const OPML_VERSION: &str = "2.0";

/// OPML loading errors
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("IO error when reading feed tree `{}`", .0.display())]
    Io(PathBuf, #[source] io::Error),

    #[error("malformed feed tree `{}`: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// An OPML document split into its three parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opml {
    /// Attributes of the `<opml>` root, `version` included.
    pub attributes: Vec<(String, String)>,
    pub head: Element,
    pub body: Element,
}

impl Opml {
    /// Empty OPML 2.0 document.
    pub fn new() -> Self {
        Self {
            attributes: vec![("version".to_owned(), OPML_VERSION.to_owned())],
            head: Element::new("head"),
            body: Element::new("body"),
        }
    }

    pub fn load(path: &Path) -> Result<Self, OutlineError> {
        let content =
            fs::read_to_string(path).map_err(|err| OutlineError::Io(path.to_path_buf(), err))?;
        Self::parse(&content, path)
    }

    /// Parse OPML text; `path` only labels errors.
    ///
    /// The root must be `<opml>` and must contain a `<body>`. A missing
    /// `<head>` is tolerated.
    pub fn parse(content: &str, path: &Path) -> Result<Self, OutlineError> {
        let malformed = |reason: String| OutlineError::Malformed {
            path: path.to_path_buf(),
            reason,
        };

        let root = parse::parse_element(content).map_err(malformed)?;
        if root.name != "opml" {
            return Err(malformed(format!(
                "root element is <{}>, expected <opml>",
                root.name
            )));
        }

        let Element {
            attributes,
            children,
            ..
        } = root;

        let mut head = None;
        let mut body = None;
        for node in children {
            if let Node::Element(element) = node {
                match element.name.as_str() {
                    "head" if head.is_none() => head = Some(element),
                    "body" if body.is_none() => body = Some(element),
                    _ => {}
                }
            }
        }

        Ok(Self {
            attributes,
            head: head.unwrap_or_else(|| Element::new("head")),
            body: body.ok_or_else(|| malformed("missing <body> element".into()))?,
        })
    }

    /// Number of elements anywhere under `<body>` whose `type` is
    /// `entry_type`.
    pub fn count_feeds(&self, entry_type: &str) -> usize {
        self.body
            .count_descendants(&|element: &Element| element.attr("type") == Some(entry_type))
    }

    /// Reassemble the root element.
    pub fn to_element(&self) -> Element {
        Element {
            name: "opml".to_owned(),
            attributes: self.attributes.clone(),
            children: vec![self.head.clone().into(), self.body.clone().into()],
        }
    }

    /// Serialize as an indented XML document.
    pub fn to_xml(&self) -> Result<String> {
        write::to_xml(&self.to_element())
    }
}

impl Default for Opml {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CORE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<opml version="1.0">
  <head>
    <title>My Core Feeds</title>
  </head>
  <body>
    <outline text="Tech" title="Tech">
      <outline type="rss" text="Lobsters" xmlUrl="https://lobste.rs/rss" htmlUrl="https://lobste.rs"/>
      <outline type="rss" text="LWN" xmlUrl="https://lwn.net/headlines/rss"/>
    </outline>
    <outline type="rss" text="Loose" xmlUrl="https://loose.example/feed"/>
    <outline type="atom" text="Other" xmlUrl="https://other.example/atom"/>
  </body>
</opml>
"#;

    fn parse(content: &str) -> Result<Opml, OutlineError> {
        Opml::parse(content, Path::new("core_feeds.opml"))
    }

    #[test]
    fn test_parse_core() {
        let opml = parse(CORE).unwrap();
        assert_eq!(opml.head.child("title").unwrap().text(), "My Core Feeds");
        assert_eq!(opml.body.elements().count(), 3);
        assert_eq!(opml.attributes, [("version".into(), "1.0".into())]);
    }

    #[test]
    fn test_count_feeds_recurses_and_filters_type() {
        let opml = parse(CORE).unwrap();
        assert_eq!(opml.count_feeds("rss"), 3);
        assert_eq!(opml.count_feeds("atom"), 1);
        assert_eq!(opml.count_feeds("link"), 0);
    }

    #[test]
    fn test_missing_head_tolerated() {
        let opml = parse("<opml version=\"2.0\"><body/></opml>").unwrap();
        assert!(opml.head.children.is_empty());
        assert!(opml.body.children.is_empty());
    }

    #[test]
    fn test_missing_body_rejected() {
        let err = parse("<opml version=\"2.0\"><head/></opml>").unwrap_err();
        assert!(err.to_string().contains("missing <body>"));
    }

    #[test]
    fn test_wrong_root_rejected() {
        let err = parse("<rss><channel/></rss>").unwrap_err();
        assert!(err.to_string().contains("<rss>"));
    }

    #[test]
    fn test_not_xml_rejected() {
        let err = parse("{\"feeds\": []}").unwrap_err();
        assert!(matches!(err, OutlineError::Malformed { .. }));
        assert!(err.to_string().contains("core_feeds.opml"));
    }

    #[test]
    fn test_round_trip_keeps_body() {
        let opml = parse(CORE).unwrap();
        let xml = opml.to_xml().unwrap();
        let reparsed = parse(&xml).unwrap();
        assert_eq!(reparsed, opml);
    }

    #[test]
    fn test_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("core_feeds.opml");
        fs::write(&path, CORE).unwrap();

        assert_eq!(Opml::load(&path).unwrap().count_feeds("rss"), 3);
        assert!(matches!(
            Opml::load(&dir.path().join("missing.opml")),
            Err(OutlineError::Io(..))
        ));
    }
}
