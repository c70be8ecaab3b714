//! XML text to [`Element`] tree.

use super::tree::{Element, Node};
use quick_xml::{
    Reader,
    escape::resolve_predefined_entity,
    events::{BytesStart, Event},
};

/// An element still waiting for its closing tag, plus the text seen since
/// its last child.
struct Open {
    element: Element,
    text: String,
}

impl Open {
    fn new(element: Element) -> Self {
        Self {
            element,
            text: String::new(),
        }
    }

    /// Move buffered text into the element. Whitespace-only runs are
    /// indentation and are dropped.
    fn flush_text(&mut self) {
        let text = std::mem::take(&mut self.text);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.element.push(Node::Text(trimmed.to_owned()));
        }
    }
}

/// Parse `content` into its root element.
///
/// Declarations, comments, processing instructions and doctypes are
/// skipped. The error is a human-readable reason.
pub fn parse_element(content: &str) -> Result<Element, String> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Open> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            format!("XML parse error at position {}: {e}", reader.error_position())
        })?;

        match event {
            Event::Start(start) => {
                let element = element_from(&start, &reader)?;
                if let Some(parent) = stack.last_mut() {
                    parent.flush_text();
                }
                stack.push(Open::new(element));
            }
            Event::Empty(start) => {
                let element = element_from(&start, &reader)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                // Mismatched end names are rejected by the reader itself
                let mut open = stack
                    .pop()
                    .ok_or_else(|| "unexpected closing tag".to_owned())?;
                open.flush_text();
                attach(&mut stack, &mut root, open.element)?;
            }
            Event::Text(text) => {
                let text = text.decode().map_err(|e| e.to_string())?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let text = data.decode().map_err(|e| e.to_string())?;
                push_text(&mut stack, &text)?;
            }
            Event::GeneralRef(reference) => {
                let resolved = match reference.resolve_char_ref().map_err(|e| e.to_string())? {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = reference.decode().map_err(|e| e.to_string())?;
                        resolve_predefined_entity(&name)
                            .ok_or_else(|| format!("unknown entity `&{name};`"))?
                            .to_owned()
                    }
                };
                push_text(&mut stack, &resolved)?;
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctypes
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.element.name));
    }
    root.ok_or_else(|| "document has no root element".to_owned())
}

fn element_from(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element, String> {
    let decoder = reader.decoder();
    let name = decoder
        .decode(start.name().as_ref())
        .map_err(|e| e.to_string())?
        .into_owned();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = decoder
            .decode(attr.key.as_ref())
            .map_err(|e| e.to_string())?
            .into_owned();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| e.to_string())?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

/// Hand a finished element to its parent, or make it the root.
fn attach(stack: &mut [Open], root: &mut Option<Element>, element: Element) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.flush_text();
            parent.element.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(format!(
            "second root element <{}> after the document element",
            element.name
        )),
    }
}

fn push_text(stack: &mut [Open], text: &str) -> Result<(), String> {
    match stack.last_mut() {
        Some(open) => {
            open.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err("text outside the root element".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_outlines() {
        let root = parse_element(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<opml version="2.0">
  <head><title>Mine</title></head>
  <body>
    <outline text="Tech">
      <outline type="rss" text="Lobsters" xmlUrl="https://lobste.rs/rss"/>
    </outline>
  </body>
</opml>"#,
        )
        .unwrap();

        assert_eq!(root.name, "opml");
        assert_eq!(root.attr("version"), Some("2.0"));
        let head = root.child("head").unwrap();
        assert_eq!(head.child("title").unwrap().text(), "Mine");

        let tech = root.child("body").unwrap().child("outline").unwrap();
        assert_eq!(tech.children.len(), 1);
        let feed = tech.child("outline").unwrap();
        assert_eq!(feed.attr("xmlUrl"), Some("https://lobste.rs/rss"));
        assert!(feed.children.is_empty());
    }

    #[test]
    fn test_entities_resolved() {
        let root = parse_element(
            r#"<outline text="Q&amp;A &#8212; &quot;live&quot;"><title>Tom &amp; Jerry&#33;</title></outline>"#,
        )
        .unwrap();

        assert_eq!(root.attr("text"), Some("Q&A \u{2014} \"live\""));
        assert_eq!(root.child("title").unwrap().text(), "Tom & Jerry!");
    }

    #[test]
    fn test_comments_and_cdata() {
        let root = parse_element("<a><!-- skip --><b><![CDATA[x < y]]></b></a>").unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.child("b").unwrap().text(), "x < y");
    }

    #[test]
    fn test_indentation_dropped() {
        let root = parse_element("<a>\n  <b/>\n  <c/>\n</a>").unwrap();
        assert_eq!(root.children.len(), 2);
        assert!(root.elements().all(|e| e.children.is_empty()));
    }

    #[test]
    fn test_mismatched_close_rejected() {
        assert!(parse_element("<a><b></a>").is_err());
    }

    #[test]
    fn test_unclosed_rejected() {
        assert!(parse_element("<a><b/>").is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = parse_element("   ").unwrap_err();
        assert!(err.contains("no root"));
    }

    #[test]
    fn test_second_root_rejected() {
        let err = parse_element("<a/><b/>").unwrap_err();
        assert!(err.contains("<b>"));
    }

    #[test]
    fn test_stray_text_rejected() {
        assert!(parse_element("<a/>trailing").is_err());
    }
}
