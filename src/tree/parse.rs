//! SVG parsing: quick-xml event stream to document tree.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use super::{AttrMap, Document, Element, Node};
use crate::error::Result;

/// Parse an SVG string into a [`Document`].
///
/// Malformed markup (mismatched tags, broken attributes, unknown entity
/// references) propagates as an error; a failed parse never yields a
/// partial tree.
pub fn parse(svg: &str) -> Result<Document> {
    let mut reader = Reader::from_str(svg);
    let mut doc = Document::default();
    // Open elements; the reader checks end-tag names, so every `End` event
    // matches the top of this stack.
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                append(&mut doc, &mut stack, Node::Element(element));
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    append(&mut doc, &mut stack, Node::Element(element));
                }
            }
            Event::Text(text) => {
                append_text(&mut doc, &mut stack, &decode(&text));
            }
            Event::GeneralRef(entity) => {
                // Entity references arrive as their own events; resolve the
                // predefined and numeric ones, reject everything else.
                let name = decode(&entity);
                let resolved = unescape(&format!("&{name};"))?.into_owned();
                append_text(&mut doc, &mut stack, &resolved);
            }
            Event::CData(data) => {
                append(&mut doc, &mut stack, Node::CData(decode(&data)));
            }
            Event::Comment(text) => {
                append(&mut doc, &mut stack, Node::Comment(decode(&text)));
            }
            Event::Decl(decl) => {
                append(&mut doc, &mut stack, Node::ProcInst(decode(&decl)));
            }
            Event::PI(pi) => {
                append(&mut doc, &mut stack, Node::ProcInst(decode(&pi)));
            }
            Event::DocType(text) => {
                append(&mut doc, &mut stack, Node::Doctype(decode(&text)));
            }
            Event::Eof => break,
        }
    }

    Ok(doc)
}

/// Build an element from a start tag, decoding attribute values.
fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let mut attrs = AttrMap::new();
    for attr in start.attributes() {
        let attr = attr?;
        let name = decode(attr.key.as_ref());
        let value = unescape(&decode(&attr.value))?.into_owned();
        attrs.set(name, value);
    }

    Ok(Element {
        name: decode(start.name().as_ref()),
        attrs,
        children: Vec::new(),
    })
}

/// Append a node to the current insertion point.
fn append(doc: &mut Document, stack: &mut Vec<Element>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => doc.children.push(node),
    }
}

/// Append text, merging with a preceding text node so entity references
/// resolved mid-run don't split the content.
fn append_text(doc: &mut Document, stack: &mut Vec<Element>, text: &str) {
    if text.is_empty() {
        return;
    }
    let children = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => &mut doc.children,
    };
    if let Some(Node::Text(last)) = children.last_mut() {
        last.push_str(text);
    } else {
        children.push(Node::Text(text.to_string()));
    }
}

/// Input is a `&str` slice, so the event bytes are always valid UTF-8.
#[inline]
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let doc = parse(r#"<svg viewBox="0 0 24 24"><rect width="10"/></svg>"#).unwrap();
        let root = doc.root().unwrap();
        assert!(root.is_tag("svg"));
        assert_eq!(root.attrs.get("viewBox"), Some("0 0 24 24"));
        assert_eq!(root.children.len(), 1);

        let rect = root.children[0].as_element().unwrap();
        assert!(rect.is_tag("rect"));
        assert_eq!(rect.attrs.get("width"), Some("10"));
    }

    #[test]
    fn test_parse_prolog() {
        let doc = parse(concat!(
            "<?xml version=\"1.0\"?>",
            "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"x.dtd\">",
            "<!-- generated -->",
            "<svg/>",
        ))
        .unwrap();

        assert!(matches!(&doc.children[0], Node::ProcInst(p) if p.starts_with("xml")));
        assert!(matches!(&doc.children[1], Node::Doctype(d) if d.starts_with("svg")));
        assert!(matches!(&doc.children[2], Node::Comment(c) if c.contains("generated")));
        assert!(doc.root().is_some());
    }

    #[test]
    fn test_parse_entities_in_attr_and_text() {
        let doc = parse(r#"<svg data-x="a&amp;b"><text>1 &lt; 2</text></svg>"#).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(root.attrs.get("data-x"), Some("a&b"));
        let text = root.children[0].as_element().unwrap();
        assert_eq!(text.text_content(), "1 < 2");
    }

    #[test]
    fn test_parse_cdata() {
        let doc = parse("<svg><style><![CDATA[.a>.b{fill:red}]]></style></svg>").unwrap();
        let style = doc.root().unwrap().children[0].as_element().unwrap();
        assert_eq!(style.text_content(), ".a>.b{fill:red}");
    }

    #[test]
    fn test_parse_mismatched_tags_fails() {
        assert!(parse("<svg><g></svg>").is_err());
    }

    #[test]
    fn test_parse_preserves_whitespace() {
        let doc = parse("<svg>\n  <rect/>\n</svg>").unwrap();
        let root = doc.root().unwrap();
        assert!(matches!(&root.children[0], Node::Text(t) if t == "\n  "));
    }
}
