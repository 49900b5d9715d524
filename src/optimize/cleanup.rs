//! Structural cleanup plugins.
//!
//! The comment/doctype/processing-instruction removers double as the
//! "structural sanitizers" of the non-minifying pipeline: they guarantee
//! the document keeps exactly one root element, which the SFC template
//! requires.

use super::{Plugin, PluginInfo};
use crate::error::Result;
use crate::tree::{Document, Element, Node};

/// Recursively drop nodes the predicate rejects, at every depth.
fn retain_nodes(children: &mut Vec<Node>, keep: &mut dyn FnMut(&Node) -> bool) {
    children.retain_mut(|node| {
        if !keep(node) {
            return false;
        }
        if let Node::Element(el) = node {
            retain_nodes(&mut el.children, keep);
        }
        true
    });
}

/// Recursively drop elements the predicate rejects, at every depth.
fn retain_elements(children: &mut Vec<Node>, drop: &mut dyn FnMut(&Element) -> bool) {
    retain_nodes(children, &mut |node| match node {
        Node::Element(el) => !drop(el),
        _ => true,
    });
}

macro_rules! node_remover {
    ($(#[$doc:meta])* $plugin:ident, $name:literal, $pattern:pat) => {
        $(#[$doc])*
        pub struct $plugin;

        impl Plugin for $plugin {
            fn name(&self) -> &str {
                $name
            }

            fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
                retain_nodes(&mut doc.children, &mut |node| !matches!(node, $pattern));
                Ok(())
            }
        }
    };
}

node_remover!(
    /// Remove comments everywhere in the document.
    RemoveComments, "removeComments", Node::Comment(_)
);
node_remover!(
    /// Remove the doctype declaration.
    RemoveDoctype, "removeDoctype", Node::Doctype(_)
);
node_remover!(
    /// Remove the XML declaration and any other processing instruction.
    RemoveXmlProcInst, "removeXMLProcInst", Node::ProcInst(_)
);

macro_rules! element_remover {
    ($(#[$doc:meta])* $plugin:ident, $name:literal, $tag:literal) => {
        $(#[$doc])*
        pub struct $plugin;

        impl Plugin for $plugin {
            fn name(&self) -> &str {
                $name
            }

            fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
                retain_elements(&mut doc.children, &mut |el| el.is_tag($tag));
                Ok(())
            }
        }
    };
}

element_remover!(
    /// Remove `<metadata>` elements.
    RemoveMetadata, "removeMetadata", "metadata"
);
element_remover!(
    /// Remove `<title>` elements.
    RemoveTitle, "removeTitle", "title"
);
element_remover!(
    /// Remove `<desc>` elements.
    RemoveDesc, "removeDesc", "desc"
);

/// Remove empty and whitespace-only text nodes, except inside `<text>` and
/// `<tspan>` where whitespace is rendered.
pub struct RemoveEmptyText;

impl RemoveEmptyText {
    fn clean(children: &mut Vec<Node>, preserve: bool) {
        children.retain(|node| match node {
            Node::Text(text) => preserve || !text.trim().is_empty(),
            _ => true,
        });
        for node in children.iter_mut() {
            if let Node::Element(el) = node {
                let preserve = preserve || el.is_tag("text") || el.is_tag("tspan");
                Self::clean(&mut el.children, preserve);
            }
        }
    }
}

impl Plugin for RemoveEmptyText {
    fn name(&self) -> &str {
        "removeEmptyText"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        Self::clean(&mut doc.children, false);
        Ok(())
    }
}

/// Container elements that render nothing by themselves.
const CONTAINERS: &[&str] = &[
    "a",
    "defs",
    "g",
    "marker",
    "mask",
    "missing-glyph",
    "pattern",
    "switch",
    "symbol",
];

/// Remove childless container elements.
///
/// Containers carrying an `id` are kept: they may be referenced from
/// outside the component.
pub struct RemoveEmptyContainers;

impl RemoveEmptyContainers {
    fn prune(children: &mut Vec<Node>) {
        // Bottom-up so nested empties collapse within one pass.
        for node in children.iter_mut() {
            if let Node::Element(el) = node {
                Self::prune(&mut el.children);
            }
        }
        children.retain(|node| match node {
            Node::Element(el) => {
                !(CONTAINERS.contains(&el.name.as_str())
                    && el.children.is_empty()
                    && !el.attrs.contains("id"))
            }
            _ => true,
        });
    }
}

impl Plugin for RemoveEmptyContainers {
    fn name(&self) -> &str {
        "removeEmptyContainers"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        Self::prune(&mut doc.children);
        Ok(())
    }
}

/// Remove `<defs>` content nothing can reference (no `id` anywhere in the
/// subtree), then the emptied `<defs>` itself.
///
/// Runs late in the SFC pipeline: style extraction may leave behind a
/// `<defs>` that only held a `<style>`.
pub struct RemoveUselessDefs;

impl RemoveUselessDefs {
    fn subtree_has_id(el: &Element) -> bool {
        el.attrs.contains("id")
            || el
                .children
                .iter()
                .filter_map(Node::as_element)
                .any(Self::subtree_has_id)
    }

    fn process(children: &mut Vec<Node>) {
        for node in children.iter_mut() {
            if let Node::Element(el) = node {
                if el.is_tag("defs") {
                    el.children.retain(|child| match child {
                        Node::Element(def) => Self::subtree_has_id(def),
                        _ => false,
                    });
                }
                Self::process(&mut el.children);
            }
        }
        children.retain(
            |node| !matches!(node, Node::Element(el) if el.is_tag("defs") && el.children.is_empty()),
        );
    }
}

impl Plugin for RemoveUselessDefs {
    fn name(&self) -> &str {
        "removeUselessDefs"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        Self::process(&mut doc.children);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{parse, serialize};

    fn run(plugin: &dyn Plugin, svg: &str) -> String {
        let mut doc = parse(svg).unwrap();
        let info = PluginInfo {
            path: None,
            multipass_count: 0,
        };
        plugin.apply(&mut doc, &info).unwrap();
        serialize(&doc)
    }

    #[test]
    fn test_sanitizers_leave_single_root() {
        let svg = "<?xml version=\"1.0\"?><!DOCTYPE svg><!-- a --><svg><!-- b --><rect/></svg>";
        let mut doc = parse(svg).unwrap();
        let info = PluginInfo {
            path: None,
            multipass_count: 0,
        };
        RemoveComments.apply(&mut doc, &info).unwrap();
        RemoveDoctype.apply(&mut doc, &info).unwrap();
        RemoveXmlProcInst.apply(&mut doc, &info).unwrap();

        assert_eq!(doc.children.len(), 1);
        assert_eq!(serialize(&doc), "<svg><rect/></svg>");
    }

    #[test]
    fn test_remove_metadata_and_title() {
        assert_eq!(
            run(&RemoveMetadata, "<svg><metadata>x</metadata><rect/></svg>"),
            "<svg><rect/></svg>"
        );
        assert_eq!(
            run(&RemoveTitle, "<svg><title>icon</title><rect/></svg>"),
            "<svg><rect/></svg>"
        );
    }

    #[test]
    fn test_remove_empty_text() {
        assert_eq!(
            run(&RemoveEmptyText, "<svg>\n  <rect/>\n</svg>"),
            "<svg><rect/></svg>"
        );
        // Whitespace inside <text> is rendered and must survive.
        assert_eq!(
            run(&RemoveEmptyText, "<svg><text>a<tspan> </tspan>b</text></svg>"),
            "<svg><text>a<tspan> </tspan>b</text></svg>"
        );
    }

    #[test]
    fn test_remove_empty_containers() {
        assert_eq!(
            run(&RemoveEmptyContainers, "<svg><g><g/></g><rect/></svg>"),
            "<svg><rect/></svg>"
        );
        // Keep containers with an id, they may be referenced externally.
        assert_eq!(
            run(&RemoveEmptyContainers, r#"<svg><g id="slot"/></svg>"#),
            r#"<svg><g id="slot"/></svg>"#
        );
    }

    #[test]
    fn test_remove_useless_defs() {
        assert_eq!(
            run(
                &RemoveUselessDefs,
                r#"<svg><defs><linearGradient id="g"/><path d="M0 0"/></defs><rect/></svg>"#
            ),
            r#"<svg><defs><linearGradient id="g"/></defs><rect/></svg>"#
        );
        // A defs emptied by the filter disappears entirely.
        assert_eq!(
            run(&RemoveUselessDefs, r#"<svg><defs><path d="M0 0"/></defs><rect/></svg>"#),
            "<svg><rect/></svg>"
        );
    }

    #[test]
    fn test_remove_useless_defs_keeps_nested_ids() {
        assert_eq!(
            run(
                &RemoveUselessDefs,
                r#"<svg><defs><g><path id="p"/></g></defs></svg>"#
            ),
            r#"<svg><defs><g><path id="p"/></g></defs></svg>"#
        );
    }
}
