//! Style-extraction step.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::optimize::{Plugin, PluginInfo};
use crate::tree::{Document, Node};

/// Collect every `<style>` element's content into the style sink and
/// unlink the element from the tree.
///
/// Fragments land in the sink in document order; the convertor emits them
/// as one scoped SFC style block. Runs before the deferred
/// `removeUselessDefs` pass so a `<defs>` that only held styles gets
/// cleaned up afterwards.
pub struct ExtractCss {
    styles: Rc<RefCell<Vec<String>>>,
}

impl ExtractCss {
    pub fn new(styles: Rc<RefCell<Vec<String>>>) -> Self {
        Self { styles }
    }

    fn extract(children: &mut Vec<Node>, styles: &mut Vec<String>) {
        children.retain_mut(|node| {
            let Node::Element(el) = node else {
                return true;
            };
            if el.is_tag("style") {
                styles.push(el.text_content());
                return false;
            }
            Self::extract(&mut el.children, styles);
            true
        });
    }
}

impl Plugin for ExtractCss {
    fn name(&self) -> &str {
        "extractCSS"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        Self::extract(&mut doc.children, &mut self.styles.borrow_mut());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{parse, serialize};

    fn run(svg: &str) -> (String, Vec<String>) {
        let styles = Rc::new(RefCell::new(Vec::new()));
        let mut doc = parse(svg).unwrap();
        let info = PluginInfo {
            path: None,
            multipass_count: 0,
        };
        ExtractCss::new(Rc::clone(&styles))
            .apply(&mut doc, &info)
            .unwrap();
        (serialize(&doc), styles.take())
    }

    #[test]
    fn test_styles_collected_in_document_order() {
        let (out, styles) = run(concat!(
            "<svg>",
            "<style>.a{fill:red}</style>",
            "<g><style>.b{fill:blue}</style><rect/></g>",
            "</svg>",
        ));
        assert_eq!(out, "<svg><g><rect/></g></svg>");
        assert_eq!(styles, [".a{fill:red}", ".b{fill:blue}"]);
    }

    #[test]
    fn test_cdata_content_collected() {
        let (out, styles) = run("<svg><style><![CDATA[.a>.b{fill:red}]]></style><rect/></svg>");
        assert_eq!(out, "<svg><rect/></svg>");
        assert_eq!(styles, [".a>.b{fill:red}"]);
    }

    #[test]
    fn test_no_styles_leaves_sink_empty() {
        let (out, styles) = run("<svg><rect/></svg>");
        assert_eq!(out, "<svg><rect/></svg>");
        assert!(styles.is_empty());
    }
}
