//! Reactive-attribute step.

use crate::error::Result;
use crate::optimize::{Plugin, PluginInfo};
use crate::tree::Document;

/// Make the root `<svg>` inherit color and size from surrounding CSS.
///
/// Non-transparent `fill`/`stroke` become `currentColor` (a missing `fill`
/// defaults to black, so it is rewritten too); `width` and `height` become
/// `1em` so the icon scales with the font size.
pub struct ResponsiveSvgAttrs;

impl Plugin for ResponsiveSvgAttrs {
    fn name(&self) -> &str {
        "responsiveSVGAttrs"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        let Some(root) = doc.root_mut() else {
            return Ok(());
        };
        if !root.is_tag("svg") {
            return Ok(());
        }

        if let Some(stroke) = root.attrs.get("stroke")
            && stroke != "none"
        {
            root.attrs.set("stroke", "currentColor");
        }
        if root.attrs.get("fill") != Some("none") {
            root.attrs.set("fill", "currentColor");
        }
        root.attrs.set("width", "1em");
        root.attrs.set("height", "1em");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse;

    fn run(svg: &str) -> Document {
        let mut doc = parse(svg).unwrap();
        let info = PluginInfo {
            path: None,
            multipass_count: 0,
        };
        ResponsiveSvgAttrs.apply(&mut doc, &info).unwrap();
        doc
    }

    #[test]
    fn test_stroke_and_fill_rewritten() {
        let doc = run(r##"<svg stroke="red" fill="#fff"/>"##);
        let attrs = &doc.root().unwrap().attrs;
        assert_eq!(attrs.get("stroke"), Some("currentColor"));
        assert_eq!(attrs.get("fill"), Some("currentColor"));
        assert_eq!(attrs.get("width"), Some("1em"));
        assert_eq!(attrs.get("height"), Some("1em"));
    }

    #[test]
    fn test_none_values_kept() {
        let doc = run(r#"<svg stroke="none" fill="none" width="24" height="24"/>"#);
        let attrs = &doc.root().unwrap().attrs;
        // Transparent paint stays transparent; size still becomes reactive.
        assert_eq!(attrs.get("stroke"), Some("none"));
        assert_eq!(attrs.get("fill"), Some("none"));
        assert_eq!(attrs.get("width"), Some("1em"));
        assert_eq!(attrs.get("height"), Some("1em"));
    }

    #[test]
    fn test_missing_attributes() {
        let doc = run("<svg/>");
        let attrs = &doc.root().unwrap().attrs;
        // No stroke attribute means no stroke is painted: leave it alone.
        assert_eq!(attrs.get("stroke"), None);
        // A missing fill paints black, so it becomes reactive.
        assert_eq!(attrs.get("fill"), Some("currentColor"));
    }

    #[test]
    fn test_nested_svg_untouched() {
        let doc = run(r#"<svg fill="none"><svg fill="red"/></svg>"#);
        let root = doc.root().unwrap();
        let nested = root.children[0].as_element().unwrap();
        assert_eq!(nested.attrs.get("fill"), Some("red"));
    }
}
