//! Attribute-level plugins.

use std::cmp::Ordering;

use super::{Plugin, PluginInfo};
use crate::error::Result;
use crate::tree::{Document, Element};

/// Normalize whitespace inside attribute values: trim and collapse runs of
/// spaces and newlines to a single space.
pub struct CleanupAttrs;

impl Plugin for CleanupAttrs {
    fn name(&self) -> &str {
        "cleanupAttrs"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        doc.for_each_element(&mut |el| {
            for (_, value) in el.attrs.iter_mut() {
                if value.chars().any(|c| c.is_whitespace()) {
                    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
                    *value = normalized;
                }
            }
        });
        Ok(())
    }
}

/// Remove attributes with empty values.
pub struct RemoveEmptyAttrs;

impl Plugin for RemoveEmptyAttrs {
    fn name(&self) -> &str {
        "removeEmptyAttrs"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        doc.for_each_element(&mut |el| {
            el.attrs.retain(|_, value| !value.is_empty());
        });
        Ok(())
    }
}

/// Frequently-inspected attributes come first, in this order; everything
/// else sorts alphabetically behind them. Namespace declarations go to the
/// very front.
const SORT_ORDER: &[&str] = &[
    "id", "width", "height", "x", "x1", "x2", "y", "y1", "y2", "cx", "cy", "r", "fill", "stroke",
    "marker", "d", "points", "transform", "xlink:href",
];

/// Sort attributes into a conventional order so diffs between icons stay
/// small.
pub struct SortAttrs;

impl SortAttrs {
    fn rank(name: &str) -> usize {
        if name == "xmlns" || name.starts_with("xmlns:") {
            return 0;
        }
        match SORT_ORDER.iter().position(|known| *known == name) {
            Some(index) => index + 1,
            None => SORT_ORDER.len() + 1,
        }
    }
}

impl Plugin for SortAttrs {
    fn name(&self) -> &str {
        "sortAttrs"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        doc.for_each_element(&mut |el| {
            el.attrs.sort_by_name(|a, b| {
                let (ra, rb) = (Self::rank(a), Self::rank(b));
                match ra.cmp(&rb) {
                    Ordering::Equal if ra == SORT_ORDER.len() + 1 => a.cmp(b),
                    other => other,
                }
            });
        });
        Ok(())
    }
}

/// Remove a `viewBox` that repeats the element's own `width`/`height`.
///
/// Only applies to `svg`, `pattern` and `symbol`. The SFC preset disables
/// this plugin: the responsive step rewrites `width`/`height` to `1em`, so
/// the `viewBox` is what keeps the drawing proportioned.
pub struct RemoveViewBox;

impl RemoveViewBox {
    fn is_redundant(el: &Element) -> bool {
        let Some(view_box) = el.attrs.get("viewBox") else {
            return false;
        };
        let parts: Vec<&str> = view_box.split_whitespace().collect();
        let [x, y, w, h] = parts.as_slice() else {
            return false;
        };
        *x == "0"
            && *y == "0"
            && el.attrs.get("width").map(|v| v.trim_end_matches("px")) == Some(*w)
            && el.attrs.get("height").map(|v| v.trim_end_matches("px")) == Some(*h)
    }
}

impl Plugin for RemoveViewBox {
    fn name(&self) -> &str {
        "removeViewBox"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        doc.for_each_element(&mut |el| {
            if matches!(el.name.as_str(), "svg" | "pattern" | "symbol") && Self::is_redundant(el) {
                el.attrs.remove("viewBox");
            }
        });
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
