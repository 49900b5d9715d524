//! Id cleanup plugin.

use rustc_hash::FxHashSet;

use super::{Plugin, PluginInfo, url_reference};
use crate::error::Result;
use crate::tree::Document;

/// Remove `id` attributes nothing in the document references.
///
/// References are collected from `href`/`xlink:href` fragments and from
/// `url(#...)` attribute values. Unlike the classic engine this does not
/// rename surviving ids; the SFC preset disables the plugin anyway because
/// component-internal ids may be referenced from outside the component.
pub struct CleanupIds;

impl CleanupIds {
    fn collect_references(doc: &mut Document) -> FxHashSet<String> {
        let mut referenced = FxHashSet::default();
        doc.for_each_element(&mut |el| {
            for (name, value) in el.attrs.iter() {
                if matches!(name, "href" | "xlink:href") {
                    if let Some(fragment) = value.strip_prefix('#') {
                        referenced.insert(fragment.to_string());
                    }
                } else if let Some(fragment) = url_reference(value) {
                    referenced.insert(fragment.to_string());
                }
            }
        });
        referenced
    }
}

impl Plugin for CleanupIds {
    fn name(&self) -> &str {
        "cleanupIds"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        let referenced = Self::collect_references(doc);
        doc.for_each_element(&mut |el| {
            if let Some(id) = el.attrs.get("id")
                && !referenced.contains(id)
            {
                el.attrs.remove("id");
            }
        });
        Ok(())
    }
}
