//! Root-attribute injection and default-attribute cleanup.

use serde_json::Value;

use crate::error::Result;
use crate::optimize::{Plugin, PluginInfo};
use crate::options::SvgProps;
use crate::tree::{AttrMap, Document};

/// Apply user-supplied attributes to the root `<svg>` element.
///
/// The engine's stock attribute-adder cannot override existing attributes,
/// which is exactly what `svgProps` is for; hence this custom step. It runs
/// after the default-attribute cleanup (user overrides are never clobbered)
/// and before any attribute sorting (sorting sees the final key set).
pub struct SetSvgAttrs {
    params: SvgProps,
}

impl SetSvgAttrs {
    pub fn new(params: SvgProps) -> Self {
        Self { params }
    }

    fn merge(attrs: &mut AttrMap, pairs: &serde_json::Map<String, Value>) {
        for (name, value) in pairs {
            match value {
                // `null` deletes, mirroring what a callback can do.
                Value::Null => {
                    attrs.remove(name);
                }
                Value::String(s) => attrs.set(name.clone(), s.clone()),
                other => attrs.set(name.clone(), other.to_string()),
            }
        }
    }
}

impl Plugin for SetSvgAttrs {
    fn name(&self) -> &str {
        "setSVGAttrs"
    }

    fn apply(&self, doc: &mut Document, info: &PluginInfo<'_>) -> Result<()> {
        let Some(root) = doc.root_mut() else {
            return Ok(());
        };
        if !root.is_tag("svg") {
            return Ok(());
        }

        match &self.params {
            SvgProps::Map(pairs) => Self::merge(&mut root.attrs, pairs),
            SvgProps::Func(f) => f(&mut root.attrs, info.path, info.multipass_count),
        }
        Ok(())
    }
}

/// Delete root attributes that stop making sense once the SVG is embedded
/// as a component fragment: `xmlns` (the fragment lives inside a template),
/// `version` and the long-deprecated `xml:space`.
pub struct RemoveDefaultAttrs;

impl Plugin for RemoveDefaultAttrs {
    fn name(&self) -> &str {
        "removeDefaultAttrs"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        if let Some(root) = doc.root_mut()
            && root.is_tag("svg")
        {
            root.attrs.remove("xmlns");
            root.attrs.remove("version");
            root.attrs.remove("xml:space");
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
