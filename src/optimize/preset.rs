//! The default optimization preset.

use std::sync::Arc;

use super::{Plugin, PluginInfo, attrs, cleanup, ids, styles};
use crate::error::Result;
use crate::tree::Document;

/// Builtin plugins the preset runs, in order.
const PRESET_ORDER: &[&str] = &[
    "removeDoctype",
    "removeXMLProcInst",
    "removeComments",
    "removeMetadata",
    "removeTitle",
    "removeDesc",
    "cleanupAttrs",
    "removeEmptyText",
    "inlineStyles",
    "cleanupIds",
    "removeViewBox",
    "removeEmptyAttrs",
    "removeEmptyContainers",
    "removeUselessDefs",
    "sortAttrs",
];

/// Per-plugin disable switches for [`Preset`].
///
/// The SFC preset pipeline uses these to keep ids and `viewBox`, and to
/// pull `sortAttrs`/`removeUselessDefs` out of the preset so they can run
/// after style extraction instead.
#[derive(Debug, Clone, Default)]
pub struct PresetOverrides {
    disabled: Vec<String>,
}

impl PresetOverrides {
    /// Disable one of the preset's plugins.
    pub fn disable(mut self, name: &str) -> Self {
        self.disabled.push(name.to_string());
        self
    }

    /// Check whether a plugin is disabled.
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|d| d == name)
    }

    /// Read overrides from plugin params: `{ "overrides": { name: false } }`.
    pub fn from_params(params: Option<&serde_json::Value>) -> Self {
        let mut overrides = Self::default();
        let entries = params
            .and_then(|p| p.get("overrides"))
            .and_then(|o| o.as_object());
        if let Some(entries) = entries {
            for (name, value) in entries {
                if value.as_bool() == Some(false) {
                    overrides.disabled.push(name.clone());
                }
            }
        }
        overrides
    }
}

/// The engine's default plugin set, as a single composite plugin.
pub struct Preset {
    plugins: Vec<Arc<dyn Plugin + Send + Sync>>,
}

impl Preset {
    pub fn new() -> Self {
        Self::with_overrides(PresetOverrides::default())
    }

    pub fn with_overrides(overrides: PresetOverrides) -> Self {
        let mut plugins: Vec<Arc<dyn Plugin + Send + Sync>> = Vec::new();
        for name in PRESET_ORDER {
            if overrides.is_disabled(name) {
                continue;
            }
            let plugin: Arc<dyn Plugin + Send + Sync> = match *name {
                "removeDoctype" => Arc::new(cleanup::RemoveDoctype),
                "removeXMLProcInst" => Arc::new(cleanup::RemoveXmlProcInst),
                "removeComments" => Arc::new(cleanup::RemoveComments),
                "removeMetadata" => Arc::new(cleanup::RemoveMetadata),
                "removeTitle" => Arc::new(cleanup::RemoveTitle),
                "removeDesc" => Arc::new(cleanup::RemoveDesc),
                "cleanupAttrs" => Arc::new(attrs::CleanupAttrs),
                "removeEmptyText" => Arc::new(cleanup::RemoveEmptyText),
                "inlineStyles" => Arc::new(styles::InlineStyles),
                "cleanupIds" => Arc::new(ids::CleanupIds),
                "removeViewBox" => Arc::new(attrs::RemoveViewBox),
                "removeEmptyAttrs" => Arc::new(attrs::RemoveEmptyAttrs),
                "removeEmptyContainers" => Arc::new(cleanup::RemoveEmptyContainers),
                "removeUselessDefs" => Arc::new(cleanup::RemoveUselessDefs),
                "sortAttrs" => Arc::new(attrs::SortAttrs),
                _ => continue,
            };
            plugins.push(plugin);
        }
        Self { plugins }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for Preset {
    fn name(&self) -> &str {
        "preset-default"
    }

    fn apply(&self, doc: &mut Document, info: &PluginInfo<'_>) -> Result<()> {
        for plugin in &self.plugins {
            plugin.apply(doc, info)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
