//! Tree-transformation engine: an ordered plugin runner over the parsed
//! SVG document.
//!
//! Each plugin is one full pass over the tree; plugins run strictly in the
//! order given, synchronously to completion. The engine knows nothing about
//! SFCs; the conversion layer only hands it a plugin list and a source
//! path.
//!
//! # Architecture
//!
//! ```text
//! svg text ──parse──► Document ──plugin₁..pluginₙ──► Document ──serialize──► svg text
//!                        ▲                                │
//!                        └──────── multipass (≤10) ◄──────┘
//! ```

pub mod attrs;
pub mod cleanup;
pub mod ids;
pub mod preset;
pub mod styles;

use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::tree::{self, Document};

pub use preset::{Preset, PresetOverrides};

/// Upper bound for multipass optimization, matching the classic engine.
pub const MAX_PASSES: usize = 10;

// ============================================================================
// Plugin Contract
// ============================================================================

/// Per-pass context handed to every plugin.
#[derive(Debug, Clone, Copy)]
pub struct PluginInfo<'a> {
    /// Absolute path of the source file, when the caller knows it.
    pub path: Option<&'a Path>,
    /// Zero-based optimization pass count.
    pub multipass_count: usize,
}

/// A transformation step over the document tree.
///
/// Implementations must be deterministic and synchronous; a failed step
/// aborts the whole conversion.
pub trait Plugin {
    fn name(&self) -> &str;

    fn apply(&self, doc: &mut Document, info: &PluginInfo<'_>) -> Result<()>;
}

// ============================================================================
// Runner
// ============================================================================

/// Engine invocation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizeOptions<'a> {
    /// Source path, forwarded to plugins via [`PluginInfo`].
    pub path: Option<&'a Path>,
    /// Repeat the pipeline while the serialized output keeps shrinking.
    pub multipass: bool,
}

/// Parse, run the plugin list in order, serialize.
///
/// With `multipass`, the whole pipeline repeats (bounded by
/// [`MAX_PASSES`]) until a pass stops shrinking the output.
pub fn optimize(
    svg: &str,
    plugins: &[Box<dyn Plugin + '_>],
    options: &OptimizeOptions<'_>,
) -> Result<String> {
    let mut doc = tree::parse(svg)?;
    let mut previous = svg.len();
    let mut passes = 0;

    loop {
        let info = PluginInfo {
            path: options.path,
            multipass_count: passes,
        };
        for plugin in plugins {
            plugin.apply(&mut doc, &info)?;
        }

        let out = tree::serialize(&doc);
        passes += 1;

        if !options.multipass || passes >= MAX_PASSES || out.len() >= previous {
            return Ok(out);
        }
        log::trace!("pass {passes} shrank output to {} bytes", out.len());
        previous = out.len();
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Names the conversion layer substitutes itself; they have no standalone
/// engine implementation and must fail loudly if they get here.
const PLACEHOLDER_PLUGINS: &[&str] = &[
    "extractCSS",
    "responsiveSVGAttrs",
    "setSVGAttrs",
    "modifySVGAttrs",
];

/// Resolve a builtin plugin by name.
///
/// `params` is only meaningful for `preset-default` (its `overrides`
/// table); other builtins ignore it.
pub fn create(
    name: &str,
    params: Option<&serde_json::Value>,
) -> Result<Arc<dyn Plugin + Send + Sync>> {
    if PLACEHOLDER_PLUGINS.contains(&name) {
        return Err(Error::PlaceholderPlugin(name.to_string()));
    }

    let plugin: Arc<dyn Plugin + Send + Sync> = match name {
        "preset-default" => Arc::new(Preset::with_overrides(PresetOverrides::from_params(params))),
        "removeComments" => Arc::new(cleanup::RemoveComments),
        "removeDoctype" => Arc::new(cleanup::RemoveDoctype),
        "removeXMLProcInst" => Arc::new(cleanup::RemoveXmlProcInst),
        "removeMetadata" => Arc::new(cleanup::RemoveMetadata),
        "removeTitle" => Arc::new(cleanup::RemoveTitle),
        "removeDesc" => Arc::new(cleanup::RemoveDesc),
        "removeEmptyText" => Arc::new(cleanup::RemoveEmptyText),
        "removeEmptyContainers" => Arc::new(cleanup::RemoveEmptyContainers),
        "removeUselessDefs" => Arc::new(cleanup::RemoveUselessDefs),
        "cleanupAttrs" => Arc::new(attrs::CleanupAttrs),
        "removeEmptyAttrs" => Arc::new(attrs::RemoveEmptyAttrs),
        "sortAttrs" => Arc::new(attrs::SortAttrs),
        "removeViewBox" => Arc::new(attrs::RemoveViewBox),
        "cleanupIds" => Arc::new(ids::CleanupIds),
        "inlineStyles" => Arc::new(styles::InlineStyles),
        _ => return Err(Error::UnknownPlugin(name.to_string())),
    };
    Ok(plugin)
}

/// Extract the fragment of a `url(#fragment)` attribute value,
/// case-insensitively on the `url` keyword.
pub(crate) fn url_reference(value: &str) -> Option<&str> {
    use std::sync::LazyLock;

    use regex::Regex;

    static URL_REF: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)^url\(\s*#([^)\s]+)\s*\)$").expect("url reference pattern is valid")
    });

    URL_REF
        .captures(value.trim())
        .and_then(|captures| captures.get(1))
        .map(|fragment| fragment.as_str())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_unknown_plugin() {
        assert!(matches!(
            create("sparkleAttrs", None),
            Err(Error::UnknownPlugin(name)) if name == "sparkleAttrs"
        ));
    }

    #[test]
    fn test_create_placeholder_fails_loudly() {
        for name in ["extractCSS", "responsiveSVGAttrs", "setSVGAttrs", "modifySVGAttrs"] {
            assert!(matches!(
                create(name, None),
                Err(Error::PlaceholderPlugin(n)) if n == name
            ));
        }
    }

    #[test]
    fn test_optimize_empty_pipeline_roundtrips() {
        let out = optimize(
            "<svg><rect/></svg>",
            &[],
            &OptimizeOptions::default(),
        )
        .unwrap();
        assert_eq!(out, "<svg><rect/></svg>");
    }

    #[test]
    fn test_optimize_propagates_parse_errors() {
        assert!(optimize("<svg><g></svg>", &[], &OptimizeOptions::default()).is_err());
    }

    #[test]
    fn test_multipass_runs_until_stable() {
        struct ShrinkOnFirstPass;
        impl Plugin for ShrinkOnFirstPass {
            fn name(&self) -> &str {
                "shrinkOnFirstPass"
            }
            fn apply(&self, doc: &mut Document, info: &PluginInfo<'_>) -> Result<()> {
                // Shrink once so a second pass runs, then stabilize.
                if info.multipass_count == 0
                    && let Some(root) = doc.root_mut()
                {
                    root.attrs.remove("data-long-attribute");
                }
                Ok(())
            }
        }

        let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(ShrinkOnFirstPass)];
        let out = optimize(
            r#"<svg data-long-attribute="xxxxxxxxxxxxxxxx"><rect/></svg>"#,
            &plugins,
            &OptimizeOptions {
                path: None,
                multipass: true,
            },
        )
        .unwrap();
        assert_eq!(out, "<svg><rect/></svg>");
    }

    #[test]
    fn test_url_reference() {
        assert_eq!(url_reference("url(#grad)"), Some("grad"));
        assert_eq!(url_reference("URL(#grad)"), Some("grad"));
        assert_eq!(url_reference("url( #grad )"), Some("grad"));
        assert_eq!(url_reference("url(image.png)"), None);
        assert_eq!(url_reference("red"), None);
    }
}
