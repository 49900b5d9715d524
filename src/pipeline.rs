//! Plugin pipeline assembly.
//!
//! The assembler turns the user configuration into an ordered list of
//! [`Step`]s exactly once per build session; the list is immutable
//! afterwards and shared read-only by every conversion. Two modes exist:
//!
//! - **preset**: the option-driven default pipeline (`responsive`,
//!   `uniqueId`, minify-or-sanitize, default cleanup, `svgProps`,
//!   `extractStyles`, deferred sorting/defs cleanup), in that fixed order;
//! - **explicit**: the user supplies `svgo.plugins` and takes full manual
//!   control; the preset toggles are ignored and only the internal
//!   shorthand names are still substituted.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::Result;
use crate::optimize::{self, Plugin, PluginInfo, Preset, PresetOverrides};
use crate::options::{BuildMode, SvgProps, SvgSfcOptions};
use crate::sfc::{
    Sinks,
    extract::ExtractCss,
    props::{RemoveDefaultAttrs, SetSvgAttrs},
    responsive::ResponsiveSvgAttrs,
    unique_id::{RewriteIds, RewriteRefs},
};
use crate::tree::Document;

// ============================================================================
// Plugin Specification
// ============================================================================

/// One entry of an explicit `svgo.plugins` list.
///
/// Entries are a tagged variant: a bare engine plugin name, a name with a
/// `params` payload, or a custom implementation supplied programmatically.
/// The assembler resolves all of them into a uniform step representation
/// before the engine ever runs.
#[derive(Clone)]
pub enum PluginSpec {
    /// `"removeComments"`
    Name(String),
    /// `{ name: "preset-default", params: {...} }`
    WithParams {
        name: String,
        params: serde_json::Value,
    },
    /// A caller-provided plugin implementation.
    Custom(Arc<dyn Plugin + Send + Sync>),
}

impl PluginSpec {
    /// Shorthand for a named entry.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl fmt::Debug for PluginSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::WithParams { name, params } => f
                .debug_struct("WithParams")
                .field("name", name)
                .field("params", params)
                .finish(),
            Self::Custom(plugin) => f.debug_tuple("Custom").field(&plugin.name()).finish(),
        }
    }
}

impl<'de> Deserialize<'de> for PluginSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Entry {
                name: String,
                #[serde(default)]
                params: Option<serde_json::Value>,
            },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Name(name) | Raw::Entry { name, params: None } => Self::Name(name),
            Raw::Entry {
                name,
                params: Some(params),
            } => Self::WithParams { name, params },
        })
    }
}

// ============================================================================
// Resolved Steps
// ============================================================================

/// A resolved pipeline step.
///
/// Stateless steps are shared across all conversions; the sink-writing
/// steps stay descriptors here and are instantiated against each call's
/// [`Sinks`].
pub(crate) enum Step {
    Shared(Arc<dyn Plugin + Send + Sync>),
    ExtractCss,
    RewriteIds,
    RewriteRefs,
}

impl Step {
    fn shared(plugin: impl Plugin + Send + Sync + 'static) -> Self {
        Self::Shared(Arc::new(plugin))
    }

    /// Bind this step to one conversion's sinks.
    pub(crate) fn instantiate(&self, sinks: &Sinks) -> Box<dyn Plugin> {
        match self {
            Self::Shared(plugin) => Box::new(SharedStep(Arc::clone(plugin))),
            Self::ExtractCss => Box::new(ExtractCss::new(Rc::clone(&sinks.styles))),
            Self::RewriteIds => Box::new(RewriteIds::new(Rc::clone(&sinks.ids))),
            Self::RewriteRefs => Box::new(RewriteRefs::new(Rc::clone(&sinks.ids))),
        }
    }
}

/// Adapter so a session-shared plugin can join a per-call `Box` pipeline.
struct SharedStep(Arc<dyn Plugin + Send + Sync>);

impl Plugin for SharedStep {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn apply(&self, doc: &mut Document, info: &PluginInfo<'_>) -> Result<()> {
        self.0.apply(doc, info)
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// Build the pipeline for a session. `None` means `svgo: false`: skip tree
/// transformation entirely.
pub(crate) fn assemble(
    options: &SvgSfcOptions,
    mode: BuildMode,
) -> Result<Option<Vec<Step>>> {
    if options.svgo.is_disabled() {
        return Ok(None);
    }

    let config = options.svgo.config();
    let steps = match &config.plugins {
        Some(specs) => resolve(specs)?,
        None => preset_pipeline(options, mode),
    };
    Ok(Some(steps))
}

/// Explicit mode: substitute internal shorthand, hand everything else to
/// the engine registry verbatim.
fn resolve(specs: &[PluginSpec]) -> Result<Vec<Step>> {
    let mut steps = Vec::with_capacity(specs.len());

    for spec in specs {
        let (name, params) = match spec {
            PluginSpec::Custom(plugin) => {
                steps.push(Step::Shared(Arc::clone(plugin)));
                continue;
            }
            PluginSpec::Name(name) => (name.as_str(), None),
            PluginSpec::WithParams { name, params } => (name.as_str(), Some(params)),
        };

        let step = match name {
            "extractCSS" => Step::ExtractCss,
            "responsiveSVGAttrs" => Step::shared(ResponsiveSvgAttrs),
            "setSVGAttrs" | "modifySVGAttrs" => {
                let props = match params {
                    Some(serde_json::Value::Object(map)) => SvgProps::Map(map.clone()),
                    _ => SvgProps::Map(serde_json::Map::new()),
                };
                Step::shared(SetSvgAttrs::new(props))
            }
            _ => Step::Shared(optimize::create(name, params)?),
        };
        steps.push(step);
    }

    Ok(steps)
}

/// Preset mode: the option-driven pipeline, in its fixed order.
fn preset_pipeline(options: &SvgSfcOptions, mode: BuildMode) -> Vec<Step> {
    let minify = options.minify_for(mode);
    let mut steps = Vec::new();

    if options.responsive {
        steps.push(Step::shared(ResponsiveSvgAttrs));
    }

    if options.unique_id {
        steps.push(Step::RewriteIds);
        steps.push(Step::RewriteRefs);
    }

    if minify {
        // Ids may be referenced from outside the component and the
        // responsive step relies on viewBox for proportions; neither may
        // be stripped. sortAttrs and removeUselessDefs move out of the
        // preset to run after style extraction.
        let mut overrides = PresetOverrides::default()
            .disable("cleanupIds")
            .disable("removeViewBox")
            .disable("sortAttrs")
            .disable("removeUselessDefs");
        if options.extract_styles {
            overrides = overrides.disable("inlineStyles");
        }
        steps.push(Step::shared(Preset::with_overrides(overrides)));
    } else {
        // Keep the template to a single root node without minifying.
        steps.push(Step::shared(optimize::cleanup::RemoveComments));
        steps.push(Step::shared(optimize::cleanup::RemoveDoctype));
        steps.push(Step::shared(optimize::cleanup::RemoveXmlProcInst));
    }

    steps.push(Step::shared(RemoveDefaultAttrs));

    if let Some(props) = &options.svg_props {
        steps.push(Step::shared(SetSvgAttrs::new(props.clone())));
    }

    if options.extract_styles {
        steps.push(Step::ExtractCss);
    }

    if minify {
        // sortAttrs must see the attributes svgProps added; defs emptied
        // by style extraction must still be cleaned.
        steps.push(Step::shared(optimize::attrs::SortAttrs));
        steps.push(Step::shared(optimize::cleanup::RemoveUselessDefs));
    }

    steps
}

// ============================================================================
// Tests
// ============================================================================
