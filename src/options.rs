//! Conversion options.
//!
//! Mirrors the configuration surface a host bundler passes to the plugin:
//!
//! ```toml
//! extractStyles = true
//! uniqueId = false
//! mark = "sfc"
//!
//! [svgo]
//! multipass = true
//! ```
//!
//! Options deserialize with camelCase keys so the same configuration file
//! can feed both the host bundler and this crate. All fields default; an
//! empty table is a valid configuration.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::pipeline::PluginSpec;
use crate::tree::AttrMap;

// ============================================================================
// Build Mode
// ============================================================================

/// Build mode reported by the host bundler at session start.
///
/// Only affects the `minify` default: production minifies, development keeps
/// the structural sanitizers for readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    /// Check if this is development mode.
    #[inline]
    pub const fn is_dev(self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is production mode.
    #[inline]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

// ============================================================================
// Root Attribute Injection
// ============================================================================

/// Callback form of [`SvgProps`]: mutate the root attributes in place.
///
/// Receives the attribute map of the `<svg>` element, the absolute path of
/// the source file (when known) and the current optimization pass count.
pub type SvgPropsFn = dyn Fn(&mut AttrMap, Option<&Path>, usize) + Send + Sync;

/// Attributes to inject into the root `<svg>` element.
///
/// The static map merges its pairs into the root attributes, overwriting
/// existing keys. The callback form can perform arbitrary edits, including
/// deletions. Both are one functional contract over the attribute map; the
/// map is just a pre-bound constant merge.
#[derive(Clone)]
pub enum SvgProps {
    /// Static key/value pairs, insertion order preserved.
    Map(serde_json::Map<String, serde_json::Value>),
    /// Arbitrary mutation of the root attribute map.
    Func(Arc<SvgPropsFn>),
}

impl SvgProps {
    /// Wrap a callback.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&mut AttrMap, Option<&Path>, usize) + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }
}

impl fmt::Debug for SvgProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for SvgProps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Only the static map is representable in a config file; callbacks
        // are supplied programmatically.
        serde_json::Map::deserialize(deserializer).map(Self::Map)
    }
}

// ============================================================================
// Engine Options
// ============================================================================

/// Engine sub-configuration: `false` disables tree transformation entirely,
/// a table configures it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SvgoOptions {
    /// `svgo = false` skips parsing and optimization; the raw file content
    /// is wrapped as-is. `svgo = true` is the default configuration.
    Toggle(bool),
    Config(SvgoConfig),
}

impl Default for SvgoOptions {
    fn default() -> Self {
        Self::Config(SvgoConfig::default())
    }
}

impl SvgoOptions {
    /// Check if tree transformation is disabled.
    #[inline]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Toggle(false))
    }

    /// Get the effective engine configuration.
    pub fn config(&self) -> SvgoConfig {
        match self {
            Self::Config(config) => config.clone(),
            Self::Toggle(_) => SvgoConfig::default(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SvgoConfig {
    /// Repeat the pipeline while the output keeps shrinking (at most ten
    /// passes), like the engine's multipass mode.
    pub multipass: bool,

    /// Explicit plugin list. When present, the preset toggles (`minify`,
    /// `responsive`, `extractStyles`, `svgProps`) are ignored and the caller
    /// has full manual control; internal shorthand names are still
    /// substituted.
    pub plugins: Option<Vec<PluginSpec>>,
}

// ============================================================================
// Conversion Options
// ============================================================================

/// Options controlling how an SVG file becomes an SFC.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SvgSfcOptions {
    /// Minify the SVG. Unset defaults to true in production mode.
    pub minify: Option<bool>,

    /// Replace sizing/color attributes on `<svg>` with reactive values:
    /// `width`/`height` become `1em`, non-transparent `fill`/`stroke`
    /// become `currentColor`.
    pub responsive: bool,

    /// Extract all `<style>` elements into a scoped SFC style block.
    pub extract_styles: bool,

    /// Rewrite element ids to per-instance unique values so the component
    /// can be mounted multiple times on one page.
    pub unique_id: bool,

    /// Attributes to add to the root `<svg>` element.
    pub svg_props: Option<SvgProps>,

    /// Engine configuration; set to `false` to disable processing SVG data.
    pub svgo: SvgoOptions,

    /// Query parameter that makes an `.svg` import resolve to an SFC.
    pub mark: String,
}

impl Default for SvgSfcOptions {
    fn default() -> Self {
        Self {
            minify: None,
            responsive: true,
            extract_styles: true,
            unique_id: false,
            svg_props: None,
            svgo: SvgoOptions::default(),
            mark: "sfc".to_string(),
        }
    }
}

impl SvgSfcOptions {
    /// Effective `minify` setting for the given build mode.
    #[inline]
    pub fn minify_for(&self, mode: BuildMode) -> bool {
        self.minify.unwrap_or(mode.is_production())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> SvgSfcOptions {
        toml::from_str(toml).expect("options should parse")
    }

    #[test]
    fn test_defaults() {
        let options = parse("");
        assert_eq!(options.minify, None);
        assert!(options.responsive);
        assert!(options.extract_styles);
        assert!(!options.unique_id);
        assert!(options.svg_props.is_none());
        assert!(!options.svgo.is_disabled());
        assert_eq!(options.mark, "sfc");
    }

    #[test]
    fn test_minify_default_follows_mode() {
        let options = parse("");
        assert!(!options.minify_for(BuildMode::Development));
        assert!(options.minify_for(BuildMode::Production));

        let options = parse("minify = false");
        assert!(!options.minify_for(BuildMode::Production));
    }

    #[test]
    fn test_svgo_disabled() {
        let options = parse("svgo = false");
        assert!(options.svgo.is_disabled());

        let options = parse("svgo = true");
        assert!(!options.svgo.is_disabled());
    }

    #[test]
    fn test_svgo_config() {
        let options = parse("[svgo]\nmultipass = true");
        let config = options.svgo.config();
        assert!(config.multipass);
        assert!(config.plugins.is_none());
    }

    #[test]
    fn test_svg_props_map() {
        let options = parse("[svgProps]\n\":data-foo\" = \"1\"\nviewBox = \"0 0 5 5\"");
        let Some(SvgProps::Map(map)) = options.svg_props else {
            panic!("expected static map");
        };
        // Insertion order is part of the contract.
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, [":data-foo", "viewBox"]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<SvgSfcOptions, _> = toml::from_str("svgoo = false");
        assert!(result.is_err());
    }

    #[test]
    fn test_camel_case_keys() {
        let options = parse("extractStyles = false\nuniqueId = true");
        assert!(!options.extract_styles);
        assert!(options.unique_id);
    }
}
