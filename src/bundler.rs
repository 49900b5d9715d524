//! Bundler integration shim.
//!
//! Maps the host bundler's resolve/load/hot-update hooks onto the
//! convertor. An import like `./icon.svg?sfc` resolves to the virtual
//! module `/abs/path/icon.svg.vue?sfc`; loading that module reads the real
//! file and returns the converted SFC text.
//!
//! The `.vue` suffix makes downstream plugins treat the virtual module as
//! a Vue file; keeping the original query string prevents the host's
//! dependency scanner from processing it as a plain asset.
//!
//! The shim owns no module graph and no cache: the host reports file
//! changes and owns invalidation, the convertor recomputes on every load.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use url::form_urlencoded;

use crate::convert::SvgSfcConvertor;
use crate::error::{Error, Result};
use crate::options::{BuildMode, SvgSfcOptions};

/// Suffix appended to the real file path to form the virtual module id.
const VIRTUAL_SUFFIX: &str = ".vue";

// ============================================================================
// Host Contracts
// ============================================================================

/// Module resolution, implemented by the host bundler.
pub trait Resolver {
    /// Resolve an import specifier to an absolute file path, or `None`
    /// when the file cannot be located.
    fn resolve(&self, specifier: &str, importer: Option<&Path>) -> Option<PathBuf>;
}

/// Filesystem-backed [`Resolver`]: absolute specifiers as-is, relative
/// specifiers against the importer's directory.
pub struct FsResolver;

impl Resolver for FsResolver {
    fn resolve(&self, specifier: &str, importer: Option<&Path>) -> Option<PathBuf> {
        let path = Path::new(specifier);
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            importer?.parent()?.join(path)
        };
        candidate.is_file().then_some(candidate)
    }
}

/// The host's view of which modules were loaded from which file.
pub trait ModuleGraph {
    /// Ids of currently loaded modules derived from the given file id.
    fn modules_by_file(&self, id: &str) -> Vec<String>;
}

// ============================================================================
// Plugin
// ============================================================================

/// The bundler-facing plugin surface.
///
/// Construct once per build; the convertor is created on the first
/// `config_resolved`/`build_start`/`load` call and reused for the whole
/// session.
pub struct SvgSfcPlugin {
    options: SvgSfcOptions,
    convertor: OnceLock<SvgSfcConvertor>,
}

impl SvgSfcPlugin {
    pub fn new(options: SvgSfcOptions) -> Self {
        Self {
            options,
            convertor: OnceLock::new(),
        }
    }

    /// Session start: build the convertor for the host's build mode.
    pub fn config_resolved(&self, mode: BuildMode) -> Result<()> {
        if self.convertor.get().is_some() {
            return Ok(());
        }
        let convertor = SvgSfcConvertor::new(self.options.clone(), mode)?;
        let _ = self.convertor.set(convertor);
        Ok(())
    }

    /// Fallback session start for hosts without a config stage (plain
    /// Rollup-style builds); defaults to development behavior.
    pub fn build_start(&self) -> Result<()> {
        self.convertor().map(|_| ())
    }

    fn convertor(&self) -> Result<&SvgSfcConvertor> {
        if let Some(convertor) = self.convertor.get() {
            return Ok(convertor);
        }
        let convertor = SvgSfcConvertor::new(self.options.clone(), BuildMode::Development)?;
        Ok(self.convertor.get_or_init(|| convertor))
    }

    fn has_mark(&self, query: Option<&str>) -> bool {
        query.is_some_and(|q| {
            form_urlencoded::parse(q.as_bytes()).any(|(key, _)| key == self.options.mark.as_str())
        })
    }

    /// Resolve an `.svg?<mark>` import (or a derived virtual id) to the
    /// virtual `.svg.vue` module, preserving the query string.
    ///
    /// Returns `Ok(None)` for everything this plugin does not own: other
    /// file types, `.svg` imports without the marker, bundler-internal
    /// `/@` specifiers.
    pub fn resolve_id(
        &self,
        id: &str,
        importer: Option<&Path>,
        resolver: &dyn Resolver,
    ) -> Result<Option<String>> {
        if id.starts_with("/@") {
            return Ok(None);
        }
        let (path, query) = parse_request(id);

        let target = if path.ends_with(".svg") && self.has_mark(query) {
            // Original import: *.svg?sfc
            path
        } else if path.ends_with(".svg.vue") {
            // Already-derived virtual id, or an SFC sub-request
            // (*.svg.vue?vue) coming back from the Vue plugin.
            &path[..path.len() - VIRTUAL_SUFFIX.len()]
        } else {
            return Ok(None);
        };

        let resolved = resolver
            .resolve(target, importer)
            .ok_or_else(|| Error::Resolve(target.to_string()))?;

        let mut derived = format!("{}{VIRTUAL_SUFFIX}", resolved.display());
        if let Some(query) = query {
            derived.push('?');
            derived.push_str(query);
        }
        log::debug!("resolved `{id}` -> `{derived}`");
        Ok(Some(derived))
    }

    /// Load a virtual `.svg.vue` module: read the underlying file and
    /// convert it.
    pub fn load(&self, id: &str) -> Result<Option<String>> {
        let (path, query) = parse_request(id);
        if !path.ends_with(".svg.vue") || !self.has_mark(query) {
            return Ok(None);
        }

        let real = Path::new(&path[..path.len() - VIRTUAL_SUFFIX.len()]);
        let contents = fs::read_to_string(real).map_err(|source| Error::Io {
            path: real.to_path_buf(),
            source,
        })?;

        log::debug!("converting `{}`", real.display());
        self.convertor()?.convert(&contents, Some(real)).map(Some)
    }

    /// File-change notification: when an `.svg` source changes, return the
    /// derived virtual modules the host must re-evaluate.
    pub fn handle_hot_update(&self, file: &Path, graph: &dyn ModuleGraph) -> Vec<String> {
        if file.extension().is_none_or(|ext| ext != "svg") {
            return Vec::new();
        }
        let virtual_id = format!("{}{VIRTUAL_SUFFIX}", file.display());
        let modules = graph.modules_by_file(&virtual_id);
        if !modules.is_empty() {
            log::debug!(
                "invalidating {} module(s) for `{}`",
                modules.len(),
                file.display()
            );
        }
        modules
    }
}

/// Split a module id into path and raw query string.
fn parse_request(id: &str) -> (&str, Option<&str>) {
    match id.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (id, None),
    }
}

// ============================================================================
// Tests
// ============================================================================
