//! Error types for SVG to SFC conversion.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the conversion pipeline and the bundler shim.
///
/// Every variant is fatal to the single file being converted; the host
/// bundler decides whether a failed conversion aborts the whole build.
#[derive(Debug, Error)]
pub enum Error {
    /// An imported specifier could not be resolved to a real file.
    #[error("cannot resolve file: {0}")]
    Resolve(String),

    /// Reading a source SVG file failed.
    #[error("failed to read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The SVG document is not well-formed XML.
    #[error("malformed SVG document")]
    Xml(#[from] quick_xml::Error),

    /// An attribute inside the SVG document could not be parsed.
    #[error("malformed SVG attribute")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// An entity or character reference could not be decoded.
    #[error("invalid entity reference in SVG document")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// An explicit plugin list named a plugin the engine does not know.
    #[error("unknown SVG plugin `{0}`")]
    UnknownPlugin(String),

    /// An internal placeholder plugin name reached the engine directly.
    ///
    /// `extractCSS`, `responsiveSVGAttrs` and `setSVGAttrs` are substituted
    /// by the pipeline assembler; they have no standalone engine
    /// implementation.
    #[error("`{0}` is internal to the SFC pipeline, list it under `svgo.plugins` instead")]
    PlaceholderPlugin(String),
}
