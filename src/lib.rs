//! Convert SVG files into Vue single-file components at build time.
//!
//! An `.svg` import carrying the marker query parameter is intercepted by
//! the bundler shim, rewritten to a virtual `.vue` module and converted:
//!
//! ```text
//! icon.svg?sfc ──resolve──► /abs/icon.svg.vue?sfc
//!                               │ load
//!                               ▼
//!                    ┌─────────────────────┐
//!                    │   SvgSfcConvertor   │  pipeline assembled once
//!                    │ parse → plugins →   │  per build session
//!                    │ serialize → wrap    │
//!                    └─────────────────────┘
//!                               │
//!                               ▼
//!        <template><svg .../></template><style scoped>...</style>
//! ```
//!
//! The downstream Vue compiler turns the produced SFC text into a loadable
//! component; this crate never compiles templates itself.
//!
//! # Example
//!
//! ```
//! use svg_sfc::{BuildMode, SvgSfcConvertor, SvgSfcOptions};
//!
//! let convertor = SvgSfcConvertor::new(SvgSfcOptions::default(), BuildMode::Development)?;
//! let sfc = convertor.convert("<svg><rect/></svg>", None)?;
//! assert!(sfc.starts_with("<template>"));
//! # Ok::<(), svg_sfc::Error>(())
//! ```

pub mod bundler;
pub mod convert;
pub mod error;
pub mod optimize;
pub mod options;
pub mod pipeline;
pub mod sfc;
pub mod tree;

pub use bundler::{FsResolver, ModuleGraph, Resolver, SvgSfcPlugin};
pub use convert::SvgSfcConvertor;
pub use error::{Error, Result};
pub use optimize::{Plugin, PluginInfo};
pub use options::{BuildMode, SvgProps, SvgSfcOptions, SvgoConfig, SvgoOptions};
pub use pipeline::PluginSpec;
