//! SVG to SFC conversion.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::optimize::{self, OptimizeOptions, Plugin};
use crate::options::{BuildMode, SvgSfcOptions};
use crate::pipeline::{self, Step};
use crate::sfc::Sinks;

/// Converts SVG markup into Vue SFC source text.
///
/// The pipeline is assembled once at construction and shared read-only by
/// every conversion; all mutable state lives in per-call sinks, so one
/// convertor may serve concurrent conversions from multiple threads.
pub struct SvgSfcConvertor {
    pipeline: Option<Vec<Step>>,
    multipass: bool,
}

impl SvgSfcConvertor {
    /// Assemble the pipeline for a build session.
    ///
    /// `mode` only supplies the `minify` default; an explicit `minify`
    /// option wins.
    pub fn new(options: SvgSfcOptions, mode: BuildMode) -> Result<Self> {
        let multipass = options.svgo.config().multipass;
        let pipeline = pipeline::assemble(&options, mode)?;
        log::debug!(
            "assembled pipeline: {} step(s), multipass={multipass}",
            pipeline.as_ref().map_or(0, Vec::len),
        );
        Ok(Self {
            pipeline,
            multipass,
        })
    }

    /// Convert SVG markup to SFC source text.
    ///
    /// `path` is the absolute path of the source file when known; it is
    /// forwarded to path-aware steps (`svgProps` callbacks). Malformed
    /// SVG propagates as an error, never as partial output.
    pub fn convert(&self, svg: &str, path: Option<&Path>) -> Result<String> {
        let sinks = Sinks::default();

        let markup = match &self.pipeline {
            Some(steps) => {
                let plugins: Vec<Box<dyn Plugin>> =
                    steps.iter().map(|step| step.instantiate(&sinks)).collect();
                let options = OptimizeOptions {
                    path,
                    multipass: self.multipass,
                };
                optimize::optimize(svg, &plugins, &options)?
            }
            // svgo: false, wrap the raw input unmodified.
            None => svg.to_string(),
        };

        let mut out = String::with_capacity(markup.len() + 64);
        out.push_str("<template>");
        out.push_str(&markup);
        out.push_str("</template>");

        let ids = sinks.ids.borrow();
        if !ids.is_empty() {
            // Bind each placeholder to a per-instance unique id.
            out.push_str("<script setup>\nimport { useId } from \"vue\";\n");
            for placeholder in ids.placeholders() {
                let _ = writeln!(out, "const {placeholder} = useId();");
            }
            out.push_str("</script>");
        }

        let styles = sinks.styles.borrow();
        if !styles.is_empty() {
            out.push_str("<style scoped>");
            for css in styles.iter() {
                out.push_str(css);
            }
            out.push_str("</style>");
        }

        Ok(out)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SvgProps;

    fn convertor(toml: &str, mode: BuildMode) -> SvgSfcConvertor {
        SvgSfcConvertor::new(toml::from_str(toml).unwrap(), mode).unwrap()
    }

    #[test]
    fn test_svgo_false_wraps_raw_input() {
        let convertor = convertor("svgo = false", BuildMode::Production);
        let out = convertor
            .convert("<svg><rect/></svg>", Some(Path::new("a.svg")))
            .unwrap();
        assert_eq!(out, "<template><svg><rect/></svg></template>");
    }

    #[test]
    fn test_no_styles_no_style_block() {
        let convertor = convertor("", BuildMode::Development);
        let out = convertor.convert("<svg><rect/></svg>", None).unwrap();
        assert!(!out.contains("<style"));
        assert!(!out.contains("<script"));
    }

    #[test]
    fn test_styles_extracted_in_document_order() {
        let convertor = convertor("responsive = false", BuildMode::Development);
        let out = convertor
            .convert(
                "<svg><style>.a{fill:red}</style><g><style>.b{fill:blue}</style></g><rect class=\"a\"/></svg>",
                None,
            )
            .unwrap();
        assert!(out.ends_with("<style scoped>.a{fill:red}.b{fill:blue}</style>"));
        // The template itself no longer contains a style element.
        let template_end = out.find("</template>").unwrap();
        assert!(!out[..template_end].contains("<style"));
    }

    #[test]
    fn test_minify_preset_with_extraction() {
        let convertor = convertor("", BuildMode::Production);
        let out = convertor
            .convert(
                r#"<svg viewBox="0 0 24 24"><style>.a{fill:red}</style><rect id="r" class="a"/></svg>"#,
                None,
            )
            .unwrap();

        // Styles move to the scoped block instead of being inlined.
        assert!(out.ends_with("<style scoped>.a{fill:red}</style>"));
        // Preset overrides keep ids and viewBox.
        assert!(out.contains(r#"id="r""#));
        assert!(out.contains(r#"viewBox="0 0 24 24""#));
    }

    #[test]
    fn test_responsive_attributes() {
        let convertor = convertor("extractStyles = false", BuildMode::Development);
        let out = convertor
            .convert(r#"<svg stroke="red" fill="none"><rect/></svg>"#, None)
            .unwrap();
        assert!(out.contains(r#"stroke="currentColor""#));
        assert!(out.contains(r#"fill="none""#));
        assert!(out.contains(r#"width="1em""#));
        assert!(out.contains(r#"height="1em""#));
    }

    #[test]
    fn test_default_cleanup_strips_legacy_attrs() {
        let convertor = convertor("", BuildMode::Development);
        let out = convertor
            .convert(
                r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" xml:space="preserve"><rect/></svg>"#,
                None,
            )
            .unwrap();
        assert!(!out.contains("xmlns"));
        assert!(!out.contains("version"));
        assert!(!out.contains("xml:space"));
    }

    #[test]
    fn test_unique_id_emits_script_section() {
        let convertor = convertor("uniqueId = true", BuildMode::Development);
        let out = convertor
            .convert(
                r##"<svg><linearGradient id="foo"/><rect fill="url(#foo)"/><use href="#foo"/></svg>"##,
                None,
            )
            .unwrap();

        assert!(!out.contains(r#"id="foo""#));
        assert!(out.contains(r#":id="_SVG_ID_0""#));
        assert!(out.contains(r#":href="'#' + _SVG_ID_0""#));
        assert!(out.contains(":fill=\"`url(#${_SVG_ID_0})`\""));
        assert!(out.contains("<script setup>\nimport { useId } from \"vue\";\nconst _SVG_ID_0 = useId();\n</script>"));
        // Exactly one placeholder was generated.
        assert_eq!(out.matches("useId()").count(), 1);
    }

    #[test]
    fn test_unique_id_without_ids_emits_no_script() {
        let convertor = convertor("uniqueId = true", BuildMode::Development);
        let out = convertor.convert("<svg><rect/></svg>", None).unwrap();
        assert!(!out.contains("<script"));
    }

    #[test]
    fn test_malformed_input_propagates() {
        let convertor = convertor("", BuildMode::Development);
        assert!(convertor.convert("<svg><g></svg>", None).is_err());
    }

    #[test]
    fn test_svg_props_callback_sees_path() {
        let mut options = SvgSfcOptions::default();
        options.svg_props = Some(SvgProps::func(|attrs, path, _| {
            if let Some(path) = path {
                attrs.set("data-src", path.display().to_string());
            }
        }));
        let convertor = SvgSfcConvertor::new(options, BuildMode::Development).unwrap();
        let out = convertor
            .convert("<svg/>", Some(Path::new("/assets/a.svg")))
            .unwrap();
        assert!(out.contains(r#"data-src="/assets/a.svg""#));
    }

    #[test]
    fn test_multipass_callback_sees_pass_count() {
        let mut options: SvgSfcOptions = toml::from_str("[svgo]\nmultipass = true").unwrap();
        options.svg_props = Some(SvgProps::func(|attrs, _, passes| {
            attrs.set("data-passes", passes.to_string());
        }));
        let convertor = SvgSfcConvertor::new(options, BuildMode::Production).unwrap();

        // The first pass strips the long comment and shrinks the output,
        // so a second (stable) pass runs and the callback sees pass 1.
        let comment = "x".repeat(120);
        let out = convertor
            .convert(&format!("<svg><!--{comment}--><rect/></svg>"), None)
            .unwrap();
        assert!(out.contains(r#"data-passes="1""#));
    }

    #[test]
    fn test_conversions_are_independent() {
        // Styles from one call must never leak into the next.
        let convertor = convertor("responsive = false", BuildMode::Development);
        let first = convertor
            .convert("<svg><style>.a{fill:red}</style></svg>", None)
            .unwrap();
        assert!(first.contains(".a{fill:red}"));

        let second = convertor.convert("<svg><rect/></svg>", None).unwrap();
        assert!(!second.contains("style"));
    }

    #[test]
    fn test_convertor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SvgSfcConvertor>();
    }
}
