//! Style inlining plugin.

use super::{Plugin, PluginInfo};
use crate::error::Result;
use crate::tree::{Document, Element, Node};

/// Move simple stylesheet rules into `style` attributes.
///
/// Handles rules with a single class, id or tag selector; anything more
/// involved (combinators, pseudo-classes, at-rules) stays in the `<style>`
/// element untouched. Matched class tokens are dropped from `class`
/// attributes; emptied `<style>` elements are removed.
///
/// The SFC preset disables this plugin whenever style extraction is on,
/// since inlining would defeat extraction.
pub struct InlineStyles;

/// A parsed top-level chunk of stylesheet text.
enum Block {
    /// A `selector { declarations }` rule.
    Rule { selector: String, decls: String },
    /// Anything kept verbatim (at-rules and other constructs).
    Raw(String),
}

/// A selector simple enough to inline.
enum Simple {
    Class(String),
    Id(String),
    Tag(String),
}

impl Simple {
    fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        let (kind, name): (fn(String) -> Self, &str) = match selector.strip_prefix('.') {
            Some(rest) => (Self::Class, rest),
            None => match selector.strip_prefix('#') {
                Some(rest) => (Self::Id, rest),
                None => (Self::Tag, selector),
            },
        };
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| kind(name.to_string()))
    }

    fn matches(&self, el: &Element) -> bool {
        match self {
            Self::Class(name) => el
                .attrs
                .get("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == name)),
            Self::Id(name) => el.attrs.get("id") == Some(name),
            Self::Tag(name) => el.is_tag(name),
        }
    }
}

impl InlineStyles {
    fn split_blocks(css: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut rest = css;

        while let Some(open) = rest.find('{') {
            let selector = &rest[..open];
            // At-rules keep their whole (possibly nested) block verbatim.
            if selector.trim_start().starts_with('@') {
                let mut depth = 0usize;
                let mut end = rest.len();
                for (i, c) in rest.char_indices() {
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                end = i + 1;
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                blocks.push(Block::Raw(rest[..end].to_string()));
                rest = &rest[end..];
                continue;
            }

            let Some(close) = rest[open..].find('}') else {
                break;
            };
            blocks.push(Block::Rule {
                selector: selector.trim().to_string(),
                decls: rest[open + 1..open + close].trim().to_string(),
            });
            rest = &rest[open + close + 1..];
        }

        let tail = rest.trim();
        if !tail.is_empty() {
            blocks.push(Block::Raw(tail.to_string()));
        }
        blocks
    }

    /// Inline one rule; returns true when it matched at least one element.
    fn inline_rule(doc: &mut Document, selector: &Simple, decls: &str) -> bool {
        let mut matched = false;
        doc.for_each_element(&mut |el| {
            if el.is_tag("style") || !selector.matches(el) {
                return;
            }
            matched = true;

            let decls = decls.trim().trim_end_matches(';');
            match el.attrs.get("style") {
                // The existing inline style keeps precedence.
                Some(existing) if !existing.is_empty() => {
                    let merged = format!("{decls};{existing}");
                    el.attrs.set("style", merged);
                }
                _ => el.attrs.set("style", decls),
            }

            if let Simple::Class(name) = selector {
                let remaining = el
                    .attrs
                    .get("class")
                    .map(|classes| {
                        classes
                            .split_whitespace()
                            .filter(|c| c != name)
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .unwrap_or_default();
                if remaining.is_empty() {
                    el.attrs.remove("class");
                } else {
                    el.attrs.set("class", remaining);
                }
            }
        });
        matched
    }

    fn rebuild(blocks: &[Block]) -> String {
        let mut css = String::new();
        for block in blocks {
            match block {
                Block::Rule { selector, decls } => {
                    css.push_str(selector);
                    css.push('{');
                    css.push_str(decls);
                    css.push('}');
                }
                Block::Raw(raw) => css.push_str(raw),
            }
        }
        css
    }
}

impl Plugin for InlineStyles {
    fn name(&self) -> &str {
        "inlineStyles"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        // Collect the stylesheets first; inlining mutates the same tree.
        let mut sheets: Vec<String> = Vec::new();
        doc.for_each_element(&mut |el| {
            if el.is_tag("style") {
                sheets.push(el.text_content());
            }
        });

        let mut rewritten: Vec<Option<String>> = Vec::with_capacity(sheets.len());
        for sheet in &sheets {
            let blocks = Self::split_blocks(sheet);
            let mut kept: Vec<Block> = Vec::new();
            for block in blocks {
                match block {
                    Block::Rule { selector, decls } => {
                        let inlined = Simple::parse(&selector)
                            .is_some_and(|s| Self::inline_rule(doc, &s, &decls));
                        if !inlined {
                            kept.push(Block::Rule { selector, decls });
                        }
                    }
                    raw => kept.push(raw),
                }
            }
            let css = Self::rebuild(&kept);
            rewritten.push((!css.trim().is_empty()).then_some(css));
        }

        // Write back: replace each style element's content in encounter
        // order, dropping the ones that emptied out.
        let mut index = 0;
        replace_styles(&mut doc.children, &rewritten, &mut index);
        Ok(())
    }
}

fn replace_styles(children: &mut Vec<Node>, rewritten: &[Option<String>], index: &mut usize) {
    children.retain_mut(|node| {
        let Node::Element(el) = node else {
            return true;
        };
        if el.is_tag("style") {
            let slot = rewritten.get(*index).cloned().flatten();
            *index += 1;
            return match slot {
                Some(css) => {
                    el.children = vec![Node::Text(css)];
                    true
                }
                None => false,
            };
        }
        replace_styles(&mut el.children, rewritten, index);
        true
    });
}

// ============================================================================
// Tests
// ============================================================================
