//! Per-instance id rewriting.
//!
//! An SVG component mounted several times on one page duplicates its
//! element ids, breaking internal `url(#...)` and `href="#..."` references.
//! These two steps replace literal ids with placeholders that the emitted
//! SFC script binds to per-instance unique values at runtime.
//!
//! Rewriting runs as two full passes over the tree: references may point
//! at ids defined later in the document, so all ids must be collected
//! before any reference is rewritten.

use std::cell::RefCell;
use std::rc::Rc;

use super::IdMap;
use crate::error::Result;
use crate::optimize::{Plugin, PluginInfo, url_reference};
use crate::tree::{Document, Element};

/// Pass 1: replace every literal `id` on non-root elements with a
/// dynamic-binding attribute pointing at a generated placeholder.
///
/// The root element keeps its id: it names the component itself, not an
/// internal definition, and rewriting it would change the component's
/// outside-visible contract.
pub struct RewriteIds {
    ids: Rc<RefCell<IdMap>>,
}

impl RewriteIds {
    pub fn new(ids: Rc<RefCell<IdMap>>) -> Self {
        Self { ids }
    }

    fn rewrite(el: &mut Element, ids: &mut IdMap) {
        if let Some(id) = el.attrs.remove("id") {
            let placeholder = ids.placeholder_for(&id);
            el.attrs.set(":id", placeholder);
        }
    }
}

impl Plugin for RewriteIds {
    fn name(&self) -> &str {
        "rewriteIds"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        let ids = &mut self.ids.borrow_mut();
        let Some(root) = doc.root_mut() else {
            return Ok(());
        };
        for child in &mut root.children {
            if let Some(el) = child.as_element_mut() {
                el.for_each_element(&mut |el| Self::rewrite(el, ids));
            }
        }
        Ok(())
    }
}

/// Pass 2: retarget `href`/`xlink:href` fragments and `url(#...)` values at
/// the placeholders collected by [`RewriteIds`].
///
/// References to ids outside the id map (external targets) stay untouched.
pub struct RewriteRefs {
    ids: Rc<RefCell<IdMap>>,
}

impl RewriteRefs {
    pub fn new(ids: Rc<RefCell<IdMap>>) -> Self {
        Self { ids }
    }

    fn rewrite(el: &mut Element, ids: &IdMap) {
        enum Binding {
            Href(String),
            Url(String),
        }

        let mut edits: Vec<(String, Binding)> = Vec::new();
        for (name, value) in el.attrs.iter() {
            if name.starts_with(':') {
                continue;
            }
            if matches!(name, "href" | "xlink:href") {
                if let Some(fragment) = value.strip_prefix('#')
                    && let Some(placeholder) = ids.get(fragment)
                {
                    edits.push((name.to_string(), Binding::Href(placeholder.to_string())));
                }
            } else if let Some(fragment) = url_reference(value)
                && let Some(placeholder) = ids.get(fragment)
            {
                edits.push((name.to_string(), Binding::Url(placeholder.to_string())));
            }
        }

        for (name, binding) in edits {
            el.attrs.remove(&name);
            match binding {
                Binding::Href(placeholder) => {
                    el.attrs.set(format!(":{name}"), format!("'#' + {placeholder}"));
                }
                Binding::Url(placeholder) => {
                    el.attrs
                        .set(format!(":{name}"), format!("`url(#${{{placeholder}}})`"));
                }
            }
        }
    }
}

impl Plugin for RewriteRefs {
    fn name(&self) -> &str {
        "rewriteRefs"
    }

    fn apply(&self, doc: &mut Document, _: &PluginInfo<'_>) -> Result<()> {
        let ids = &self.ids.borrow();
        doc.for_each_element(&mut |el| Self::rewrite(el, ids));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
