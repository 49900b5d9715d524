//! SFC-specific transform steps.
//!
//! These steps run inside the engine's pipeline like any other plugin but
//! feed side-channel data (extracted styles, generated id placeholders)
//! into per-conversion sinks the convertor drains when assembling the
//! final component text.
//!
//! Sinks are allocated fresh for every `convert` call and shared with the
//! step instances of that call only, so conversions never observe each
//! other's state; within one call the engine runs synchronously, making
//! the single-threaded `Rc<RefCell<...>>` handles safe.

pub mod extract;
pub mod props;
pub mod responsive;
pub mod unique_id;

use std::cell::RefCell;
use std::rc::Rc;

// ============================================================================
// Id Rewrite Map
// ============================================================================

/// Insertion-ordered mapping from original element id to generated
/// placeholder identifier.
///
/// Keys are unique within one conversion; a duplicate literal id (invalid
/// SVG, but it happens) maps to the placeholder generated for its first
/// occurrence.
#[derive(Debug, Default)]
pub struct IdMap {
    entries: Vec<(String, String)>,
}

impl IdMap {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the placeholder for an original id.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(old, _)| old == id)
            .map(|(_, placeholder)| placeholder.as_str())
    }

    /// Get or create the placeholder for an original id.
    ///
    /// Placeholder names derive deterministically from the map size:
    /// `_SVG_ID_0`, `_SVG_ID_1`, ...
    pub fn placeholder_for(&mut self, id: &str) -> String {
        if let Some(existing) = self.get(id) {
            return existing.to_string();
        }
        let placeholder = format!("_SVG_ID_{}", self.entries.len());
        self.entries.push((id.to_string(), placeholder.clone()));
        placeholder
    }

    /// Placeholder names in insertion order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, placeholder)| placeholder.as_str())
    }
}

// ============================================================================
// Per-Conversion Sinks
// ============================================================================

/// Side-channel containers for one `convert` call.
#[derive(Debug, Default)]
pub struct Sinks {
    /// Extracted CSS fragments, in document order.
    pub styles: Rc<RefCell<Vec<String>>>,
    /// Original id → placeholder identifier.
    pub ids: Rc<RefCell<IdMap>>,
}
