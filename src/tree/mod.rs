//! SVG document model.
//!
//! A parsed SVG is a [`Document`] holding the prolog (doctype, processing
//! instructions, comments) and the root element. Elements own an
//! insertion-ordered [`AttrMap`]; transform plugins mutate the tree in
//! place and the serializer writes it back out as single-line markup.
//!
//! The model is deliberately dumb: no namespaces resolution, no CSS, no
//! geometry. Attribute names are kept verbatim (`xlink:href` is just a
//! string key).

mod parse;
mod serialize;

pub use parse::parse;
pub use serialize::serialize;

use smallvec::SmallVec;

// ============================================================================
// Nodes
// ============================================================================

/// A node of the SVG document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    /// Processing instruction or XML declaration, without the `<?`/`?>`
    /// delimiters (e.g. `xml version="1.0"`).
    ProcInst(String),
    /// Doctype declaration without the `<!DOCTYPE`/`>` delimiters.
    Doctype(String),
}

impl Node {
    /// Get the contained element, if this node is one.
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutable variant of [`Node::as_element`].
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: AttrMap,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check the element's tag name.
    #[inline]
    pub fn is_tag(&self, name: &str) -> bool {
        self.name == name
    }

    /// Concatenated content of the direct text and CDATA children, in
    /// document order.
    pub fn text_content(&self) -> String {
        let mut content = String::new();
        for child in &self.children {
            match child {
                Node::Text(text) | Node::CData(text) => content.push_str(text),
                _ => {}
            }
        }
        content
    }

    /// Visit this element and all element descendants, pre-order.
    pub fn for_each_element(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.for_each_element(f);
            }
        }
    }
}

/// A parsed SVG document.
///
/// `children` holds the prolog, the root element and any trailing nodes.
/// The structural sanitizers and the minify preset exist to guarantee that
/// exactly one root element remains after transformation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    /// The first (and, after sanitizing, only) root element.
    pub fn root(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }

    /// Mutable variant of [`Document::root`].
    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.children.iter_mut().find_map(Node::as_element_mut)
    }

    /// Visit every element in the document, pre-order, root included.
    pub fn for_each_element(&mut self, f: &mut dyn FnMut(&mut Element)) {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.for_each_element(f);
            }
        }
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// Insertion-ordered attribute map.
///
/// Backed by a small vector: SVG elements rarely carry more than a handful
/// of attributes, so linear search beats hashing here. `set` overwrites an
/// existing key in place, keeping its position; iteration order is
/// insertion order unless a sorting plugin reorders it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrMap {
    attrs: SmallVec<[(String, String); 8]>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Get an attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check for an attribute.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set an attribute, overwriting an existing key in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(index).1)
    }

    /// Iterate `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Iterate with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.attrs
            .iter_mut()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Keep only the attributes the predicate accepts.
    pub fn retain(&mut self, mut f: impl FnMut(&str, &str) -> bool) {
        self.attrs.retain(|(key, value)| f(key, value));
    }

    /// Reorder attributes by the given key-comparison function.
    pub fn sort_by_name(&mut self, mut cmp: impl FnMut(&str, &str) -> std::cmp::Ordering) {
        self.attrs.sort_by(|a, b| cmp(&a.0, &b.0));
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_map_set_preserves_position() {
        let mut attrs = AttrMap::new();
        attrs.set("width", "24");
        attrs.set("height", "24");
        attrs.set("width", "1em");

        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, [("width", "1em"), ("height", "24")]);
    }

    #[test]
    fn test_attr_map_remove() {
        let mut attrs: AttrMap = [("id", "a"), ("fill", "red")].into_iter().collect();
        assert_eq!(attrs.remove("id"), Some("a".to_string()));
        assert_eq!(attrs.remove("id"), None);
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_element_text_content() {
        let mut el = Element::new("style");
        el.children.push(Node::Text(".a{fill:red}".into()));
        el.children.push(Node::CData(".b{fill:blue}".into()));
        el.children.push(Node::Comment("ignored".into()));
        assert_eq!(el.text_content(), ".a{fill:red}.b{fill:blue}");
    }

    #[test]
    fn test_document_root_skips_prolog() {
        let mut doc = Document::default();
        doc.children.push(Node::ProcInst("xml version=\"1.0\"".into()));
        doc.children.push(Node::Element(Element::new("svg")));
        assert_eq!(doc.root().map(|el| el.name.as_str()), Some("svg"));
    }

    #[test]
    fn test_for_each_element_preorder() {
        let mut leaf = Element::new("rect");
        leaf.attrs.set("id", "r");
        let mut group = Element::new("g");
        group.children.push(Node::Element(leaf));
        let mut root = Element::new("svg");
        root.children.push(Node::Element(group));
        let mut doc = Document::default();
        doc.children.push(Node::Element(root));

        let mut names = Vec::new();
        doc.for_each_element(&mut |el| names.push(el.name.clone()));
        assert_eq!(names, ["svg", "g", "rect"]);
    }
}
