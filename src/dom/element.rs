//! Public element and attribute handles

use std::fmt;
use std::rc::Rc;

use super::document::{Document, NodeId, ROOT, ROOT_ELEMENT_NAME};

/// A (name, value) attribute pair. Values are always strings; typed access
/// is a derived operation in the extraction layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

impl fmt::Display for XmlAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

/// Handle to one element of a parsed tree.
///
/// Cloning is cheap (a reference-counted document plus an arena index).
/// The underlying tree is immutable once parsing has finished.
#[derive(Debug, Clone)]
pub struct XmlElement {
    pub(crate) doc: Rc<Document>,
    pub(crate) id: NodeId,
}

impl XmlElement {
    pub(crate) fn new(doc: Rc<Document>, id: NodeId) -> Self {
        XmlElement { doc, id }
    }

    /// Handle to the synthetic root of a finished document.
    pub(crate) fn root(doc: Rc<Document>) -> Self {
        XmlElement { doc, id: ROOT }
    }

    pub fn name(&self) -> &str {
        &self.doc.node(self.id).name
    }

    /// Concatenation of the direct text-leaf children, in document order.
    /// Text inside sub-elements is not included.
    pub fn text(&self) -> String {
        self.doc.direct_text(self.id)
    }

    /// Depth-first concatenation of all descendant text leaves.
    pub fn recursive_text(&self) -> String {
        self.doc.recursive_text(self.id)
    }

    /// Look up an attribute by name, honoring the tree's case flag.
    pub fn attribute(&self, name: &str) -> Option<XmlAttribute> {
        self.doc
            .attribute(self.id, name)
            .map(|(name, value)| XmlAttribute {
                name: name.to_owned(),
                value: value.to_owned(),
            })
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> Vec<XmlAttribute> {
        self.doc
            .node(self.id)
            .attributes
            .iter()
            .map(|(name, value)| XmlAttribute {
                name: name.clone(),
                value: value.clone(),
            })
            .collect()
    }

    /// Direct child elements in document order (text leaves excluded).
    pub fn element_children(&self) -> Vec<XmlElement> {
        self.doc
            .element_children(self.id)
            .iter()
            .map(|&id| XmlElement::new(Rc::clone(&self.doc), id))
            .collect()
    }

    /// Creation order among this element's siblings. Diagnostics only.
    pub fn sibling_index(&self) -> usize {
        self.doc.node(self.id).sibling_index
    }

    /// Whether name/attribute comparisons on this tree ignore case.
    pub fn case_insensitive(&self) -> bool {
        self.doc.case_insensitive()
    }

    pub(crate) fn is_synthetic_root(&self) -> bool {
        self.id == ROOT && self.name() == ROOT_ELEMENT_NAME
    }

    pub(crate) fn names_match(&self, name: &str, key: &str) -> bool {
        self.doc.names_match(name, key)
    }
}

impl fmt::Display for XmlElement {
    /// Full open/attributes/children/close rendering of this element.
    /// The synthetic root is handled by the indexer, which renders only
    /// its children.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.doc.write_element(self.id, &mut out);
        f.write_str(&out)
    }
}
