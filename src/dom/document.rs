//! Arena-backed XML document
//!
//! Element nodes live in a flat arena indexed by `NodeId`; the synthetic
//! root is always node 0. Mixed content keeps document order: child
//! elements are stored as arena references, text leaves inline. Adjacent
//! text leaves are kept separate; concatenation happens on read.

use crate::core::entities::encode_text;

/// Compact node identifier (index into the arena).
pub type NodeId = u32;

/// Arena slot of the synthetic document root.
pub(crate) const ROOT: NodeId = 0;

/// Name of the synthetic root element. Never rendered.
pub(crate) const ROOT_ELEMENT_NAME: &str = "xmlhash_root_element";

/// One ordered child of an element: a sub-element or a text leaf.
#[derive(Debug, Clone)]
pub(crate) enum XmlContent {
    Element(NodeId),
    Text(String),
}

#[derive(Debug)]
pub(crate) struct ElementNode {
    pub name: String,
    /// Attribute (name, value) pairs in insertion order. Duplicate names
    /// overwrite in place (last write wins).
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlContent>,
    /// Creation order among the parent's child elements. Diagnostics only;
    /// document order is positional in `children`.
    pub sibling_index: usize,
    /// Running counter handing out sibling indexes to child elements.
    child_elements: usize,
}

impl ElementNode {
    fn new(name: &str, sibling_index: usize) -> Self {
        ElementNode {
            name: name.to_owned(),
            attributes: Vec::new(),
            children: Vec::new(),
            sibling_index,
            child_elements: 0,
        }
    }
}

/// A parsed XML tree. Mutable only while a parse driver is building it.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<ElementNode>,
    case_insensitive: bool,
}

impl Document {
    pub(crate) fn new(case_insensitive: bool) -> Self {
        Document {
            nodes: vec![ElementNode::new(ROOT_ELEMENT_NAME, 0)],
            case_insensitive,
        }
    }

    pub(crate) fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub(crate) fn node(&self, id: NodeId) -> &ElementNode {
        &self.nodes[id as usize]
    }

    /// Append a new child element under `parent` and return its id.
    pub(crate) fn add_child_element(
        &mut self,
        parent: NodeId,
        name: &str,
        attributes: &[(String, String)],
    ) -> NodeId {
        let id = self.nodes.len() as NodeId;
        let sibling_index = {
            let parent_node = &mut self.nodes[parent as usize];
            let index = parent_node.child_elements;
            parent_node.child_elements += 1;
            parent_node.children.push(XmlContent::Element(id));
            index
        };

        let mut node = ElementNode::new(name, sibling_index);
        for (attr_name, value) in attributes {
            match node.attributes.iter_mut().find(|(n, _)| n == attr_name) {
                Some(existing) => existing.1 = value.clone(),
                None => node.attributes.push((attr_name.clone(), value.clone())),
            }
        }
        self.nodes.push(node);
        id
    }

    /// Append a text leaf under `parent`.
    pub(crate) fn add_text(&mut self, parent: NodeId, text: &str) {
        self.nodes[parent as usize]
            .children
            .push(XmlContent::Text(text.to_owned()));
    }

    /// Concatenation of the direct text-leaf children of `id`, in order.
    pub(crate) fn direct_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in &self.node(id).children {
            if let XmlContent::Text(text) = child {
                out.push_str(text);
            }
        }
        out
    }

    /// Depth-first concatenation of every descendant text leaf of `id`.
    pub(crate) fn recursive_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for child in &self.node(id).children {
            match child {
                XmlContent::Text(text) => out.push_str(text),
                XmlContent::Element(child_id) => self.collect_text(*child_id, out),
            }
        }
    }

    /// Attribute value lookup honoring the per-tree case flag.
    pub(crate) fn attribute(&self, id: NodeId, name: &str) -> Option<(&str, &str)> {
        self.node(id)
            .attributes
            .iter()
            .find(|(n, _)| self.names_match(n, name))
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Direct child elements of `id`, in document order.
    pub(crate) fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .children
            .iter()
            .filter_map(|c| match c {
                XmlContent::Element(child_id) => Some(*child_id),
                XmlContent::Text(_) => None,
            })
            .collect()
    }

    /// Name/key comparison under the per-tree case flag.
    pub(crate) fn names_match(&self, name: &str, key: &str) -> bool {
        if self.case_insensitive {
            name.eq_ignore_ascii_case(key)
        } else {
            name == key
        }
    }

    /// Render `id` as `<name attrs>children</name>`. Empty elements render
    /// with an explicit close tag, never self-closing.
    pub(crate) fn write_element(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        out.push('<');
        out.push_str(&node.name);
        for (name, value) in &node.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&encode_text(value));
            out.push('"');
        }
        out.push('>');
        self.write_children(id, out);
        out.push_str("</");
        out.push_str(&node.name);
        out.push('>');
    }

    /// Render only the children of `id`, used for the synthetic root.
    pub(crate) fn write_children(&self, id: NodeId, out: &mut String) {
        for child in &self.node(id).children {
            match child {
                XmlContent::Text(text) => out.push_str(&encode_text(text)),
                XmlContent::Element(child_id) => self.write_element(*child_id, out),
            }
        }
    }
}
