//! Path query representation for deferred (lazy) lookups
//!
//! A pending query is an ordered list of (key, optional index) steps plus
//! the single-use lazy driver that will eventually run them. Steps only
//! accumulate; execution happens at most once, enforced by move-out
//! semantics — `find_elements` consumes the whole record.

use std::fmt;
use std::rc::Rc;

use log::debug;

use super::XmlIndexer;
use crate::dom::XmlElement;
use crate::parser::LazyParser;

/// One navigation step: a key, optionally narrowed to the Nth match.
#[derive(Debug, Clone)]
pub struct IndexOp {
    pub(crate) key: String,
    pub(crate) index: Option<usize>,
}

impl IndexOp {
    pub(crate) fn new(key: &str) -> Self {
        IndexOp {
            key: key.to_owned(),
            index: None,
        }
    }
}

impl fmt::Display for IndexOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(idx) => write!(f, "{} {}", self.key, idx),
            None => f.write_str(&self.key),
        }
    }
}

/// An unexecuted lazy query: accumulated steps plus the driver to run them.
#[derive(Debug)]
pub struct IndexOps {
    ops: Vec<IndexOp>,
    parser: LazyParser,
}

impl IndexOps {
    pub(crate) fn new(parser: LazyParser) -> Self {
        IndexOps {
            ops: Vec::new(),
            parser,
        }
    }

    pub(crate) fn push_key(&mut self, key: &str) {
        self.ops.push(IndexOp::new(key));
    }

    /// Narrow the most recently appended step. False when no step exists.
    pub(crate) fn set_last_index(&mut self, idx: usize) -> bool {
        match self.ops.last_mut() {
            Some(op) => {
                op.index = Some(idx);
                true
            }
            None => false,
        }
    }

    /// Run the single SAX pass and replay the accumulated steps over the
    /// materialized subtree. Consumes the pending query; the driver cannot
    /// be executed again.
    pub(crate) fn find_elements(self) -> XmlIndexer {
        debug!("executing lazy query {}", self.stringify());

        let doc = Rc::new(self.parser.run(&self.ops));
        let mut indexer = XmlIndexer::Element(XmlElement::root(doc));
        for op in &self.ops {
            indexer = indexer.by_key(&op.key);
            if let Some(idx) = op.index {
                indexer = indexer.by_index(idx);
            }
        }
        indexer
    }

    /// Diagnostic rendering of the accumulated steps, e.g. `[channel][item 2]`.
    pub fn stringify(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            out.push('[');
            out.push_str(&op.to_string());
            out.push(']');
        }
        out
    }
}
