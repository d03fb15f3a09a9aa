//! Lazy parse driver: one deferred pass, materializing only the queried
//! subtree
//!
//! The driver holds the raw bytes until a pending query executes. During
//! the pass it tracks two stacks: the live tag-name stack (always updated)
//! and the stack of materialized parents (updated only while the live path
//! matches the query). The match predicate is prefix-symmetric: while the
//! traversal is deeper than the query it requires the live stack to start
//! with the query keys, so the whole subtree below a full match is built;
//! while it is shallower it requires the query keys to start with the live
//! stack, so ancestors of a potential match are built on the way down.
//! Names are compared by plain equality here, independent of the tree's
//! case flag.

use crate::core::tokenizer::{SaxHandler, Tokenizer};
use crate::dom::document::{Document, NodeId, ROOT};
use crate::index::IndexOp;
use crate::Options;

#[derive(Debug)]
pub(crate) struct LazyParser {
    data: Vec<u8>,
    options: Options,
}

impl LazyParser {
    pub(crate) fn new(data: Vec<u8>, options: Options) -> Self {
        LazyParser { data, options }
    }

    /// Run one pass gated by the query's key sequence. All parse state is
    /// created fresh here and torn down on return; re-running would be
    /// safe but wasteful, and the pending-stream owner prevents it by
    /// consuming this driver on first execution.
    pub(crate) fn run(&self, ops: &[IndexOp]) -> Document {
        let keys: Vec<String> = ops.iter().map(|op| op.key.clone()).collect();
        let mut builder = LazyTreeBuilder {
            doc: Document::new(self.options.case_insensitive),
            parents: vec![ROOT],
            live: Vec::new(),
            keys,
        };
        Tokenizer::new(&self.data, self.options.process_namespaces).run(&mut builder);
        builder.doc
    }
}

struct LazyTreeBuilder {
    doc: Document,
    /// Materialized open elements; only grows while the live path matches.
    parents: Vec<NodeId>,
    /// Names of all currently open elements, matched or not.
    live: Vec<String>,
    /// Key sequence of the pending query.
    keys: Vec<String>,
}

impl LazyTreeBuilder {
    /// Prefix-symmetric match between the live name stack and the query.
    fn on_match(&self) -> bool {
        if self.live.len() > self.keys.len() {
            self.live.starts_with(&self.keys)
        } else {
            self.keys.starts_with(&self.live)
        }
    }

    fn top(&self) -> NodeId {
        *self.parents.last().expect("root never popped")
    }
}

impl SaxHandler for LazyTreeBuilder {
    fn start_element(&mut self, name: &str, attributes: &[(String, String)]) {
        self.live.push(name.to_owned());

        if !self.on_match() {
            return;
        }

        let node = self.doc.add_child_element(self.top(), name, attributes);
        self.parents.push(node);
    }

    fn characters(&mut self, text: &str) {
        if !self.on_match() {
            return;
        }
        self.doc.add_text(self.top(), text);
    }

    fn end_element(&mut self, _name: &str) {
        // Evaluate before popping the live stack, mirroring the start path
        let matched = self.on_match();
        self.live.pop();

        if matched && self.parents.len() > 1 {
            self.parents.pop();
        }
    }
}
