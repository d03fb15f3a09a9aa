//! Eager parse driver: build the full tree in one pass

use std::rc::Rc;

use log::debug;

use crate::core::tokenizer::{SaxHandler, Tokenizer};
use crate::dom::document::{Document, NodeId, ROOT};
use crate::dom::XmlElement;
use crate::index::XmlIndexer;
use crate::Options;

pub(crate) struct EagerParser {
    options: Options,
}

impl EagerParser {
    pub(crate) fn new(options: Options) -> Self {
        EagerParser { options }
    }

    /// Run one tokenizer pass and return the finished root as a
    /// single-element result.
    pub(crate) fn parse(&self, data: &[u8]) -> XmlIndexer {
        let mut builder = TreeBuilder::new(self.options.case_insensitive);
        Tokenizer::new(data, self.options.process_namespaces).run(&mut builder);
        debug!("eager parse finished, {} bytes", data.len());
        XmlIndexer::Element(XmlElement::root(Rc::new(builder.doc)))
    }
}

/// Driver-owned state for one parse pass: the growing document and the
/// stack of currently open elements, seeded with the synthetic root.
struct TreeBuilder {
    doc: Document,
    parents: Vec<NodeId>,
}

impl TreeBuilder {
    fn new(case_insensitive: bool) -> Self {
        TreeBuilder {
            doc: Document::new(case_insensitive),
            parents: vec![ROOT],
        }
    }

    fn top(&self) -> NodeId {
        *self.parents.last().expect("root never popped")
    }
}

impl SaxHandler for TreeBuilder {
    fn start_element(&mut self, name: &str, attributes: &[(String, String)]) {
        let node = self.doc.add_child_element(self.top(), name, attributes);
        self.parents.push(node);
    }

    fn characters(&mut self, text: &str) {
        self.doc.add_text(self.top(), text);
    }

    fn end_element(&mut self, _name: &str) {
        // Stray end tags must not pop the synthetic root
        if self.parents.len() > 1 {
            self.parents.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;

    fn parse(xml: &str) -> XmlIndexer {
        EagerParser::new(Options::default()).parse(xml.as_bytes())
    }

    #[test]
    fn builds_full_tree() {
        let root = parse("<a><b>x</b><b>y</b></a>");
        let bs = root.by_key("a").by_key("b").all();
        assert_eq!(bs.len(), 2);
    }

    #[test]
    fn truncated_input_keeps_partial_tree() {
        let root = parse("<a><b>x</b><c>unclosed");
        let a = root.by_key("a");
        let c = a.by_key("c").element().unwrap();
        assert_eq!(c.text(), "unclosed");
    }

    #[test]
    fn stray_end_tags_are_ignored() {
        let root = parse("</ghost><a>ok</a></ghost>");
        let a = root.by_key("a").element().unwrap();
        assert_eq!(a.text(), "ok");
    }

    #[test]
    fn namespace_passthrough_keeps_qualified_names() {
        let root = parse("<rss><content:encoded>x</content:encoded></rss>");
        let enc = root
            .by_key("rss")
            .by_key("content:encoded")
            .element()
            .unwrap();
        assert_eq!(enc.text(), "x");
    }

    #[test]
    fn namespace_processing_strips_prefixes() {
        let mut options = Options::default();
        options.process_namespaces = true;
        let root = EagerParser::new(options)
            .parse(b"<rss><content:encoded>x</content:encoded></rss>");
        let enc = root.by_key("rss").by_key("encoded").element().unwrap();
        assert_eq!(enc.text(), "x");
    }
}
