//! # xmlhash
//!
//! A small XML indexing engine: parse a document (eagerly or lazily) and
//! navigate it with chained key/index lookups that resolve into a typed
//! result algebra.
//!
//! ```
//! let title = xmlhash::parse("<rss><channel><title>News</title></channel></rss>")
//!     .by_key("rss")
//!     .by_key("channel")
//!     .by_key("title")
//!     .element()
//!     .unwrap();
//! assert_eq!(title.text(), "News");
//! ```
//!
//! The lazy entry point defers the parse until a pending query executes,
//! and then materializes only the subtree the query can reach:
//!
//! ```
//! let count: i64 = xmlhash::lazy("<r><n>7</n></r>")
//!     .by_key("r")
//!     .by_key("n")
//!     .value()
//!     .unwrap();
//! assert_eq!(count, 7);
//! ```

mod core;
pub mod de;
pub mod dom;
pub mod feed;
pub mod index;
mod parser;

pub use crate::core::encoding::TextEncoding;
pub use de::{DeserializeError, FromXmlAttribute, FromXmlElement, FromXmlIndexer};
pub use dom::{XmlAttribute, XmlElement};
pub use index::{IndexOp, IndexOps, IndexingError, XmlIndexer};

use log::warn;

use crate::parser::{EagerParser, LazyParser};

/// Parse configuration. All flags default to off; the default encoding
/// assumption is UTF-8 (a byte-order mark in the input always overrides
/// the assumption).
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Defer parsing until a pending query executes.
    pub lazy: bool,
    /// Strip namespace prefixes from element and attribute names.
    pub process_namespaces: bool,
    /// Fold ASCII case when matching keys and attribute values.
    pub case_insensitive: bool,
    /// Encoding assumed for byte input without a byte-order mark.
    pub encoding: TextEncoding,
}

/// Configured entry point. [`parse`] and [`lazy`] cover the common cases;
/// build an `XmlHash` to set more than one option.
#[derive(Debug, Clone, Default)]
pub struct XmlHash {
    options: Options,
}

impl XmlHash {
    pub fn new() -> Self {
        XmlHash::default()
    }

    /// Build an entry point with adjusted options.
    ///
    /// ```
    /// let root = xmlhash::XmlHash::config(|o| {
    ///     o.case_insensitive = true;
    /// })
    /// .parse("<A>x</A>");
    /// assert!(root.by_key("a").element().is_some());
    /// ```
    pub fn config(f: impl FnOnce(&mut Options)) -> Self {
        let mut options = Options::default();
        f(&mut options);
        XmlHash { options }
    }

    /// Parse a UTF-8 string. Never fails: malformed markup degrades into
    /// text or truncated trees, and navigation reports what is missing.
    pub fn parse(&self, xml: &str) -> XmlIndexer {
        self.dispatch(xml.as_bytes().to_vec())
    }

    /// Parse raw bytes, decoding per the configured encoding (or the BOM,
    /// when present). Undecodable input is an encoding error result.
    pub fn parse_bytes(&self, data: &[u8]) -> XmlIndexer {
        match crate::core::encoding::decode(data, self.options.encoding) {
            Ok(text) => self.dispatch(text.into_bytes()),
            Err(err) => {
                warn!("input decoding failed: {err}");
                XmlIndexer::Error(IndexingError::Encoding)
            }
        }
    }

    fn dispatch(&self, data: Vec<u8>) -> XmlIndexer {
        if self.options.lazy {
            XmlIndexer::Stream(IndexOps::new(LazyParser::new(data, self.options.clone())))
        } else {
            EagerParser::new(self.options.clone()).parse(&data)
        }
    }
}

/// Parse `xml` eagerly with default options.
pub fn parse(xml: &str) -> XmlIndexer {
    XmlHash::new().parse(xml)
}

/// Return a pending lazy parse of `xml`; the document is read when the
/// first query chained onto the result executes.
pub fn lazy(xml: &str) -> XmlIndexer {
    XmlHash::config(|o| o.lazy = true).parse(xml)
}
