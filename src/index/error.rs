//! Query/navigation errors
//!
//! These are values, not panics: once a chain produces an error the
//! remaining operations pass it through unchanged, so callers can inspect
//! a whole query chain at its end.

use thiserror::Error;

/// Everything that can go wrong while navigating a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexingError {
    #[error("XML attribute error: missing attribute {attr:?}")]
    Attribute { attr: String },

    #[error("XML attribute error: missing attribute {attr:?} with value {value:?}")]
    AttributeValue { attr: String, value: String },

    #[error("XML element error: incorrect key {key:?}")]
    Key { key: String },

    #[error("XML element error: incorrect index {idx}")]
    Index { idx: usize },

    #[error("XML indexer error: bad initialization: {message}")]
    Init { message: String },

    #[error("string encoding error")]
    Encoding,

    #[error("unknown error")]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_payload() {
        let err = IndexingError::Key { key: "link".into() };
        assert_eq!(err.to_string(), "XML element error: incorrect key \"link\"");

        let err = IndexingError::Index { idx: 4 };
        assert_eq!(err.to_string(), "XML element error: incorrect index 4");
    }
}
