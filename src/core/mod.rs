//! Core XML parsing primitives
//!
//! Building blocks shared by the eager and lazy parse drivers:
//! - Scanner: memchr-backed delimiter detection over raw bytes
//! - Tokenizer: push-style tokenizer delivering SAX callbacks
//! - Entities: XML entity decoding/encoding with Cow fast paths
//! - Encoding: BOM detection and UTF-16 to UTF-8 conversion

pub mod encoding;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
