//! SAX parse drivers
//!
//! Two ways to turn a byte stream into a queryable result: the eager
//! driver materializes the whole tree in one pass, the lazy driver defers
//! the pass until a pending query is executed and then materializes only
//! the subtree the query can reach. Both consume tokenizer callbacks and
//! nothing else; a truncated input yields whatever tree was built.

pub mod eager;
pub mod lazy;

pub(crate) use eager::EagerParser;
pub(crate) use lazy::LazyParser;
