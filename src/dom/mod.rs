//! XML element tree model
//!
//! Trees are built once by a parse driver and are read-only afterwards.
//! Storage is an arena of element nodes addressed by `NodeId`; text leaves
//! live inline in their parent's child list. Public access goes through the
//! cheap-to-clone [`XmlElement`] handle.

pub mod document;
pub mod element;

pub use document::{Document, NodeId};
pub use element::{XmlAttribute, XmlElement};
