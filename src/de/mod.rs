//! Typed extraction from elements, attributes and query results
//!
//! Conversion is a capability: implement [`FromXmlElement`] /
//! [`FromXmlAttribute`] / [`FromXmlIndexer`] for a type to make it
//! extractable. Each trait ships a provided method body that fails with
//! `ImplementationIsMissing`, so an empty impl block opts a type in
//! without giving it behavior. Built-ins cover strings, integers, floats
//! and a permissive boolean.

use thiserror::Error;

use crate::dom::{XmlAttribute, XmlElement};
use crate::index::XmlIndexer;

/// Failure modes of typed extraction. Recoverable per call site: the
/// `*_opt` accessors turn them into absent values where the contract
/// allows it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializeError {
    #[error("deserialization is not implemented: {method}")]
    ImplementationIsMissing { method: String },

    #[error("this node is invalid for extraction: {node}")]
    NodeIsInvalid { node: String },

    #[error("this node has no value")]
    NodeHasNoValue,

    #[error("cannot convert node {node} to a value of type {ty}")]
    TypeConversionFailed { ty: &'static str, node: String },

    #[error("element <{element}> does not contain attribute {attribute:?}")]
    AttributeDoesNotExist { element: String, attribute: String },

    #[error("cannot convert attribute {attribute} to a value of type {ty}")]
    AttributeConversionFailed { ty: &'static str, attribute: String },
}

/// Conversion from an element's text content.
pub trait FromXmlElement: Sized {
    fn from_element(element: &XmlElement) -> Result<Self, DeserializeError> {
        let _ = element;
        Err(DeserializeError::ImplementationIsMissing {
            method: format!(
                "FromXmlElement::from_element for {}",
                std::any::type_name::<Self>()
            ),
        })
    }
}

/// Conversion from an attribute value.
pub trait FromXmlAttribute: Sized {
    fn from_attribute(attribute: &XmlAttribute) -> Result<Self, DeserializeError> {
        let _ = attribute;
        Err(DeserializeError::ImplementationIsMissing {
            method: format!(
                "FromXmlAttribute::from_attribute for {}",
                std::any::type_name::<Self>()
            ),
        })
    }
}

/// Conversion from a whole query result, for types that need to navigate
/// further (nested records).
pub trait FromXmlIndexer: Sized {
    fn from_indexer(indexer: XmlIndexer) -> Result<Self, DeserializeError> {
        let _ = indexer;
        Err(DeserializeError::ImplementationIsMissing {
            method: format!(
                "FromXmlIndexer::from_indexer for {}",
                std::any::type_name::<Self>()
            ),
        })
    }
}

impl XmlIndexer {
    /// Extract a scalar from the single matched element. Streams are
    /// forced first; lists and errors are invalid nodes here.
    pub fn value<T: FromXmlElement>(self) -> Result<T, DeserializeError> {
        match self {
            XmlIndexer::Element(ref elem) => T::from_element(elem),
            XmlIndexer::Stream(ops) => ops.find_elements().value(),
            other => Err(invalid_node(&other)),
        }
    }

    /// Optional-scalar form: a non-matching variant is `None` instead of
    /// an error; a failing conversion still propagates.
    pub fn value_opt<T: FromXmlElement>(self) -> Result<Option<T>, DeserializeError> {
        match self {
            XmlIndexer::Element(ref elem) => T::from_element(elem).map(Some),
            XmlIndexer::Stream(ops) => ops.find_elements().value_opt(),
            _ => Ok(None),
        }
    }

    /// Extract every matched element, propagating the first failure.
    /// Non-matching variants yield an empty list.
    pub fn values<T: FromXmlElement>(self) -> Result<Vec<T>, DeserializeError> {
        match self {
            XmlIndexer::List(ref list) => list.iter().map(T::from_element).collect(),
            XmlIndexer::Element(ref elem) => Ok(vec![T::from_element(elem)?]),
            XmlIndexer::Stream(ops) => ops.find_elements().values(),
            _ => Ok(Vec::new()),
        }
    }

    /// Optional-list form: non-matching variants are `None`.
    pub fn values_opt<T: FromXmlElement>(self) -> Result<Option<Vec<T>>, DeserializeError> {
        match self {
            XmlIndexer::List(ref list) => {
                let values = list.iter().map(T::from_element).collect::<Result<_, _>>()?;
                Ok(Some(values))
            }
            XmlIndexer::Element(ref elem) => Ok(Some(vec![T::from_element(elem)?])),
            XmlIndexer::Stream(ops) => ops.find_elements().values_opt(),
            _ => Ok(None),
        }
    }

    /// Per-element optional extraction: every matched element converts
    /// independently, with a failing conversion contributing `None` in
    /// place of failing the whole list. Non-matching variants are empty.
    pub fn optional_values<T: FromXmlElement>(self) -> Vec<Option<T>> {
        match self {
            XmlIndexer::List(ref list) => list.iter().map(|e| T::from_element(e).ok()).collect(),
            XmlIndexer::Element(ref elem) => vec![T::from_element(elem).ok()],
            XmlIndexer::Stream(ops) => ops.find_elements().optional_values(),
            _ => Vec::new(),
        }
    }

    /// Extract a typed attribute of the single matched element.
    pub fn attr_value<T: FromXmlAttribute>(self, name: &str) -> Result<T, DeserializeError> {
        match self {
            XmlIndexer::Element(ref elem) => elem.attr_value(name),
            XmlIndexer::Stream(ops) => ops.find_elements().attr_value(name),
            other => Err(invalid_node(&other)),
        }
    }

    /// Optional-attribute form: `None` on a missing attribute, a failing
    /// conversion, or a non-matching variant.
    pub fn attr_value_opt<T: FromXmlAttribute>(
        self,
        name: &str,
    ) -> Result<Option<T>, DeserializeError> {
        match self {
            XmlIndexer::Element(ref elem) => Ok(elem.attr_value_opt(name)),
            XmlIndexer::Stream(ops) => ops.find_elements().attr_value_opt(name),
            _ => Ok(None),
        }
    }

    /// Typed attribute of every matched element, propagating the first
    /// failure.
    pub fn attr_values<T: FromXmlAttribute>(self, name: &str) -> Result<Vec<T>, DeserializeError> {
        match self {
            XmlIndexer::List(ref list) => list.iter().map(|e| e.attr_value(name)).collect(),
            XmlIndexer::Element(ref elem) => Ok(vec![elem.attr_value(name)?]),
            XmlIndexer::Stream(ops) => ops.find_elements().attr_values(name),
            other => Err(invalid_node(&other)),
        }
    }

    /// Per-element optional attribute extraction: elements missing the
    /// attribute (or failing its conversion) contribute `None` instead of
    /// failing the whole list. Non-matching variants are empty.
    pub fn optional_attr_values<T: FromXmlAttribute>(self, name: &str) -> Vec<Option<T>> {
        match self {
            XmlIndexer::List(ref list) => list.iter().map(|e| e.attr_value_opt(name)).collect(),
            XmlIndexer::Element(ref elem) => vec![elem.attr_value_opt(name)],
            XmlIndexer::Stream(ops) => ops.find_elements().optional_attr_values(name),
            _ => Vec::new(),
        }
    }

    /// Hand the whole (resolved) result to a [`FromXmlIndexer`] type.
    pub fn deserialize<T: FromXmlIndexer>(self) -> Result<T, DeserializeError> {
        match self {
            XmlIndexer::Element(_) => T::from_indexer(self),
            XmlIndexer::Stream(ops) => ops.find_elements().deserialize(),
            other => Err(invalid_node(&other)),
        }
    }
}

impl XmlElement {
    /// Typed attribute lookup; missing attributes are an error.
    pub fn attr_value<T: FromXmlAttribute>(&self, name: &str) -> Result<T, DeserializeError> {
        match self.attribute(name) {
            Some(attr) => T::from_attribute(&attr),
            None => Err(DeserializeError::AttributeDoesNotExist {
                element: self.name().to_owned(),
                attribute: name.to_owned(),
            }),
        }
    }

    /// Typed attribute lookup; missing or unconvertible is `None`.
    pub fn attr_value_opt<T: FromXmlAttribute>(&self, name: &str) -> Option<T> {
        self.attribute(name)
            .and_then(|attr| T::from_attribute(&attr).ok())
    }
}

fn invalid_node(indexer: &XmlIndexer) -> DeserializeError {
    DeserializeError::NodeIsInvalid {
        node: match indexer.error() {
            Some(err) => err.to_string(),
            None => indexer.to_string(),
        },
    }
}

/// Direct text of `element`, or `NodeHasNoValue` when empty.
fn non_empty_text(element: &XmlElement) -> Result<String, DeserializeError> {
    let text = element.text();
    if text.is_empty() {
        return Err(DeserializeError::NodeHasNoValue);
    }
    Ok(text)
}

impl FromXmlElement for String {
    fn from_element(element: &XmlElement) -> Result<Self, DeserializeError> {
        Ok(element.text())
    }
}

impl FromXmlAttribute for String {
    fn from_attribute(attribute: &XmlAttribute) -> Result<Self, DeserializeError> {
        Ok(attribute.value.clone())
    }
}

macro_rules! impl_numeric_extraction {
    ($($ty:ty),* $(,)?) => {$(
        impl FromXmlElement for $ty {
            fn from_element(element: &XmlElement) -> Result<Self, DeserializeError> {
                non_empty_text(element)?.parse().map_err(|_| {
                    DeserializeError::TypeConversionFailed {
                        ty: stringify!($ty),
                        node: element.to_string(),
                    }
                })
            }
        }

        impl FromXmlAttribute for $ty {
            fn from_attribute(attribute: &XmlAttribute) -> Result<Self, DeserializeError> {
                attribute.value.parse().map_err(|_| {
                    DeserializeError::AttributeConversionFailed {
                        ty: stringify!($ty),
                        attribute: attribute.to_string(),
                    }
                })
            }
        }
    )*};
}

impl_numeric_extraction!(i32, i64, u32, u64, f32, f64);

/// Best-effort boolean: leading `t`/`y` (any case) or a non-zero leading
/// digit run, after optional sign and whitespace, reads as true;
/// everything else as false. Mirrors permissive feed payloads; the
/// conversion itself never fails.
fn permissive_bool(text: &str) -> bool {
    let s = text.trim_start();
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    match s.chars().next() {
        Some('t' | 'T' | 'y' | 'Y') => true,
        Some(c) if c.is_ascii_digit() => s
            .chars()
            .take_while(char::is_ascii_digit)
            .any(|c| c != '0'),
        _ => false,
    }
}

impl FromXmlElement for bool {
    fn from_element(element: &XmlElement) -> Result<Self, DeserializeError> {
        Ok(permissive_bool(&non_empty_text(element)?))
    }
}

impl FromXmlAttribute for bool {
    fn from_attribute(attribute: &XmlAttribute) -> Result<Self, DeserializeError> {
        Ok(permissive_bool(&attribute.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn integer_extraction() {
        let count: i64 = parse("<count>42</count>").by_key("count").value().unwrap();
        assert_eq!(count, 42);
    }

    #[test]
    fn empty_element_has_no_value() {
        let result: Result<i64, _> = parse("<count></count>").by_key("count").value();
        assert_eq!(result, Err(DeserializeError::NodeHasNoValue));
    }

    #[test]
    fn non_numeric_is_conversion_failure() {
        let result: Result<i64, _> = parse("<count>many</count>").by_key("count").value();
        assert!(matches!(
            result,
            Err(DeserializeError::TypeConversionFailed { ty: "i64", .. })
        ));
    }

    #[test]
    fn float_extraction() {
        let value: f64 = parse("<v>2.5</v>").by_key("v").value().unwrap();
        assert_eq!(value, 2.5);
    }

    #[test]
    fn string_extraction_allows_empty() {
        let text: String = parse("<t></t>").by_key("t").value().unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn bool_is_permissive_and_never_conversion_fails() {
        for (raw, expected) in [
            ("true", true),
            ("YES", true),
            ("1", true),
            ("  +9 items", true),
            ("0", false),
            ("false", false),
            ("no", false),
            ("banana", false),
        ] {
            let xml = format!("<b>{raw}</b>");
            let value: bool = parse(&xml).by_key("b").value().unwrap();
            assert_eq!(value, expected, "input {raw:?}");
        }
    }

    #[test]
    fn list_extraction_threads_conversion() {
        let xml = "<l><n>1</n><n>2</n><n>3</n></l>";
        let values: Vec<i32> = parse(xml).by_key("l").by_key("n").values().unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn list_extraction_propagates_first_failure() {
        let xml = "<l><n>1</n><n>x</n></l>";
        let result: Result<Vec<i32>, _> = parse(xml).by_key("l").by_key("n").values();
        assert!(matches!(
            result,
            Err(DeserializeError::TypeConversionFailed { .. })
        ));
    }

    #[test]
    fn error_variant_is_invalid_node_for_scalars() {
        let result: Result<String, _> = parse("<a/>").by_key("missing").value();
        assert!(matches!(result, Err(DeserializeError::NodeIsInvalid { .. })));
    }

    #[test]
    fn error_variant_is_empty_for_list_and_none_for_opt() {
        let values: Vec<String> = parse("<a/>").by_key("missing").values().unwrap();
        assert!(values.is_empty());

        let value: Option<String> = parse("<a/>").by_key("missing").value_opt().unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn per_element_optional_extraction_keeps_failures_as_none() {
        let xml = "<l><n>1</n><n>x</n><n>3</n></l>";
        let values: Vec<Option<i32>> = parse(xml).by_key("l").by_key("n").optional_values();
        assert_eq!(values, vec![Some(1), None, Some(3)]);

        let empty: Vec<Option<i32>> = parse(xml).by_key("missing").optional_values();
        assert!(empty.is_empty());
    }

    #[test]
    fn per_element_optional_attribute_extraction() {
        let xml = "<l><e id=\"1\"/><e/><e id=\"x\"/></l>";
        let ids: Vec<Option<i32>> = parse(xml)
            .by_key("l")
            .by_key("e")
            .optional_attr_values("id");
        assert_eq!(ids, vec![Some(1), None, None]);
    }

    #[test]
    fn attribute_extraction() {
        let xml = "<e id=\"7\" flag=\"yes\"/>";
        let id: i32 = parse(xml).by_key("e").attr_value("id").unwrap();
        assert_eq!(id, 7);

        let flag: bool = parse(xml).by_key("e").attr_value("flag").unwrap();
        assert!(flag);
    }

    #[test]
    fn missing_attribute_is_error_or_none() {
        let err: Result<i32, _> = parse("<e/>").by_key("e").attr_value("id");
        assert!(matches!(
            err,
            Err(DeserializeError::AttributeDoesNotExist { .. })
        ));

        let opt: Option<i32> = parse("<e/>").by_key("e").attr_value_opt("id").unwrap();
        assert!(opt.is_none());
    }

    #[test]
    fn lazy_stream_forces_before_extraction() {
        let xml = "<rss><channel><count>5</count></channel></rss>";
        let count: i32 = crate::lazy(xml)
            .by_key("rss")
            .by_key("channel")
            .by_key("count")
            .value()
            .unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn default_impl_reports_missing_implementation() {
        struct Custom;
        impl FromXmlElement for Custom {}

        let result: Result<Custom, _> = parse("<a>x</a>").by_key("a").value();
        assert!(matches!(
            result,
            Err(DeserializeError::ImplementationIsMissing { .. })
        ));
    }

    #[test]
    fn from_indexer_navigates_nested_records() {
        #[derive(Debug, PartialEq)]
        struct Point {
            x: i32,
            y: i32,
        }

        impl FromXmlIndexer for Point {
            fn from_indexer(indexer: XmlIndexer) -> Result<Self, DeserializeError> {
                let [x, y] = ["x", "y"].map(|key| match &indexer {
                    XmlIndexer::Element(elem) => {
                        XmlIndexer::Element(elem.clone()).by_key(key).value()
                    }
                    _ => Err(DeserializeError::NodeHasNoValue),
                });
                Ok(Point { x: x?, y: y? })
            }
        }

        let point: Point = parse("<p><x>1</x><y>2</y></p>")
            .by_key("p")
            .deserialize()
            .unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
    }
}
