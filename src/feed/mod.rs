//! RSS 2.0 feed extraction built on the query layer
//!
//! Walks the conventional `rss > channel > item` shape and pulls each
//! item's title, description, publication date and link into a plain
//! struct. Dates are RFC 2822 (`Tue, 19 Aug 2025 10:30:00 +0000`); the
//! optional `content:encoded` body rides along when present. Feeds that
//! embed markup in descriptions can opt into HTML stripping.

use log::warn;
use thiserror::Error;
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

use crate::core::entities::decode_text;
use crate::index::XmlIndexer;

/// One `<item>` of a channel, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub pub_date: OffsetDateTime,
    pub link: String,
    /// Full body from `content:encoded`, when the feed carries one.
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("feed item is missing required field <{key}>")]
    MissingField { key: &'static str },

    #[error("feed item has unparseable publication date {value:?}")]
    BadDate { value: String },
}

/// Extraction settings for one feed shape.
#[derive(Debug, Clone, Default)]
pub struct FeedParser {
    strip_html: bool,
}

impl FeedParser {
    pub fn new() -> Self {
        FeedParser::default()
    }

    /// Strip HTML tags from titles and descriptions and decode the
    /// entities they leave behind. Off by default.
    pub fn strip_html(mut self, strip: bool) -> Self {
        self.strip_html = strip;
        self
    }

    /// Extract every `<item>` of the feed, in document order. The whole
    /// extraction fails on the first malformed item; a feed with no items
    /// is an empty list, not an error.
    pub fn parse(&self, xml: &str) -> Result<Vec<FeedItem>, FeedError> {
        let items = crate::parse(xml)
            .by_key("rss")
            .by_key("channel")
            .by_key("item")
            .all();
        if items.is_empty() {
            warn!("feed has no <rss><channel><item> entries");
        }
        items.into_iter().map(|item| self.parse_item(item)).collect()
    }

    fn parse_item(&self, item: XmlIndexer) -> Result<FeedItem, FeedError> {
        let title = self.clean(required_text(&item, "title")?);
        let description = self.clean(required_text(&item, "description")?);
        let link = required_text(&item, "link")?;

        let raw_date = required_text(&item, "pubDate")?;
        let pub_date = OffsetDateTime::parse(raw_date.trim(), &Rfc2822)
            .map_err(|_| FeedError::BadDate { value: raw_date })?;

        let details = clone_indexer(&item)
            .by_key("content:encoded")
            .element()
            .map(|elem| elem.text());

        Ok(FeedItem {
            title,
            description,
            pub_date,
            link,
            details,
        })
    }

    fn clean(&self, text: String) -> String {
        if self.strip_html {
            strip_html(&text)
        } else {
            text
        }
    }
}

fn required_text(item: &XmlIndexer, key: &'static str) -> Result<String, FeedError> {
    clone_indexer(item)
        .by_key(key)
        .element()
        .map(|elem| elem.text())
        .ok_or(FeedError::MissingField { key })
}

/// Re-enter the result algebra from a borrowed item. Items come from
/// `all()`, so only the element arm is ever taken.
fn clone_indexer(item: &XmlIndexer) -> XmlIndexer {
    match item {
        XmlIndexer::Element(elem) => XmlIndexer::Element(elem.clone()),
        XmlIndexer::List(list) => XmlIndexer::List(list.clone()),
        _ => XmlIndexer::Error(crate::IndexingError::Unknown),
    }
}

/// Remove HTML tags and decode the entities left in the remaining text.
/// A `<` with no closing `>` is kept verbatim.
pub fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    match decode_text(out.as_bytes()) {
        std::borrow::Cow::Borrowed(_) => out,
        std::borrow::Cow::Owned(decoded) => String::from_utf8_lossy(&decoded).into_owned(),
    }
}
