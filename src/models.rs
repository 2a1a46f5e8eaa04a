//! Data models for scraped trending entries and the feed built from them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Entry`]: One trending post as scraped from the source page
//! - [`FeedMetadata`]: Channel-level constants shared by every output format
//! - [`FeedDocument`]: The in-memory feed, rendered by [`crate::outputs`]
//! - [`FeedItem`] and [`Author`]: One item of a [`FeedDocument`]

use chrono::{DateTime, NaiveDate, Utc};
use url::Url;

/// Public page listing the trending posts.
pub const SOURCE_URL: &str = "https://hatena.blog/dev";

/// Canonical id and link of the generated feed.
const FEED_HOME: &str = "https://github.com/otariidae/hatena-blog-dev-trending-feed";

/// A single trending post scraped from the source page.
///
/// `url`, `title` and `published_at` are always present; an element that
/// lacks any of them never becomes an `Entry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Absolute link to the post.
    pub url: Url,
    /// Plain-text title.
    pub title: String,
    /// Publication date, interpreted in Asia/Tokyo.
    pub published_at: NaiveDate,
    /// Preview image, when the page exposes one.
    pub thumbnail_url: Option<Url>,
    /// Publishing organization, when the page exposes one.
    pub corporation: Option<String>,
}

/// Channel-level metadata.
///
/// Built once at startup and handed to [`crate::feed::build_feed`], so the
/// builder stays free of embedded literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMetadata {
    pub title: String,
    pub description: String,
    pub id: String,
    pub link: String,
    pub language: String,
    /// Omitted from every output when empty.
    pub copyright: String,
    pub generator: String,
    /// Build instant of the feed, used for Atom `updated` and RSS `lastBuildDate`.
    pub updated: DateTime<Utc>,
}

impl FeedMetadata {
    /// Metadata of the Hatena Blog corporate tech blog Trending feed.
    pub fn hatena_dev_trending(updated: DateTime<Utc>) -> Self {
        Self {
            title: "はてなブログ企業技術ブログTrending".to_string(),
            description: format!(
                "はてなブログの企業技術ブログ（{}）のTrendingの非公式フィード",
                SOURCE_URL
            ),
            id: FEED_HOME.to_string(),
            link: FEED_HOME.to_string(),
            language: "ja".to_string(),
            copyright: String::new(),
            generator: env!("CARGO_PKG_NAME").to_string(),
            updated,
        }
    }
}

/// Author of a feed item. Only a display name is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
}

/// One published item of a [`FeedDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub id: String,
    pub link: String,
    /// Publication instant, millisecond precision.
    pub date: DateTime<Utc>,
    pub image: Option<String>,
    pub author: Option<Author>,
}

/// An ordered list of items plus channel metadata.
///
/// This is a transient value: it is rendered to JSON Feed, Atom and RSS and
/// then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub metadata: FeedMetadata,
    pub items: Vec<FeedItem>,
}
