//! JSON Feed version 1 output.
//!
//! See <https://www.jsonfeed.org/version/1/>. Every item must carry
//! `content_html` or `content_text`; the page only gives us a title, so it
//! doubles as `content_text`.

use crate::models::{FeedDocument, FeedItem};
use crate::outputs::{OutputError, rfc3339_millis};
use serde::Serialize;

const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1";

#[derive(Debug, Serialize)]
struct JsonFeed<'a> {
    version: &'static str,
    title: &'a str,
    home_page_url: &'a str,
    description: &'a str,
    items: Vec<JsonItem<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonItem<'a> {
    id: &'a str,
    url: &'a str,
    title: &'a str,
    content_text: &'a str,
    date_published: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<JsonAuthor<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonAuthor<'a> {
    name: &'a str,
}

impl<'a> From<&'a FeedItem> for JsonItem<'a> {
    fn from(item: &'a FeedItem) -> Self {
        JsonItem {
            id: &item.id,
            url: &item.link,
            title: &item.title,
            content_text: &item.title,
            date_published: rfc3339_millis(&item.date),
            image: item.image.as_deref(),
            author: item.author.as_ref().map(|a| JsonAuthor { name: &a.name }),
        }
    }
}

/// Render `doc` as a pretty-printed JSON Feed document.
pub fn render(doc: &FeedDocument) -> Result<String, OutputError> {
    let feed = JsonFeed {
        version: JSON_FEED_VERSION,
        title: &doc.metadata.title,
        home_page_url: &doc.metadata.link,
        description: &doc.metadata.description,
        items: doc.items.iter().map(JsonItem::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&feed)?)
}
