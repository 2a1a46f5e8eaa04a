//! Conversion of scraped entries into a [`FeedDocument`].
//!
//! The builder is a pure transformation: it keeps entry order, attaches the
//! Asia/Tokyo civil timezone to each publication date and never touches the
//! network or filesystem. Rendering lives in [`crate::outputs`].

use crate::models::{Author, Entry, FeedDocument, FeedItem, FeedMetadata};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tracing::{info, instrument};

/// Asia/Tokyo is UTC+09:00 with no daylight saving time.
const TOKYO_UTC_OFFSET_HOURS: i64 = 9;

/// Absolute instant of midnight, Asia/Tokyo, on `date`.
pub fn tokyo_midnight(date: NaiveDate) -> DateTime<Utc> {
    let local_midnight = date.and_time(NaiveTime::MIN);
    (local_midnight - Duration::hours(TOKYO_UTC_OFFSET_HOURS)).and_utc()
}

/// Build a feed document from entries, preserving their order.
#[instrument(level = "info", skip_all)]
pub fn build_feed<I>(metadata: &FeedMetadata, entries: I) -> FeedDocument
where
    I: IntoIterator<Item = Entry>,
{
    let items: Vec<FeedItem> = entries.into_iter().map(feed_item).collect();
    info!(count = items.len(), "Built feed document");

    FeedDocument {
        metadata: metadata.clone(),
        items,
    }
}

fn feed_item(entry: Entry) -> FeedItem {
    let link = entry.url.to_string();
    FeedItem {
        title: entry.title,
        id: link.clone(),
        link,
        date: tokyo_midnight(entry.published_at),
        image: entry.thumbnail_url.map(|url| url.to_string()),
        // An empty name is no author at all.
        author: entry
            .corporation
            .filter(|name| !name.is_empty())
            .map(|name| Author { name }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use url::Url;

    fn metadata() -> FeedMetadata {
        FeedMetadata::hatena_dev_trending(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap())
    }

    fn entry(title: &str, url: &str, y: i32, m: u32, d: u32) -> Entry {
        Entry {
            url: Url::parse(url).unwrap(),
            title: title.to_string(),
            published_at: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            thumbnail_url: None,
            corporation: None,
        }
    }

    #[test]
    fn test_tokyo_midnight_conversion() {
        let instant = tokyo_midnight(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(instant, Utc.with_ymd_and_hms(2023, 12, 31, 15, 0, 0).unwrap());
        assert_eq!(instant.timestamp_millis(), 1_704_034_800_000);
    }

    #[test]
    fn test_build_feed_two_plain_entries() {
        let entries = vec![
            entry("A", "https://x/1", 2024, 1, 1),
            entry("B", "https://x/2", 2024, 1, 2),
        ];
        let doc = build_feed(&metadata(), entries);

        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].title, "A");
        assert_eq!(doc.items[0].id, "https://x/1");
        assert_eq!(doc.items[0].link, "https://x/1");
        assert_eq!(doc.items[1].title, "B");
        assert_eq!(doc.items[1].id, "https://x/2");
        assert_eq!(
            doc.items[1].date,
            Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap()
        );
        for item in &doc.items {
            assert_eq!(item.author, None);
            assert_eq!(item.image, None);
        }
        assert_eq!(doc.metadata, metadata());
    }

    #[test]
    fn test_build_feed_keeps_input_order() {
        let entries = vec![
            entry("Newer", "https://x/2", 2024, 5, 1),
            entry("Older", "https://x/1", 2023, 1, 1),
        ];
        let doc = build_feed(&metadata(), entries);
        let titles: Vec<_> = doc.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Newer", "Older"]);
    }

    #[test]
    fn test_build_feed_optional_fields() {
        let mut with_both = entry("A", "https://x/1", 2024, 1, 1);
        with_both.thumbnail_url = Some(Url::parse("https://cdn.x/1.png").unwrap());
        with_both.corporation = Some("Hatena".to_string());

        let mut empty_corp = entry("B", "https://x/2", 2024, 1, 1);
        empty_corp.corporation = Some(String::new());

        let doc = build_feed(&metadata(), [with_both, empty_corp]);
        assert_eq!(doc.items[0].image.as_deref(), Some("https://cdn.x/1.png"));
        assert_eq!(
            doc.items[0].author,
            Some(Author {
                name: "Hatena".to_string()
            })
        );
        assert_eq!(doc.items[1].author, None);
    }

    #[test]
    fn test_build_feed_empty() {
        let doc = build_feed(&metadata(), Vec::new());
        assert!(doc.items.is_empty());
    }
}
