//! Hatena Blog `/dev` Trending scraper.
//!
//! The page has no API, so entries are located through markup the page happens
//! to expose: Google Tag Manager tracking attributes and CSS-module class
//! prefixes. These strings are a reverse-engineered contract with the page and
//! are kept verbatim in the constants below.
//!
//! # Page Structure
//!
//! ```text
//! <section id="trending">
//!   <div data-gtm-track-entry_id="…" data-gtm-track-post_date="2024-01-01">
//!     <a data-gtm-track-component="entry_main" href="https://…">
//!       <div class="styles_ogImage__…"><img src="https://…"></div>
//!       <h4>Title</h4>
//!     </a>
//!     <span class="styles_corporation__…">Corporation<img …></span>
//!   </div>
//!   …
//! </section>
//! ```

use crate::models::Entry;
use crate::scrapers::ScrapeError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::element_ref::Select;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

/// Id of the container holding the trending list.
pub const TRENDING_ANCHOR_ID: &str = "trending";
/// Attribute present on every entry element.
pub const ENTRY_ID_ATTR: &str = "data-gtm-track-entry_id";
/// Attribute on the entry element carrying its `YYYY-MM-DD` publication date.
pub const POST_DATE_ATTR: &str = "data-gtm-track-post_date";
/// Class prefix of the element wrapping the thumbnail image.
pub const OG_IMAGE_CLASS_PREFIX: &str = "styles_ogImage";
/// Class prefix of the element holding the corporation name.
pub const CORPORATION_CLASS_PREFIX: &str = "styles_corporation";

static ANY_ELEMENT: Lazy<Selector> = Lazy::new(|| selector("*"));
static TRENDING: Lazy<Selector> = Lazy::new(|| selector(&format!("#{}", TRENDING_ANCHOR_ID)));
static ENTRY: Lazy<Selector> = Lazy::new(|| selector(&format!("[{}]", ENTRY_ID_ATTR)));
static ENTRY_LINK: Lazy<Selector> =
    Lazy::new(|| selector(r#"[data-gtm-track-component="entry_main"]"#));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("h4"));
static IMG: Lazy<Selector> = Lazy::new(|| selector("img"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// A parsed source page.
///
/// Parsing happens once; [`TrendingPage::entries`] can be called repeatedly and
/// each call walks the document from the start.
pub struct TrendingPage {
    document: Html,
}

impl TrendingPage {
    /// Parse raw page HTML.
    ///
    /// The HTML parser recovers from any malformed markup, so "not HTML" means
    /// the input carries no markup at all: no tag, doctype or comment opener.
    /// Such input is rejected with [`ScrapeError::Parse`]. A well-formed page
    /// without the trending region parses fine and fails later in
    /// [`TrendingPage::entries`].
    #[instrument(level = "info", skip_all, fields(bytes = raw_html.len()))]
    pub fn parse(raw_html: &str) -> Result<Self, ScrapeError> {
        if !has_markup(raw_html) {
            return Err(ScrapeError::Parse {
                bytes: raw_html.len(),
            });
        }

        let document = Html::parse_document(raw_html);
        if !document.errors.is_empty() {
            debug!(count = document.errors.len(), "HTML parser recovered from errors");
        }
        Ok(Self { document })
    }

    /// Locate the trending region and return a lazy iterator over its entries.
    ///
    /// Fails with [`ScrapeError::Structure`] when the region is missing. An
    /// empty region yields an empty iterator.
    pub fn entries(&self) -> Result<TrendingEntries<'_>, ScrapeError> {
        let trending = self
            .document
            .select(&TRENDING)
            .next()
            .ok_or(ScrapeError::Structure {
                anchor: TRENDING_ANCHOR_ID,
            })?;

        info!(
            candidates = trending.select(&ENTRY).count(),
            "Located trending region"
        );

        Ok(TrendingEntries {
            candidates: trending.select(&ENTRY),
            failed: false,
        })
    }
}

/// Pull-based iterator over the entries of a [`TrendingPage`].
///
/// Each candidate is scraped only when the iterator is advanced. After the
/// first `Err` the iterator is exhausted, so a broken entry always ends the
/// sequence.
pub struct TrendingEntries<'a> {
    candidates: Select<'a, 'static>,
    failed: bool,
}

impl Iterator for TrendingEntries<'_> {
    type Item = Result<Entry, ScrapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = scrape_entry(self.candidates.next()?);
        self.failed = result.is_err();
        Some(result)
    }
}

/// Scrape one candidate element into an [`Entry`].
fn scrape_entry(entry: ElementRef<'_>) -> Result<Entry, ScrapeError> {
    let raw_url = entry
        .select(&ENTRY_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))
        .ok_or(ScrapeError::RequiredField { field: "url" })?;
    let url = Url::parse(raw_url).map_err(|source| ScrapeError::InvalidUrl {
        raw: raw_url.to_string(),
        source,
    })?;

    let title = entry
        .select(&TITLE)
        .next()
        .map(|h4| h4.text().collect::<String>())
        .ok_or(ScrapeError::RequiredField { field: "title" })?;

    let published = entry
        .value()
        .attr(POST_DATE_ATTR)
        .ok_or(ScrapeError::RequiredField {
            field: "published_at",
        })?;
    let published_at = parse_post_date(published)?;

    let scraped = Entry {
        url,
        title,
        published_at,
        thumbnail_url: thumbnail_url(entry),
        corporation: corporation_name(entry),
    };
    debug!(url = %scraped.url, date = %scraped.published_at, title = %scraped.title, "Scraped entry");
    Ok(scraped)
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// chrono accepts unpadded fields, so the shape is checked first.
fn parse_post_date(raw: &str) -> Result<NaiveDate, ScrapeError> {
    let invalid = || ScrapeError::InvalidDate {
        raw: raw.to_string(),
    };

    let bytes = raw.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}

/// First `img` whose parent element's class starts with [`OG_IMAGE_CLASS_PREFIX`].
///
/// Only that image is consulted: if it has no usable `src`, there is no
/// thumbnail.
fn thumbnail_url(entry: ElementRef<'_>) -> Option<Url> {
    let img = entry.select(&IMG).find(|img| {
        img.parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|parent| has_class_prefix(parent, OG_IMAGE_CLASS_PREFIX))
    })?;
    let src = img.value().attr("src")?;
    Url::parse(src).ok()
}

/// Text of the first child of the first descendant whose class starts with
/// [`CORPORATION_CLASS_PREFIX`].
///
/// An element first child yields `None` rather than its text content.
fn corporation_name(entry: ElementRef<'_>) -> Option<String> {
    let label = entry
        .select(&ANY_ELEMENT)
        .find(|el| has_class_prefix(*el, CORPORATION_CLASS_PREFIX))?;
    let first = label.first_child()?;
    let text: &str = first.value().as_text()?;
    Some(text.to_string())
}

/// True when `raw` contains `<` followed by a tag name, `/` or `!`.
fn has_markup(raw: &str) -> bool {
    raw.as_bytes().windows(2).any(|pair| {
        pair[0] == b'<' && (pair[1].is_ascii_alphabetic() || matches!(pair[1], b'/' | b'!'))
    })
}

/// Prefix match against the raw `class` attribute, not individual class names.
fn has_class_prefix(element: ElementRef<'_>, prefix: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|class| class.starts_with(prefix))
}
