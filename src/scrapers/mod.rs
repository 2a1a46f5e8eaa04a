//! Source page scrapers.
//!
//! The only source is the Trending list of <https://hatena.blog/dev>, handled
//! by [`trending`]. Scraping is coupled to the page's current markup, so every
//! structural miss on a required field surfaces as a [`ScrapeError`] instead
//! of a guess.
//!
//! # Error Taxonomy
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`ScrapeError::Parse`] | Input is not HTML at all |
//! | [`ScrapeError::Structure`] | The anchor region is missing; page layout changed |
//! | [`ScrapeError::RequiredField`] | An entry lacks its url, title or date |
//! | [`ScrapeError::InvalidDate`] | The date attribute is not `YYYY-MM-DD` |
//! | [`ScrapeError::InvalidUrl`] | The entry link is not an absolute URL |

use thiserror::Error;

pub mod trending;

/// Errors raised while extracting entries from the source page.
///
/// All variants are fatal for the run: a partially scraped trending list is
/// never published.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The input carries no markup at all.
    #[error("Failed to parse as HTML: no markup found in {bytes} bytes of input")]
    Parse { bytes: usize },
    /// The container with the given id is absent.
    #[error("Anchor region #{anchor} not found; the page layout may have changed")]
    Structure { anchor: &'static str },
    /// A mandatory per-entry field could not be scraped.
    #[error("Failed to scrape required field `{field}`")]
    RequiredField { field: &'static str },
    /// The publication date attribute is present but malformed.
    #[error("Invalid publication date {raw:?} (expected YYYY-MM-DD)")]
    InvalidDate { raw: String },
    /// The entry link is present but not an absolute URL.
    #[error("Invalid entry URL {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}
