//! # Hatena Blog `/dev` Trending Feed
//!
//! Scrapes the Trending list of Hatena Blog's corporate tech blogs
//! (<https://hatena.blog/dev>) and republishes it as JSON Feed, Atom and RSS.
//!
//! ## Usage
//!
//! ```sh
//! hatena_dev_trending_feed
//! ```
//!
//! ## Architecture
//!
//! The application is a straight pipeline:
//! 1. **Fetching**: Download the source page
//! 2. **Scraping**: Pull trending entries out of the page, one at a time
//! 3. **Building**: Turn the entries into a feed document
//! 4. **Output**: Write `feed.json`, `atom.xml` and `rss.xml` under `public/`
//!
//! Any failure aborts the run with a non-zero exit status. A successful run
//! prints nothing: only warnings and errors are logged, to stderr. Set
//! `RUST_LOG` (e.g. `RUST_LOG=info`) to see progress.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod feed;
mod fetcher;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use feed::build_feed;
use fetcher::{HttpFetcher, PageFetcher};
use models::{FeedDocument, FeedMetadata};
use scrapers::ScrapeError;
use scrapers::trending::TrendingPage;

/// Filter used when `RUST_LOG` is unset. Successful runs stay silent.
const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    let args = Cli::parse();
    info!(source = %args.source_url, output_dir = %args.output_dir.display(), "Starting feed generation");

    if let Err(e) = run(&args).await {
        error!(error = %e, "Feed generation failed");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(millis = elapsed.as_millis() as u64, "Execution complete");
    Ok(())
}

async fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let raw_html = fetcher.fetch(&args.source_url).await?;

    let metadata = FeedMetadata::hatena_dev_trending(Utc::now());
    let document = scrape_document(&raw_html, &metadata)?;

    let written = outputs::write_feeds(&document, &args.output_dir).await?;
    info!(items = document.items.len(), files = written.len(), "Feeds written");
    Ok(())
}

/// Scrape `raw_html` and build the feed, stopping at the first broken entry.
fn scrape_document(raw_html: &str, metadata: &FeedMetadata) -> Result<FeedDocument, ScrapeError> {
    let page = TrendingPage::parse(raw_html)?;
    itertools::process_results(page.entries()?, |entries| build_feed(metadata, entries))
}
