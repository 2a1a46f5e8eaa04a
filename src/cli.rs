//! Command-line interface definitions.
//!
//! Every option has a default, so a bare invocation fetches
//! <https://hatena.blog/dev> and writes to `public/`.

use crate::models::SOURCE_URL;
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Regenerate the Hatena Blog `/dev` Trending feeds.
///
/// A bare invocation takes no flags and needs no configuration. The options
/// below only exist as overrides for tests and local debugging; the published
/// feeds always come from the defaults.
///
/// # Examples
///
/// ```sh
/// # Default run: writes public/feed.json, public/atom.xml, public/rss.xml
/// hatena_dev_trending_feed
///
/// # Write somewhere else
/// hatena_dev_trending_feed -o ./site/feeds
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Page to scrape the Trending list from
    #[arg(long, default_value = SOURCE_URL)]
    pub source_url: Url,

    /// Directory that receives feed.json, atom.xml and rss.xml
    #[arg(short, long, default_value = "public")]
    pub output_dir: PathBuf,

    /// Request timeout for the page fetch, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}
