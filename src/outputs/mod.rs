//! Feed rendering and output file generation.
//!
//! This module contains one submodule per syndication format, each turning a
//! [`FeedDocument`] into text:
//!
//! # Submodules
//!
//! - [`json`]: JSON Feed version 1
//! - [`atom`]: Atom 1.0
//! - [`rss`]: RSS 2.0
//!
//! # Output Structure
//!
//! ```text
//! public/
//! ├── feed.json
//! ├── atom.xml
//! └── rss.xml
//! ```
//!
//! # Write Semantics
//!
//! [`write_feeds`] renders all three documents in memory before touching the
//! filesystem, so a rendering failure leaves previous output untouched. Each
//! file is then written to a `.tmp` sibling and renamed into place. A failed
//! write or rename removes every `.tmp` file not yet moved. A crash between
//! renames can mix old and new files but never truncates one.

use crate::models::FeedDocument;
use crate::utils::ensure_dir;
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{error, info, instrument};

pub mod atom;
pub mod json;
pub mod rss;

/// Errors raised while rendering or writing feeds.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Rendered feed is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// The three published serializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Json,
    Atom,
    Rss,
}

impl FeedFormat {
    pub const ALL: [FeedFormat; 3] = [FeedFormat::Json, FeedFormat::Atom, FeedFormat::Rss];

    /// File name under the output directory.
    pub fn file_name(self) -> &'static str {
        match self {
            FeedFormat::Json => "feed.json",
            FeedFormat::Atom => "atom.xml",
            FeedFormat::Rss => "rss.xml",
        }
    }

    /// Render `doc` in this format.
    pub fn render(self, doc: &FeedDocument) -> Result<String, OutputError> {
        match self {
            FeedFormat::Json => json::render(doc),
            FeedFormat::Atom => atom::render(doc),
            FeedFormat::Rss => rss::render(doc),
        }
    }
}

/// Render `doc` in every format and write the results under `output_dir`.
///
/// Returns the written paths in [`FeedFormat::ALL`] order.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_feeds(doc: &FeedDocument, output_dir: &Path) -> Result<Vec<PathBuf>, OutputError> {
    let rendered = FeedFormat::ALL
        .iter()
        .map(|format| -> Result<(PathBuf, String), OutputError> {
            Ok((output_dir.join(format.file_name()), format.render(doc)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    ensure_dir(output_dir).await?;

    let mut staged = Vec::with_capacity(rendered.len());
    for (path, content) in &rendered {
        let tmp = tmp_path(path);
        if let Err(e) = fs::write(&tmp, content).await {
            error!(path = %tmp.display(), error = %e, "Failed to stage feed file");
            for (staged_tmp, _) in &staged {
                let _ = fs::remove_file(staged_tmp).await;
            }
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        staged.push((tmp, path.clone()));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp, path).await {
            error!(path = %path.display(), error = %e, "Failed to move feed file into place");
            for (pending_tmp, _) in &staged[i..] {
                let _ = fs::remove_file(pending_tmp).await;
            }
            return Err(e.into());
        }
        info!(path = %path.display(), "Wrote feed file");
        written.push(path.clone());
    }
    Ok(written)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// `2023-12-31T15:00:00.000Z`, as used by Atom and JSON Feed.
pub(crate) fn rfc3339_millis(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Guess an image MIME type from the URL's file extension.
pub(crate) fn image_mime_type(image: &str) -> &'static str {
    let path = image.split(['?', '#']).next().unwrap_or(image);
    let file = path.rsplit('/').next().unwrap_or(path);
    let ext = file
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "image/jpeg",
    }
}

/// Write `<name>text</name>`.
pub(crate) fn write_text_element<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), OutputError> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write a self-closing element with the given attributes.
pub(crate) fn write_empty_element<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), OutputError> {
    let mut start = BytesStart::new(name);
    for attr in attributes {
        start.push_attribute(*attr);
    }
    w.write_event(Event::Empty(start))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Author, FeedItem, FeedMetadata};
    use chrono::TimeZone;

    pub(crate) fn sample_document() -> FeedDocument {
        FeedDocument {
            metadata: FeedMetadata::hatena_dev_trending(
                Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap(),
            ),
            items: vec![
                FeedItem {
                    title: "Rust & <HTML> のスクレイピング".to_string(),
                    id: "https://example.com/entry/1".to_string(),
                    link: "https://example.com/entry/1".to_string(),
                    date: Utc.with_ymd_and_hms(2023, 12, 31, 15, 0, 0).unwrap(),
                    image: Some("https://cdn.example.com/og/1.png?w=1200".to_string()),
                    author: Some(Author {
                        name: "株式会社はてな".to_string(),
                    }),
                },
                FeedItem {
                    title: "Plain".to_string(),
                    id: "https://example.com/entry/2".to_string(),
                    link: "https://example.com/entry/2".to_string(),
                    date: Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap(),
                    image: None,
                    author: None,
                },
            ],
        }
    }

    /// Check the output parses as XML all the way through.
    pub(crate) fn assert_well_formed_xml(xml: &str) {
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut depth = 0i32;
        loop {
            match reader.read_event() {
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) => depth -= 1,
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("malformed XML at {}: {e}", reader.buffer_position()),
            }
        }
        assert_eq!(depth, 0, "unbalanced XML");
    }

    #[test]
    fn test_rfc3339_millis() {
        let instant = Utc.with_ymd_and_hms(2023, 12, 31, 15, 0, 0).unwrap();
        assert_eq!(rfc3339_millis(&instant), "2023-12-31T15:00:00.000Z");
    }

    #[test]
    fn test_image_mime_type() {
        assert_eq!(image_mime_type("https://cdn.example.com/a.PNG"), "image/png");
        assert_eq!(image_mime_type("https://cdn.example.com/a.gif?x=1.png"), "image/gif");
        assert_eq!(image_mime_type("https://cdn.example.com/a.webp#frag"), "image/webp");
        assert_eq!(image_mime_type("https://cdn.example.com/a.jpg"), "image/jpeg");
        assert_eq!(image_mime_type("https://cdn.example.com/image"), "image/jpeg");
        assert_eq!(image_mime_type("https://cdn.example.com/v1.2/image"), "image/jpeg");
    }

    #[test]
    fn test_file_names() {
        let names: Vec<_> = FeedFormat::ALL.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, ["feed.json", "atom.xml", "rss.xml"]);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let doc = sample_document();
        for format in FeedFormat::ALL {
            assert_eq!(format.render(&doc).unwrap(), format.render(&doc).unwrap());
        }
    }

    #[tokio::test]
    async fn test_write_feeds_creates_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("public");
        let doc = sample_document();

        let written = write_feeds(&doc, &out).await.unwrap();
        assert_eq!(written.len(), 3);

        for format in FeedFormat::ALL {
            let path = out.join(format.file_name());
            let on_disk = std::fs::read_to_string(&path).unwrap();
            assert_eq!(on_disk, format.render(&doc).unwrap());
            assert!(!tmp_path(&path).exists());
        }
    }

    #[tokio::test]
    async fn test_write_feeds_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("public");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("rss.xml"), "stale").unwrap();

        let mut doc = sample_document();
        doc.items.clear();
        write_feeds(&doc, &out).await.unwrap();

        let rss = std::fs::read_to_string(out.join("rss.xml")).unwrap();
        assert!(rss.contains("<channel>"));
        assert!(!rss.contains("<item>"));
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_no_tmp_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("public");
        // A non-empty directory where atom.xml belongs makes its rename fail.
        std::fs::create_dir_all(out.join("atom.xml").join("blocker")).unwrap();

        let err = write_feeds(&sample_document(), &out).await.unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));

        for format in FeedFormat::ALL {
            assert!(!tmp_path(&out.join(format.file_name())).exists());
        }
        assert!(!out.join("rss.xml").exists());
        assert!(out.join("feed.json").is_file());
    }
}
