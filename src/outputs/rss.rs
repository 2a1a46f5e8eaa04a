//! RSS 2.0 output.
//!
//! RSS `<author>` must be an e-mail address, and the page only exposes a
//! corporation name, so authors are written as Dublin Core `dc:creator`.

use crate::models::FeedDocument;
use crate::outputs::{OutputError, image_mime_type, write_empty_element, write_text_element};
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

const RSS_DOCS: &str = "https://validator.w3.org/feed/docs/rss2.html";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// `Sun, 31 Dec 2023 15:00:00 GMT`
fn rfc822(instant: &DateTime<Utc>) -> String {
    instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Render `doc` as an RSS 2.0 channel.
pub fn render(doc: &FeedDocument) -> Result<String, OutputError> {
    let meta = &doc.metadata;
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:dc", DC_NS));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &meta.title)?;
    write_text_element(&mut writer, "link", &meta.link)?;
    write_text_element(&mut writer, "description", &meta.description)?;
    write_text_element(&mut writer, "lastBuildDate", &rfc822(&meta.updated))?;
    write_text_element(&mut writer, "docs", RSS_DOCS)?;
    write_text_element(&mut writer, "generator", &meta.generator)?;
    write_text_element(&mut writer, "language", &meta.language)?;
    if !meta.copyright.is_empty() {
        write_text_element(&mut writer, "copyright", &meta.copyright)?;
    }

    for item in &doc.items {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", &item.title)?;
        write_text_element(&mut writer, "link", &item.link)?;
        write_text_element(&mut writer, "guid", &item.id)?;
        write_text_element(&mut writer, "pubDate", &rfc822(&item.date))?;
        if let Some(author) = &item.author {
            write_text_element(&mut writer, "dc:creator", &author.name)?;
        }
        if let Some(image) = &item.image {
            write_empty_element(
                &mut writer,
                "enclosure",
                &[
                    ("url", image.as_str()),
                    ("length", "0"),
                    ("type", image_mime_type(image)),
                ],
            )?;
        }
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}
