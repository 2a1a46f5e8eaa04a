//! Atom 1.0 output (RFC 4287).

use crate::models::FeedDocument;
use crate::outputs::{
    OutputError, image_mime_type, rfc3339_millis, write_empty_element, write_text_element,
};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Render `doc` as an Atom feed.
///
/// Atom requires an author on the feed unless every entry has one, so the
/// feed title is always given as the feed-level author.
pub fn render(doc: &FeedDocument) -> Result<String, OutputError> {
    let meta = &doc.metadata;
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut feed = BytesStart::new("feed");
    feed.push_attribute(("xmlns", ATOM_NS));
    feed.push_attribute(("xml:lang", meta.language.as_str()));
    writer.write_event(Event::Start(feed))?;

    write_text_element(&mut writer, "id", &meta.id)?;
    write_text_element(&mut writer, "title", &meta.title)?;
    write_text_element(&mut writer, "subtitle", &meta.description)?;
    write_text_element(&mut writer, "updated", &rfc3339_millis(&meta.updated))?;
    write_text_element(&mut writer, "generator", &meta.generator)?;
    write_empty_element(
        &mut writer,
        "link",
        &[("rel", "alternate"), ("href", meta.link.as_str())],
    )?;
    write_author(&mut writer, &meta.title)?;
    if !meta.copyright.is_empty() {
        write_text_element(&mut writer, "rights", &meta.copyright)?;
    }

    for item in &doc.items {
        let date = rfc3339_millis(&item.date);
        writer.write_event(Event::Start(BytesStart::new("entry")))?;
        write_text_element(&mut writer, "title", &item.title)?;
        write_text_element(&mut writer, "id", &item.id)?;
        write_empty_element(
            &mut writer,
            "link",
            &[("rel", "alternate"), ("href", item.link.as_str())],
        )?;
        write_text_element(&mut writer, "updated", &date)?;
        write_text_element(&mut writer, "published", &date)?;
        if let Some(author) = &item.author {
            write_author(&mut writer, &author.name)?;
        }
        if let Some(image) = &item.image {
            write_empty_element(
                &mut writer,
                "link",
                &[
                    ("rel", "enclosure"),
                    ("href", image.as_str()),
                    ("type", image_mime_type(image)),
                ],
            )?;
        }
        writer.write_event(Event::End(BytesEnd::new("entry")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("feed")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_author<W: std::io::Write>(writer: &mut Writer<W>, name: &str) -> Result<(), OutputError> {
    writer.write_event(Event::Start(BytesStart::new("author")))?;
    write_text_element(writer, "name", name)?;
    writer.write_event(Event::End(BytesEnd::new("author")))?;
    Ok(())
}
