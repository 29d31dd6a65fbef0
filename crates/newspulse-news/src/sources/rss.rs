//! Lenient RSS `<item>` parsing and HTML stripping.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::types::FeedEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    Source,
    PubDate,
}

impl Field {
    fn from_tag(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"description" => Some(Self::Description),
            b"source" => Some(Self::Source),
            b"pubDate" => Some(Self::PubDate),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct PartialEntry {
    title: Option<String>,
    description: Option<String>,
    source: Option<String>,
    pub_date: Option<String>,
}

impl PartialEntry {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Source => &mut self.source,
            Field::PubDate => &mut self.pub_date,
        }
    }

    fn open(&mut self, field: Field) {
        self.slot(field).get_or_insert_with(String::new);
    }

    // Text nodes arrive trimmed, so fragments split by nested tags are rejoined with a space.
    fn append(&mut self, field: Field, text: &str) {
        let slot = self.slot(field).get_or_insert_with(String::new);
        if !slot.is_empty() {
            slot.push(' ');
        }
        slot.push_str(text);
    }

    fn finish(self) -> FeedEntry {
        FeedEntry {
            title: self
                .title
                .map_or_else(|| FeedEntry::NO_TITLE.to_string(), |t| t.trim().to_string()),
            description: self
                .description
                .map_or_else(|| FeedEntry::NO_SUMMARY.to_string(), |d| strip_html(&d)),
            source: self
                .source
                .map_or_else(|| FeedEntry::UNKNOWN.to_string(), |s| s.trim().to_string()),
            published: self
                .pub_date
                .map_or_else(|| FeedEntry::UNKNOWN.to_string(), |p| p.trim().to_string()),
        }
    }
}

/// Parse every `<item>` of an RSS document into a [`FeedEntry`], in feed order.
///
/// Missing fields take the `FeedEntry` placeholders; description markup is
/// stripped. A malformed document yields the items completed before the
/// syntax error rather than an error.
#[must_use]
pub fn parse_feed(xml: &str) -> Vec<FeedEntry> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let mut entries = Vec::new();
    let mut item: Option<PartialEntry> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if name.as_ref() == b"item" {
                    item = Some(PartialEntry::default());
                    field = None;
                } else if let Some(current) = item.as_mut() {
                    if field.is_none() {
                        field = Field::from_tag(name.as_ref());
                        if let Some(f) = field {
                            current.open(f);
                        }
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if let (Some(current), None) = (item.as_mut(), field) {
                    if let Some(f) = Field::from_tag(e.name().as_ref()) {
                        current.open(f);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if name.as_ref() == b"item" {
                    if let Some(done) = item.take() {
                        entries.push(done.finish());
                    }
                    field = None;
                } else if field.is_some() && field == Field::from_tag(name.as_ref()) {
                    field = None;
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(current), Some(f)) = (item.as_mut(), field) {
                    let text = match e.unescape() {
                        Ok(text) => text.into_owned(),
                        Err(_) => String::from_utf8_lossy(&e).into_owned(),
                    };
                    current.append(f, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(current), Some(f)) = (item.as_mut(), field) {
                    current.append(f, &String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    parsed = entries.len(),
                    "malformed feed document; keeping items parsed so far"
                );
                break;
            }
            _ => {}
        }
    }

    entries
}

/// Strip HTML tags from a string, decode common entities, and collapse whitespace.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    let out = out.replace("&nbsp;", " ").replace("&#160;", " ");
    let decoded = match quick_xml::escape::unescape(&out) {
        Ok(text) => text.into_owned(),
        Err(_) => out,
    };
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"Acme" - Google News</title>
    <item>
      <title>Acme posts record profit - Example Times</title>
      <link>https://news.example.com/acme-profit</link>
      <pubDate>Mon, 06 Jan 2025 08:00:00 GMT</pubDate>
      <description>&lt;a href="https://news.example.com/acme-profit"&gt;Acme posts record profit&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;Example Times&lt;/font&gt;</description>
      <source url="https://news.example.com">Example Times</source>
    </item>
    <item>
      <title>Markets wrap</title>
    </item>
  </channel>
</rss>"##;

    #[test]
    fn parses_items_in_order() {
        let entries = parse_feed(SAMPLE_RSS);
        assert_eq!(entries.len(), 2, "expected 2 entries, got {}", entries.len());
        assert_eq!(entries[0].title, "Acme posts record profit - Example Times");
        assert_eq!(entries[0].source, "Example Times");
        assert_eq!(entries[0].published, "Mon, 06 Jan 2025 08:00:00 GMT");
        assert_eq!(entries[1].title, "Markets wrap");
    }

    #[test]
    fn description_markup_is_stripped() {
        let entries = parse_feed(SAMPLE_RSS);
        assert_eq!(
            entries[0].description,
            "Acme posts record profit Example Times"
        );
    }

    #[test]
    fn missing_fields_use_placeholders() {
        let entries = parse_feed(SAMPLE_RSS);
        assert_eq!(entries[1].description, "No summary available");
        assert_eq!(entries[1].source, "Unknown");
        assert_eq!(entries[1].published, "Unknown");
    }

    #[test]
    fn missing_title_uses_placeholder() {
        let xml = "<rss><channel><item><description>Acme update</description></item></channel></rss>";
        let entries = parse_feed(xml);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "No title");
        assert_eq!(entries[0].description, "Acme update");
    }

    #[test]
    fn empty_element_yields_empty_string() {
        let xml = "<rss><channel><item><title>Acme</title><source/></item></channel></rss>";
        let entries = parse_feed(xml);
        assert_eq!(entries[0].source, "");
    }

    #[test]
    fn channel_title_is_ignored() {
        let xml = "<rss><channel><title>Feed title</title></channel></rss>";
        assert!(parse_feed(xml).is_empty());
    }

    #[test]
    fn cdata_description_is_stripped() {
        let xml = r#"<rss><channel><item>
            <title>Acme expands</title>
            <description><![CDATA[<p>Acme <b>opens</b> a plant</p>]]></description>
        </item></channel></rss>"#;
        let entries = parse_feed(xml);
        assert_eq!(entries[0].description, "Acme opens a plant");
    }

    #[test]
    fn raw_nested_markup_in_description_is_flattened() {
        let xml = "<rss><channel><item><title>T</title>\
                   <description>Acme <b>beats</b> estimates<br></description>\
                   </item></channel></rss>";
        let entries = parse_feed(xml);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "Acme beats estimates");
    }

    #[test]
    fn empty_feed_returns_empty_vec() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel></channel></rss>"#;
        assert!(parse_feed(xml).is_empty());
    }

    #[test]
    fn truncated_document_keeps_complete_items() {
        let xml = "<rss><channel><item><title>Acme one</title></item><item><title>Unclosed";
        let entries = parse_feed(xml);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Acme one");
    }

    #[test]
    fn strip_html_decodes_entities_and_collapses_whitespace() {
        assert_eq!(
            strip_html("<a>Acme &amp; Co</a>&nbsp;&nbsp;\n  <i>rises</i> &quot;again&quot;"),
            "Acme & Co rises \"again\""
        );
    }

    #[test]
    fn strip_html_keeps_unknown_entities_verbatim() {
        assert_eq!(strip_html("Acme &hellip; more"), "Acme &hellip; more");
    }
}
