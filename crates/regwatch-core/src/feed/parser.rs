use quick_xml::events::Event;
use quick_xml::Reader;

use super::models::FeedRecord;
use crate::{Error, Result};

// Depths (root element = 1) of `rss/channel/item/<field>`
const ITEM_DEPTH: usize = 3;
const FIELD_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Link,
    PubDate,
    Description,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"link" => Some(Self::Link),
            b"pubDate" => Some(Self::PubDate),
            b"description" => Some(Self::Description),
            _ => None,
        }
    }
}

/// Fields of the item being read. `None` means the element has not been seen yet.
#[derive(Debug, Default)]
struct ItemBuilder {
    title: Option<String>,
    link: Option<String>,
    pub_date: Option<String>,
    description: Option<String>,
}

impl ItemBuilder {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
            Field::Description => &mut self.description,
        }
    }

    fn build(self) -> FeedRecord {
        fn finish(value: Option<String>) -> String {
            value.map(|v| v.trim().to_string()).unwrap_or_default()
        }

        FeedRecord {
            title: finish(self.title),
            link: finish(self.link),
            pub_date_raw: finish(self.pub_date),
            description: finish(self.description),
        }
    }
}

/// Tracks the open-element path and the item currently being assembled
#[derive(Default)]
struct FeedWalker {
    stack: Vec<Vec<u8>>,
    saw_root: bool,
    item: Option<ItemBuilder>,
    capturing: Option<Field>,
    records: Vec<FeedRecord>,
}

impl FeedWalker {
    fn inside_item(&self) -> bool {
        self.stack.len() >= ITEM_DEPTH
            && self.stack[1] == b"channel"
            && self.stack[2] == b"item"
    }

    fn open(&mut self, name: &[u8]) -> Result<()> {
        if self.stack.is_empty() {
            if self.saw_root {
                return Err(Error::MalformedFeed(
                    "more than one root element".to_string(),
                ));
            }
            self.saw_root = true;
        }
        self.stack.push(name.to_vec());

        match self.stack.len() {
            ITEM_DEPTH if self.inside_item() => {
                self.item = Some(ItemBuilder::default());
            }
            FIELD_DEPTH => {
                self.capturing = None;
                if let (Some(item), Some(field)) = (self.item.as_mut(), Field::from_name(name)) {
                    // First occurrence wins
                    let slot = item.slot(field);
                    if slot.is_none() {
                        *slot = Some(String::new());
                        self.capturing = Some(field);
                    }
                }
            }
            // A field's value is the text before its first child element
            depth if depth > FIELD_DEPTH => self.capturing = None,
            _ => {}
        }

        Ok(())
    }

    fn close(&mut self) {
        match self.stack.len() {
            ITEM_DEPTH => {
                if let Some(item) = self.item.take() {
                    self.records.push(item.build());
                }
            }
            FIELD_DEPTH => self.capturing = None,
            _ => {}
        }
        self.stack.pop();
    }

    fn text(&mut self, text: &str) {
        if self.stack.len() != FIELD_DEPTH {
            return;
        }
        if let (Some(field), Some(item)) = (self.capturing, self.item.as_mut()) {
            if let Some(value) = item.slot(field) {
                value.push_str(text);
            }
        }
    }

    fn finish(self) -> Result<Vec<FeedRecord>> {
        if !self.saw_root {
            return Err(Error::MalformedFeed("no root element found".to_string()));
        }
        if let Some(open) = self.stack.last() {
            return Err(Error::MalformedFeed(format!(
                "unclosed element <{}>",
                String::from_utf8_lossy(open)
            )));
        }
        Ok(self.records)
    }
}

/// Parse RSS content into records, one per `channel/item`, in document order
pub fn parse_feed(content: &[u8]) -> Result<Vec<FeedRecord>> {
    let mut reader = Reader::from_reader(content);
    let mut buf = Vec::new();
    let mut walker = FeedWalker::default();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            Error::MalformedFeed(format!(
                "XML error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        });

        match event? {
            Event::Start(e) => walker.open(e.name().as_ref())?,
            Event::Empty(e) => {
                walker.open(e.name().as_ref())?;
                walker.close();
            }
            Event::End(_) => walker.close(),
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::MalformedFeed(e.to_string()))?;
                walker.text(&text);
            }
            Event::CData(e) => {
                let text = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|e| Error::MalformedFeed(e.to_string()))?;
                walker.text(&text);
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    let records = walker.finish()?;
    tracing::debug!("Parsed {} feed records", records.len());

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_in_document_order() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>SEBI</title>
    <link>https://www.sebi.gov.in</link>
    <item>
      <title>First circular</title>
      <link>https://www.sebi.gov.in/one.html</link>
      <pubDate>17 Oct, 2025 +0530</pubDate>
      <description>one</description>
    </item>
    <item>
      <title>Second circular</title>
      <link>https://www.sebi.gov.in/two.html</link>
      <pubDate>16 Oct, 2025 +0530</pubDate>
      <description>two</description>
    </item>
    <item>
      <title>Third</title>
    </item>
  </channel>
</rss>"#;

        let records = parse_feed(xml).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title, "First circular");
        assert_eq!(records[0].link, "https://www.sebi.gov.in/one.html");
        assert_eq!(records[0].pub_date_raw, "17 Oct, 2025 +0530");
        assert_eq!(records[1].description, "two");
        // Channel-level title/link never leak into items
        assert_eq!(records[2].title, "Third");
        assert_eq!(records[2].link, "");
        assert_eq!(records[2].pub_date_raw, "");
        assert_eq!(records[2].description, "");
    }

    #[test]
    fn test_cdata_and_entities() {
        let xml = br#"<rss><channel><item>
            <title>Amendment &amp; Clarification</title>
            <description><![CDATA[<p>Details <b>here</b></p>]]></description>
        </item></channel></rss>"#;

        let records = parse_feed(xml).unwrap();
        assert_eq!(records[0].title, "Amendment & Clarification");
        assert_eq!(records[0].description, "<p>Details <b>here</b></p>");
    }

    #[test]
    fn test_empty_elements() {
        let xml = br#"<rss><channel><item><title/><link>x</link></item><item/></channel></rss>"#;

        let records = parse_feed(xml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "");
        assert_eq!(records[0].link, "x");
        assert_eq!(records[1], FeedRecord::default());
    }

    #[test]
    fn test_text_after_nested_child_ignored() {
        let xml = br#"<rss><channel><item>
            <description>a<b>x</b>c</description>
            <title>Circular<br/> on ABC</title>
        </item></channel></rss>"#;
        let records = parse_feed(xml).unwrap();
        assert_eq!(records[0].description, "a");
        assert_eq!(records[0].title, "Circular");
    }

    #[test]
    fn test_declared_latin1_encoding() {
        let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\
<rss><channel><item><title>R\xE9sum\xE9</title>\
<description><![CDATA[caf\xE9]]></description></item></channel></rss>";

        let records = parse_feed(xml).unwrap();
        assert_eq!(records[0].title, "R\u{e9}sum\u{e9}");
        assert_eq!(records[0].description, "caf\u{e9}");
    }

    #[test]
    fn test_first_field_occurrence_wins() {
        let xml = br#"<rss><channel><item><title>a</title><title>b</title></item></channel></rss>"#;
        let records = parse_feed(xml).unwrap();
        assert_eq!(records[0].title, "a");
    }

    #[test]
    fn test_namespaced_children_ignored() {
        let xml = br#"<rss xmlns:atom="http://www.w3.org/2005/Atom"><channel><item>
            <atom:link href="https://example.com/self"/>
            <link>https://example.com/entry</link>
        </item></channel></rss>"#;
        let records = parse_feed(xml).unwrap();
        assert_eq!(records[0].link, "https://example.com/entry");
    }

    #[test]
    fn test_items_outside_channel_ignored() {
        let xml = br#"<rss><item><title>stray</title></item><channel><group><item><title>nested</title></item></group></channel></rss>"#;
        let records = parse_feed(xml).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_no_channel_yields_no_records() {
        let records = parse_feed(b"<rss version=\"2.0\"></rss>").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            parse_feed(b"<rss><channel></rss>"),
            Err(Error::MalformedFeed(_))
        ));
        assert!(matches!(
            parse_feed(b"<rss><channel><item>"),
            Err(Error::MalformedFeed(_))
        ));
        assert!(matches!(parse_feed(b""), Err(Error::MalformedFeed(_))));
        assert!(matches!(
            parse_feed(b"not xml at all"),
            Err(Error::MalformedFeed(_))
        ));
    }
}
