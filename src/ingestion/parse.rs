use rss::{Channel, Item};

use super::types::{FeedDocument, FeedEntry};

pub fn parse_document(xml: &[u8]) -> Result<FeedDocument, rss::Error> {
    let ch = Channel::read_from(xml)?;
    Ok(FeedDocument {
        title: ch.title().trim().to_string(),
        items: ch.items().iter().map(to_entry).collect(),
    })
}

fn to_entry(item: &Item) -> FeedEntry {
    FeedEntry {
        title: item.title().map(str::trim).unwrap_or_default().to_string(),
        link: non_empty(item.link()),
        description: non_empty(item.description()),
        pub_date: non_empty(item.pub_date()),
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <title> Example Blog </title>
  <link>https://x/</link>
  <description>posts</description>
  <item>
    <title>First</title>
    <link>https://x/a</link>
    <description>about a</description>
    <pubDate>Mon, 02 Jan 2006 15:04:05 MST</pubDate>
  </item>
  <item>
    <title>Second &amp; last</title>
    <link>https://x/b</link>
    <description></description>
  </item>
  <item>
    <title>No link</title>
  </item>
</channel></rss>"#;

    #[test]
    fn parses_channel_and_items_in_order() {
        let doc = parse_document(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc.title, "Example Blog");
        assert_eq!(doc.items.len(), 3);

        assert_eq!(doc.items[0].title, "First");
        assert_eq!(doc.items[0].link.as_deref(), Some("https://x/a"));
        assert_eq!(doc.items[0].description.as_deref(), Some("about a"));
        assert_eq!(doc.items[0].pub_date.as_deref(), Some("Mon, 02 Jan 2006 15:04:05 MST"));

        assert_eq!(doc.items[1].title, "Second & last");
        assert_eq!(doc.items[1].description, None);
        assert_eq!(doc.items[1].pub_date, None);

        assert_eq!(doc.items[2].link, None);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_document(b"<rss><channel><title>broken").is_err());
        assert!(parse_document(b"not xml at all").is_err());
    }
}
