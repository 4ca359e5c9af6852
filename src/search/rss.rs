//! RSS/Atom feed parsing with quick-xml
//!
//! Handles both RSS 2.0 (`<item>` with `<link>` text) and Atom (`<entry>`
//! with `<link href="..."/>`), since Google News serves the former and
//! Reddit the latter. Snippets come from `description`, `summary`, or
//! `content`, CDATA included.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{SearchResult, SourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Snippet,
}

/// Extract up to `max_items` title/snippet/link triples from a feed body
pub fn parse_feed_items(xml: &str, max_items: usize, source: SourceKind) -> Vec<SearchResult> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut field: Option<Field> = None;
    let mut title = String::new();
    let mut link = String::new();
    let mut snippet = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" | b"entry" => {
                    in_item = true;
                    title.clear();
                    link.clear();
                    snippet.clear();
                }
                b"title" if in_item => field = Some(Field::Title),
                b"link" if in_item => {
                    // Atom carries the URL as an attribute even on non-empty tags
                    if let Some(href) = href_attr(&e) {
                        link = href;
                        field = None;
                    } else {
                        field = Some(Field::Link);
                    }
                }
                b"description" | b"summary" | b"content" if in_item => {
                    field = Some(Field::Snippet)
                }
                _ => field = None,
            },
            Ok(Event::Empty(e)) if in_item && e.name().as_ref() == b"link" => {
                if let Some(href) = href_attr(&e) {
                    link = href;
                }
            }
            Ok(Event::Text(t)) if in_item => {
                if let Some(f) = field {
                    let text = t.unescape().unwrap_or_default();
                    append(f, &text, &mut title, &mut link, &mut snippet);
                }
            }
            Ok(Event::CData(t)) if in_item => {
                if let Some(f) = field {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    append(f, &text, &mut title, &mut link, &mut snippet);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" | b"entry" => {
                    in_item = false;
                    items.push(SearchResult {
                        title: title.clone(),
                        snippet: snippet.clone(),
                        link: link.clone(),
                        source,
                    });
                    if items.len() >= max_items {
                        break;
                    }
                }
                _ => field = None,
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("Feed parse error, keeping {} items: {}", items.len(), e);
                break;
            }
            _ => {}
        }
    }

    items
}

fn href_attr(e: &quick_xml::events::BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"href")
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn append(field: Field, text: &str, title: &mut String, link: &mut String, snippet: &mut String) {
    let target = match field {
        Field::Title => title,
        Field::Link => link,
        Field::Snippet => snippet,
    };
    target.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Search results</title>
    <item>
      <title>AI fitness startup raises $10M</title>
      <link>https://example.com/article-1</link>
      <description>Series A for a computer-vision coach.</description>
    </item>
    <item>
      <title><![CDATA[Market report: wearables & coaching]]></title>
      <link>https://example.com/article-2</link>
      <description><![CDATA[<b>Growth</b> projected at 12% CAGR.]]></description>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>search results</title>
  <entry>
    <title>Anyone tried AI personal trainers?</title>
    <link href="https://www.reddit.com/r/fitness/comments/abc"/>
    <content type="html">Looking for recommendations.</content>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_items() {
        let items = parse_feed_items(RSS_SAMPLE, 5, SourceKind::NewsFeed);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "AI fitness startup raises $10M");
        assert_eq!(items[0].link, "https://example.com/article-1");
        assert_eq!(items[0].snippet, "Series A for a computer-vision coach.");
        assert_eq!(items[0].source, SourceKind::NewsFeed);
        // CDATA bodies come through verbatim
        assert_eq!(items[1].title, "Market report: wearables & coaching");
        assert!(items[1].snippet.contains("12% CAGR"));
    }

    #[test]
    fn test_parse_atom_entries() {
        let items = parse_feed_items(ATOM_SAMPLE, 5, SourceKind::Reddit);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Anyone tried AI personal trainers?");
        assert_eq!(items[0].link, "https://www.reddit.com/r/fitness/comments/abc");
        assert_eq!(items[0].snippet, "Looking for recommendations.");
    }

    #[test]
    fn test_max_items_cap() {
        let items = parse_feed_items(RSS_SAMPLE, 1, SourceKind::NewsFeed);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_malformed_feed_is_empty_not_error() {
        let items = parse_feed_items("not xml at all", 5, SourceKind::NewsFeed);
        assert!(items.is_empty());
    }

    #[test]
    fn test_channel_title_not_picked_up() {
        // The feed-level <title> sits outside any item and must be ignored
        let items = parse_feed_items(RSS_SAMPLE, 5, SourceKind::NewsFeed);
        assert!(items.iter().all(|i| i.title != "Search results"));
    }
}
