//! RSS 2.0 serialization.

use anyhow::{Context, Result, anyhow};
use rss::validation::Validate;
use rss::{CategoryBuilder, Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use url::Url;

use super::{FeedDocument, FeedItem};
use crate::utils::html::strip_non_xml;

const GENERATOR: &str = "blogfeed";

impl FeedDocument {
    /// Serialize as an RSS 2.0 document.
    ///
    /// Relative item links are resolved against the site URL. The channel
    /// is validated before serialization.
    pub fn to_rss(&self) -> Result<String> {
        Ok(self.validated_channel()?.to_string())
    }

    /// Serialize as an indented RSS 2.0 document.
    ///
    /// Indentation only goes between elements; item HTML is untouched.
    pub fn to_rss_pretty(&self) -> Result<String> {
        let channel = self.validated_channel()?;
        let mut out = Vec::new();
        channel
            .pretty_write_to(&mut out, b' ', 2)
            .map_err(|e| anyhow!("failed to write RSS: {e}"))?;
        String::from_utf8(out).context("RSS output is not UTF-8")
    }

    /// Compact output when `minify` is set, indented otherwise.
    pub fn render(&self, minify: bool) -> Result<String> {
        if minify { self.to_rss() } else { self.to_rss_pretty() }
    }

    fn validated_channel(&self) -> Result<Channel> {
        let channel = self.to_channel()?;
        channel
            .validate()
            .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
        Ok(channel)
    }

    fn to_channel(&self) -> Result<Channel> {
        let base = Url::parse(&self.site)
            .with_context(|| format!("invalid site url `{}`", self.site))?;

        let items = self
            .items
            .iter()
            .map(|item| to_rss_item(item, &base))
            .collect::<Result<Vec<_>>>()?;

        // Channel date follows the newest post
        let pub_date = self
            .items
            .iter()
            .map(|item| item.pub_date)
            .max()
            .map(|date| date.to_rfc2822());

        Ok(ChannelBuilder::default()
            .title(xml_text(&self.title))
            .link(self.site.clone())
            .description(xml_text(&self.description))
            .language(Some(xml_text(&self.language)))
            .generator(Some(GENERATOR.to_string()))
            .pub_date(pub_date)
            .items(items)
            .build())
    }
}

fn to_rss_item(item: &FeedItem, base: &Url) -> Result<Item> {
    let link = base
        .join(&item.link)
        .with_context(|| format!("invalid post url `{}`", item.link))?
        .to_string();

    let categories = item
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().name(xml_text(tag)).build())
        .collect::<Vec<_>>();

    Ok(ItemBuilder::default()
        .title(Some(xml_text(&item.title)))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(Some(xml_text(&item.content)))
        .pub_date(Some(item.pub_date.to_rfc2822()))
        .categories(categories)
        .build())
}

/// Front-matter and config strings may carry control characters.
fn xml_text(text: &str) -> String {
    strip_non_xml(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::DateTimeUtc;
    use crate::utils::html::is_xml_char;

    fn item(link: &str, title: &str, date: DateTimeUtc, content: &str) -> FeedItem {
        FeedItem {
            link: link.into(),
            content: content.into(),
            title: title.into(),
            description: None,
            pub_date: date,
            tags: Vec::new(),
        }
    }

    fn document(items: Vec<FeedItem>) -> FeedDocument {
        FeedDocument {
            title: "My Blog".into(),
            description: "Notes".into(),
            site: "https://blog.example.com".into(),
            language: "en-us".into(),
            items,
        }
    }

    fn parse(xml: &str) -> Channel {
        Channel::read_from(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_channel_elements() {
        let xml = document(Vec::new()).to_rss().unwrap();
        assert!(xml.contains("<rss"));
        assert!(xml.contains("version=\"2.0\""));
        assert!(xml.contains("<language>en-us</language>"));

        let channel = parse(&xml);
        assert_eq!(channel.title(), "My Blog");
        assert_eq!(channel.link(), "https://blog.example.com");
        assert_eq!(channel.description(), "Notes");
        assert_eq!(channel.generator(), Some(GENERATOR));
        assert_eq!(channel.pub_date(), None);
        assert!(channel.items().is_empty());
    }

    #[test]
    fn test_items_round_trip() {
        let mut first = item(
            "/a",
            "A",
            DateTimeUtc::from_ymd(2023, 1, 1),
            "<p>Hi</p>",
        );
        first.tags = vec!["astro".into(), "blogging".into()];
        let second = item(
            "/b",
            "B & co",
            DateTimeUtc::from_ymd(2023, 2, 1),
            "<p>Bye</p>",
        );

        let xml = document(vec![first, second]).to_rss().unwrap();
        let channel = parse(&xml);
        let items = channel.items();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title(), Some("A"));
        assert_eq!(items[0].link(), Some("https://blog.example.com/a"));
        assert_eq!(items[0].description(), Some("<p>Hi</p>"));
        assert_eq!(items[0].pub_date(), Some("Sun, 01 Jan 2023 00:00:00 GMT"));

        let guid = items[0].guid().unwrap();
        assert!(guid.is_permalink());
        assert_eq!(guid.value(), "https://blog.example.com/a");

        let tags: Vec<_> = items[0].categories().iter().map(|c| c.name()).collect();
        assert_eq!(tags, ["astro", "blogging"]);

        assert_eq!(items[1].title(), Some("B & co"));
        assert_eq!(items[1].description(), Some("<p>Bye</p>"));
        assert_eq!(channel.pub_date(), Some("Wed, 01 Feb 2023 00:00:00 GMT"));
    }

    #[test]
    fn test_absolute_links_kept() {
        let xml = document(vec![item(
            "https://elsewhere.example.org/post",
            "X",
            DateTimeUtc::from_ymd(2023, 1, 1),
            "",
        )])
        .to_rss()
        .unwrap();
        let channel = parse(&xml);
        assert_eq!(
            channel.items()[0].link(),
            Some("https://elsewhere.example.org/post")
        );
    }

    #[test]
    fn test_invalid_site_url() {
        let mut doc = document(Vec::new());
        doc.site = "not a url".into();
        let err = doc.to_rss().unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_pretty_output_keeps_content() {
        let html = "<pre><code>fn main() {\n    run();\n}\n</code></pre>";
        let doc = document(vec![item("/a", "A", DateTimeUtc::from_ymd(2023, 1, 1), html)]);

        let pretty = doc.render(false).unwrap();
        let compact = doc.render(true).unwrap();
        assert!(pretty.lines().count() > compact.lines().count());

        for xml in [pretty, compact] {
            let channel = parse(&xml);
            assert_eq!(channel.items()[0].description(), Some(html));
        }
    }

    #[test]
    fn test_output_has_only_xml_characters() {
        let mut post = item(
            "/a",
            "Esc\u{1b} title\u{0}",
            DateTimeUtc::from_ymd(2023, 1, 1),
            "<p>raw \u{1b}[0m</p>",
        );
        post.tags = vec!["bell\u{7}".into()];
        let mut doc = document(vec![post]);
        doc.description = "Notes\u{b}".into();

        for xml in [doc.to_rss().unwrap(), doc.to_rss_pretty().unwrap()] {
            assert!(xml.chars().all(is_xml_char), "{xml:?}");
            let channel = parse(&xml);
            assert_eq!(channel.description(), "Notes");
            let item = &channel.items()[0];
            assert_eq!(item.title(), Some("Esc title"));
            assert_eq!(item.description(), Some("<p>raw [0m</p>"));
            assert_eq!(item.categories()[0].name(), "bell");
        }
    }
}
