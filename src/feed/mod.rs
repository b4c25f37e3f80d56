//! Feed building.
//!
//! Turns an ordered list of [`PostRecord`]s into a [`FeedDocument`]:
//!
//! ```text
//! posts ──► resolve content (concurrent, bounded) ──► sanitize ──► FeedItem
//!                                                                   │
//!                     FeedDocument { title, description, site, items }
//! ```
//!
//! Content resolutions run concurrently but are joined in input order, so
//! item `i` always comes from post `i`. A single failed resolution fails the
//! whole build.

mod rss;

use anyhow::{Context, Result, bail};
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::config::{FeedConfig, SiteInfoConfig};
use crate::debug;
use crate::post::PostRecord;
use crate::sanitize::{SanitizePolicy, sanitize};
use crate::utils::date::DateTimeUtc;

/// Channel-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    pub title: String,
    pub description: String,
    /// Absolute base URL of the site
    pub url: String,
    /// Channel `<language>`
    pub language: String,
}

impl SiteInfo {
    /// Channel metadata from the `[site]` section.
    pub fn from_config(config: &SiteInfoConfig) -> Result<Self> {
        let Some(url) = config.url.clone() else {
            bail!("[site.url] is required to build a feed");
        };
        Ok(Self {
            title: config.title.clone(),
            description: config.description.clone(),
            url,
            language: config.language.clone(),
        })
    }
}

/// Knobs for [`build_feed`].
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Maximum number of content resolutions in flight
    pub concurrency: usize,
    pub policy: SanitizePolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            concurrency: 16,
            policy: SanitizePolicy::default(),
        }
    }
}

impl BuildOptions {
    pub fn from_config(config: &FeedConfig) -> Self {
        Self {
            concurrency: config.concurrency,
            policy: config.policy(),
        }
    }
}

/// One `<item>` of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// The post url, unchanged
    pub link: String,
    /// Sanitized HTML
    pub content: String,
    pub title: String,
    pub description: Option<String>,
    pub pub_date: DateTimeUtc,
    pub tags: Vec<String>,
}

impl FeedItem {
    fn new(post: &PostRecord, content: String) -> Self {
        let meta = &post.frontmatter;
        Self {
            link: post.url.clone(),
            content,
            title: meta.title.clone(),
            description: meta.description.clone(),
            pub_date: meta.pub_date,
            tags: meta.tags.clone(),
        }
    }
}

/// A complete feed, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub title: String,
    pub description: String,
    /// Base URL of the site (channel `<link>`)
    pub site: String,
    /// Channel `<language>`, `en-us` unless configured
    pub language: String,
    pub items: Vec<FeedItem>,
}

/// Build the feed document from `posts`, keeping their order.
///
/// Fails if any post's content fails to resolve; the error names the post.
pub async fn build_feed(
    site: &SiteInfo,
    posts: &[PostRecord],
    options: &BuildOptions,
) -> Result<FeedDocument> {
    let policy = &options.policy;

    let items: Vec<FeedItem> = stream::iter(posts)
        .map(|post| async move {
            let html = post
                .content
                .resolve()
                .await
                .with_context(|| format!("failed to resolve content of {}", post.url))?;
            Ok::<_, anyhow::Error>(FeedItem::new(post, sanitize(&html, policy)))
        })
        .buffered(options.concurrency.max(1))
        .try_collect()
        .await?;

    debug!("rss"; "built {} items", items.len());

    Ok(FeedDocument {
        title: site.title.clone(),
        description: site.description.clone(),
        site: site.url.clone(),
        language: site.language.clone(),
        items,
    })
}
