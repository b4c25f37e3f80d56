//! Blog posts: records, front-matter and markdown sources.
//!
//! A [`PostRecord`] carries everything known about a post up front (its URL
//! and validated front-matter) plus a [`LazyContent`] handle that produces
//! the rendered HTML only when the feed asks for it.

mod meta;
mod render;
mod scan;

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};

pub use meta::Frontmatter;
pub use scan::{ScanOptions, scan_posts};

use render::render_file;

/// Future yielding a post's rendered HTML.
pub type ContentFuture = BoxFuture<'static, Result<String>>;

/// Deferred, possibly failing computation of a post's HTML.
///
/// Cloning is cheap; every [`resolve`](Self::resolve) call starts a fresh
/// computation.
#[derive(Clone)]
pub struct LazyContent(Arc<dyn Fn() -> ContentFuture + Send + Sync>);

impl LazyContent {
    pub fn new<F, Fut>(resolve: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self(Arc::new(move || resolve().boxed()))
    }

    /// Content that is already known.
    pub fn ready(html: impl Into<String>) -> Self {
        let html: Arc<str> = Arc::from(html.into());
        Self::new(move || {
            let html = Arc::clone(&html);
            async move { Ok::<_, anyhow::Error>(html.to_string()) }
        })
    }

    /// Content rendered from a markdown file on a blocking worker.
    ///
    /// Must be resolved inside a tokio runtime.
    pub fn from_markdown_file(path: PathBuf) -> Self {
        Self::new(move || {
            let path = path.clone();
            async move {
                tokio::task::spawn_blocking(move || render_file(&path))
                    .await
                    .context("render task failed")?
            }
        })
    }

    /// Start computing the HTML.
    pub fn resolve(&self) -> ContentFuture {
        (self.0)()
    }
}

impl fmt::Debug for LazyContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyContent(..)")
    }
}

/// One blog post as seen by the feed builder.
#[derive(Debug, Clone)]
pub struct PostRecord {
    /// Site-relative URL (`/posts/hello`) or absolute URL
    pub url: String,
    pub frontmatter: Frontmatter,
    pub content: LazyContent,
    /// Markdown file the post was loaded from, if any
    pub source: Option<PathBuf>,
}

impl PostRecord {
    pub fn new(url: impl Into<String>, frontmatter: Frontmatter, content: LazyContent) -> Self {
        Self {
            url: url.into(),
            frontmatter,
            content,
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::DateTimeUtc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_ready_content() {
        let content = LazyContent::ready("<p>x</p>");
        assert_eq!(content.resolve().await.unwrap(), "<p>x</p>");
        assert_eq!(content.clone().resolve().await.unwrap(), "<p>x</p>");
    }

    #[tokio::test]
    async fn test_content_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let content = LazyContent::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, anyhow::Error>("html".to_string()) }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        content.resolve().await.unwrap();
        content.resolve().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_content_from_markdown_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "---\ntitle: a\npubDate: 2023-01-01\n---\n*hi*").unwrap();

        let html = LazyContent::from_markdown_file(path).resolve().await.unwrap();
        assert_eq!(html, "<p><em>hi</em></p>\n");
    }

    #[tokio::test]
    async fn test_content_from_missing_file_fails() {
        let content = LazyContent::from_markdown_file(PathBuf::from("/nonexistent/x.md"));
        assert!(content.resolve().await.is_err());
    }

    #[test]
    fn test_record_debug_hides_content() {
        let post = PostRecord::new(
            "/a",
            Frontmatter::new("A", DateTimeUtc::from_ymd(2023, 1, 1)),
            LazyContent::ready(""),
        );
        assert!(format!("{post:?}").contains("LazyContent(..)"));
    }
}
