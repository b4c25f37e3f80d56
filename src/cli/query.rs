//! Query command: print post metadata as JSON.
//!
//! ```text
//! blogfeed query --pretty
//! [
//!   { "path": "content/posts/hello.md", "url": "/posts/hello", "title": "Hello", ... }
//! ]
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::QueryArgs;
use crate::config::SiteConfig;
use crate::log;
use crate::post::{Frontmatter, PostRecord, ScanOptions, scan_posts};
use crate::utils::plural::plural_count;

/// Result for a single post
#[derive(Debug, Serialize)]
struct PostSummary<'a> {
    path: String,
    url: &'a str,
    #[serde(flatten)]
    meta: &'a Frontmatter,
}

impl<'a> PostSummary<'a> {
    fn new(post: &'a PostRecord, root: &Path) -> Self {
        let path = post
            .source
            .as_deref()
            .map(|p| p.strip_prefix(root).unwrap_or(p).display().to_string())
            .unwrap_or_default();
        Self {
            path,
            url: &post.url,
            meta: &post.frontmatter,
        }
    }
}

pub fn run_query(args: &QueryArgs, config: &SiteConfig) -> Result<()> {
    let scan = ScanOptions {
        drafts: config.build.drafts,
    };
    let posts = scan_posts(&config.build.content, &scan)?;
    log!("query"; "found {}", plural_count(posts.len(), "post"));

    let formatted = format_posts(&posts, config.get_root(), args.pretty)?;

    if let Some(ref output_path) = args.output {
        let mut file = fs::File::create(output_path)
            .with_context(|| format!("failed to create {}", output_path.display()))?;
        writeln!(file, "{formatted}")?;
        log!("query"; "wrote output to {}", output_path.display());
    } else {
        println!("{formatted}");
    }

    Ok(())
}

fn format_posts(posts: &[PostRecord], root: &Path, pretty: bool) -> Result<String> {
    let summaries: Vec<_> = posts.iter().map(|p| PostSummary::new(p, root)).collect();
    let json = if pretty {
        serde_json::to_string_pretty(&summaries)?
    } else {
        serde_json::to_string(&summaries)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::LazyContent;
    use crate::utils::date::DateTimeUtc;
    use serde_json::Value;
    use std::path::PathBuf;

    fn post(url: &str, source: &str) -> PostRecord {
        let mut meta = Frontmatter::new("Hello", DateTimeUtc::from_ymd(2023, 1, 1));
        meta.tags = vec!["a".into()];
        PostRecord {
            source: Some(PathBuf::from(source)),
            ..PostRecord::new(url, meta, LazyContent::ready(""))
        }
    }

    #[test]
    fn test_format_posts() {
        let posts = [post("/posts/hello", "/blog/content/posts/hello.md")];
        let json = format_posts(&posts, Path::new("/blog"), false).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        let first = &value[0];
        assert_eq!(first["path"], "content/posts/hello.md");
        assert_eq!(first["url"], "/posts/hello");
        assert_eq!(first["title"], "Hello");
        assert_eq!(first["pubDate"], "2023-01-01");
        assert_eq!(first["tags"], serde_json::json!(["a"]));
    }

    #[test]
    fn test_format_keeps_path_url_first() {
        let posts = [post("/a", "/blog/a.md")];
        let json = format_posts(&posts, Path::new("/blog"), false).unwrap();
        assert!(json.starts_with("[{\"path\":\"a.md\",\"url\":\"/a\""));
    }

    #[test]
    fn test_pretty_output() {
        let posts = [post("/a", "/blog/a.md")];
        let json = format_posts(&posts, Path::new("/blog"), true).unwrap();
        assert!(json.contains("\n  {"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_posts(&[], Path::new("/"), false).unwrap(), "[]");
    }
}
