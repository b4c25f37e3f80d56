//! Markdown rendering with pulldown-cmark.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pulldown_cmark::{Options, Parser, html};

use super::meta::strip_frontmatter;

/// CommonMark extensions to turn on. `Default` is plain CommonMark.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    /// `# Heading {#id .class}`
    pub heading_attributes: bool,
}

impl MarkdownOptions {
    /// What posts are rendered with.
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
        }
    }

    fn pulldown(self) -> Options {
        [
            (self.tables, Options::ENABLE_TABLES),
            (self.footnotes, Options::ENABLE_FOOTNOTES),
            (self.strikethrough, Options::ENABLE_STRIKETHROUGH),
            (self.task_lists, Options::ENABLE_TASKLISTS),
            (self.heading_attributes, Options::ENABLE_HEADING_ATTRIBUTES),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .fold(Options::empty(), |options, (_, flag)| options | flag)
    }
}

/// Render a markdown body to an HTML fragment.
pub fn render_markdown(body: &str, options: MarkdownOptions) -> String {
    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(body, options.pulldown()));
    out
}

/// Render a post file, front-matter excluded.
pub fn render_file(path: &Path) -> Result<String> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(render_markdown(strip_frontmatter(&source), MarkdownOptions::all()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic() {
        let out = render_markdown("# Hi\n\nSome *text*.", MarkdownOptions::default());
        assert_eq!(out, "<h1>Hi</h1>\n<p>Some <em>text</em>.</p>\n");
    }

    #[test]
    fn test_render_extensions() {
        let src = "| a |\n|---|\n| 1 |\n\n~~gone~~\n\n- [x] done";
        let out = render_markdown(src, MarkdownOptions::all());
        assert!(out.contains("<table>"));
        assert!(out.contains("<del>gone</del>"));
        assert!(out.contains("checkbox"));

        let plain = render_markdown("~~gone~~", MarkdownOptions::default());
        assert!(!plain.contains("<del>"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        // Rendering keeps inline HTML; the feed sanitizer removes what is unsafe
        let out = render_markdown("<script>x()</script>\n", MarkdownOptions::default());
        assert!(out.contains("<script>"));
    }

    #[test]
    fn test_render_file_skips_frontmatter() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("post.md");
        fs::write(&path, "---\ntitle: x\npubDate: 2023-01-01\n---\n\nHello").unwrap();

        assert_eq!(render_file(&path).unwrap(), "<p>Hello</p>\n");
    }

    #[test]
    fn test_render_file_missing() {
        let err = render_file(Path::new("/nonexistent/post.md")).unwrap_err();
        assert!(err.to_string().contains("post.md"));
    }
}
