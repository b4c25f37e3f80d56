//! Post front-matter: detection, parsing and validation.
//!
//! Two header formats are recognized at the top of a markdown file:
//!
//! ```text
//! ---                                  +++
//! layout: ../layouts/Post.astro        title = "Hello"
//! title: "Hello"                       pubDate = 2023-01-01
//! pubDate: 2023-01-01                  tags = ["a", "b"]
//! tags: ["a", "b"]                     +++
//! ---
//! ```
//!
//! | Field         | Type          | Required |
//! |---------------|---------------|----------|
//! | `title`       | string        | yes      |
//! | `description` | string        | no       |
//! | `pubDate`     | date          | yes      |
//! | `tags`        | list          | no       |
//! | `layout`      | string        | no       |
//! | `draft`       | bool          | no       |
//!
//! `pubDate` also accepts the keys `pub_date`, `pub-date` and `date`.

use anyhow::{Result, anyhow, bail};
use serde::Serialize;

use crate::debug;
use crate::utils::date::DateTimeUtc;

/// Validated post metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub pub_date: DateTimeUtc,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
}

impl Frontmatter {
    /// Minimal metadata: a title and a date.
    pub fn new(title: impl Into<String>, pub_date: DateTimeUtc) -> Self {
        Self {
            title: title.into(),
            description: None,
            pub_date,
            tags: Vec::new(),
            layout: None,
            draft: false,
        }
    }
}

/// Header delimiter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// `---` fences, `key: value` lines
    Yaml,
    /// `+++` fences, TOML table
    Toml,
}

/// Front-matter fields as written, before validation.
#[derive(Debug, Default)]
struct RawFrontmatter {
    title: Option<String>,
    description: Option<String>,
    pub_date: Option<String>,
    tags: Vec<String>,
    layout: Option<String>,
    draft: bool,
}

impl RawFrontmatter {
    fn validate(self) -> Result<Frontmatter> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("missing `title` in front-matter"))?;

        let date = self
            .pub_date
            .ok_or_else(|| anyhow!("missing `pubDate` in front-matter"))?;
        let pub_date = DateTimeUtc::parse(&date)
            .ok_or_else(|| anyhow!("invalid `pubDate` value '{date}'"))?;

        Ok(Frontmatter {
            title,
            description: self.description.filter(|d| !d.is_empty()),
            pub_date,
            tags: self.tags,
            layout: self.layout,
            draft: self.draft,
        })
    }
}

/// Parse a post source into its metadata and markdown body.
///
/// A file without a front-matter header is an error: every post needs at
/// least a title and a publication date.
pub fn parse_post(source: &str) -> Result<(Frontmatter, &str)> {
    let Some((header, body, format)) = split_frontmatter(source) else {
        bail!("no front-matter header (`---` or `+++` fenced block) found");
    };

    let raw = match format {
        Format::Yaml => parse_yaml_like(header),
        Format::Toml => parse_toml(header)?,
    };

    Ok((raw.validate()?, body))
}

/// Markdown body of a post source, without its front-matter header.
pub fn strip_frontmatter(source: &str) -> &str {
    split_frontmatter(source).map_or(source, |(_, body, _)| body)
}

/// Detect and split the header.
/// Returns `(header, body, format)` if found.
fn split_frontmatter(content: &str) -> Option<(&str, &str, Format)> {
    let trimmed = content.trim_start_matches('\u{FEFF}').trim_start();

    for (fence, format) in [("---", Format::Yaml), ("+++", Format::Toml)] {
        if let Some(rest) = trimmed.strip_prefix(fence)
            && let Some(end) = rest.find(&format!("\n{fence}"))
        {
            let header = rest[..end].trim();
            let after = &rest[end + 1 + fence.len()..];
            // Rest of the closing fence line
            let body = after
                .split_once('\n')
                .map_or("", |(_, body)| body)
                .trim_start_matches(['\r', '\n']);
            return Some((header, body, format));
        }
    }

    None
}

// ============================================================================
// YAML-like
// ============================================================================

/// Parse simple YAML-like front-matter (`key: value`).
///
/// Supports quoted strings, inline lists (`[a, "b"]` or `a, b`) and block
/// lists (`- item` lines under an empty `key:`).
fn parse_yaml_like(content: &str) -> RawFrontmatter {
    let mut meta = RawFrontmatter::default();
    let mut list_key: Option<String> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Block list item belonging to the previous key
        if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix('-'))
            && let Some(key) = &list_key
        {
            if key == "tags" {
                let item = unquote(item.trim());
                if !item.is_empty() {
                    meta.tags.push(item.to_string());
                }
            }
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        list_key = value.is_empty().then(|| key.clone());
        if value.is_empty() {
            continue;
        }

        match key.as_str() {
            "title" => meta.title = Some(unquote(value).to_string()),
            "description" => meta.description = Some(unquote(value).to_string()),
            "pubdate" | "pub_date" | "pub-date" | "date" => {
                meta.pub_date = Some(unquote(value).to_string());
            }
            "tags" => meta.tags = parse_inline_list(value),
            "layout" => meta.layout = Some(unquote(value).to_string()),
            "draft" => meta.draft = unquote(value).eq_ignore_ascii_case("true"),
            _ => debug!("meta"; "ignoring front-matter key `{}`", key),
        }
    }

    meta
}

/// Parse `[a, "b"]` or `a, b` into a list of strings.
fn parse_inline_list(value: &str) -> Vec<String> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);

    inner
        .split(',')
        .map(|item| unquote(item.trim()).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Strip one pair of matching quotes.
fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

// ============================================================================
// TOML
// ============================================================================

/// Parse TOML front-matter.
fn parse_toml(content: &str) -> Result<RawFrontmatter> {
    let table: toml::Table =
        toml::from_str(content).map_err(|e| anyhow!("invalid TOML front-matter: {e}"))?;

    let mut meta = RawFrontmatter::default();
    for (key, value) in &table {
        match key.to_ascii_lowercase().as_str() {
            "title" => meta.title = Some(toml_string(key, value)?),
            "description" => meta.description = Some(toml_string(key, value)?),
            "pubdate" | "pub_date" | "pub-date" | "date" => {
                meta.pub_date = Some(match value {
                    toml::Value::Datetime(dt) => dt.to_string(),
                    other => toml_string(key, other)?,
                });
            }
            "tags" => {
                let toml::Value::Array(items) = value else {
                    bail!("`{key}` must be an array of strings");
                };
                meta.tags = items
                    .iter()
                    .map(|item| toml_string(key, item))
                    .collect::<Result<_>>()?;
            }
            "layout" => meta.layout = Some(toml_string(key, value)?),
            "draft" => {
                meta.draft = value
                    .as_bool()
                    .ok_or_else(|| anyhow!("`{key}` must be a boolean"))?;
            }
            _ => debug!("meta"; "ignoring front-matter key `{}`", key),
        }
    }

    Ok(meta)
}

fn toml_string(key: &str, value: &toml::Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("`{key}` must be a string"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_frontmatter() {
        let source = "---\nlayout: ../../layouts/Post.astro\ntitle: \"Hello, world\"\ndescription: 'First post'\npubDate: 2023-01-01\ntags: [\"astro\", \"blogging\"]\n---\n\n# Body\n";
        let (meta, body) = parse_post(source).unwrap();

        assert_eq!(meta.title, "Hello, world");
        assert_eq!(meta.description.as_deref(), Some("First post"));
        assert_eq!(meta.pub_date, DateTimeUtc::from_ymd(2023, 1, 1));
        assert_eq!(meta.tags, vec!["astro", "blogging"]);
        assert_eq!(meta.layout.as_deref(), Some("../../layouts/Post.astro"));
        assert!(!meta.draft);
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_yaml_block_list_and_human_date() {
        let source = "---\ntitle: Lists\npubDate: Jul 08 2022\ntags:\n  - rust\n  - \"web\"\ndraft: true\n---\nbody";
        let (meta, body) = parse_post(source).unwrap();

        assert_eq!(meta.pub_date, DateTimeUtc::from_ymd(2022, 7, 8));
        assert_eq!(meta.tags, vec!["rust", "web"]);
        assert!(meta.draft);
        assert_eq!(body, "body");
    }

    #[test]
    fn test_yaml_comma_tags_and_date_alias() {
        let source = "---\ntitle: T\ndate: 2024-06-15T14:30:45Z\ntags: a, b ,c\n---\n";
        let (meta, _) = parse_post(source).unwrap();
        assert_eq!(meta.pub_date, DateTimeUtc::new(2024, 6, 15, 14, 30, 45));
        assert_eq!(meta.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_toml_frontmatter() {
        let source = "+++\ntitle = \"Hello\"\npubDate = 2023-02-01\ntags = [\"a\", \"b\"]\n+++\n\n# Body";
        let (meta, body) = parse_post(source).unwrap();

        assert_eq!(meta.title, "Hello");
        assert_eq!(meta.pub_date, DateTimeUtc::from_ymd(2023, 2, 1));
        assert_eq!(meta.tags, vec!["a", "b"]);
        assert_eq!(body, "# Body");
    }

    #[test]
    fn test_toml_string_date() {
        let source = "+++\ntitle = \"Hello\"\ndate = \"Jan 05 2021\"\n+++\n";
        let (meta, _) = parse_post(source).unwrap();
        assert_eq!(meta.pub_date, DateTimeUtc::from_ymd(2021, 1, 5));
    }

    #[test]
    fn test_toml_wrong_types() {
        let err = parse_post("+++\ntitle = 3\npubDate = 2023-01-01\n+++\n").unwrap_err();
        assert!(err.to_string().contains("`title` must be a string"));

        let err = parse_post("+++\ntitle = \"x\"\ntags = \"a\"\npubDate = 2023-01-01\n+++\n")
            .unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_missing_header() {
        let err = parse_post("# Just content").unwrap_err();
        assert!(err.to_string().contains("no front-matter"));
    }

    #[test]
    fn test_missing_required_fields() {
        let err = parse_post("---\npubDate: 2023-01-01\n---\n").unwrap_err();
        assert!(err.to_string().contains("title"));

        let err = parse_post("---\ntitle: x\n---\n").unwrap_err();
        assert!(err.to_string().contains("pubDate"));
    }

    #[test]
    fn test_invalid_date() {
        let err = parse_post("---\ntitle: x\npubDate: 2023-02-30\n---\n").unwrap_err();
        assert!(err.to_string().contains("2023-02-30"));
    }

    #[test]
    fn test_strip_frontmatter() {
        assert_eq!(strip_frontmatter("---\ntitle: x\n---\nbody"), "body");
        assert_eq!(strip_frontmatter("no header"), "no header");
        assert_eq!(strip_frontmatter("---\r\ntitle: x\r\n---\r\nbody"), "body");
    }

    #[test]
    fn test_serialize_camel_case() {
        let meta = Frontmatter::new("T", DateTimeUtc::from_ymd(2023, 1, 1));
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["pubDate"], "2023-01-01");
        assert!(json.get("draft").is_none());
        assert!(json.get("description").is_none());
    }
}
