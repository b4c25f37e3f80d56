//! Markdown post discovery.
//!
//! Walks the content directory, parses every post's front-matter in
//! parallel and derives its URL from the file path:
//!
//! | File                      | URL            |
//! |---------------------------|----------------|
//! | `posts/hello.md`          | `/posts/hello` |
//! | `posts/series/index.md`   | `/posts/series`|
//! | `index.md`                | `/`            |

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use super::meta::{Frontmatter, parse_post};
use super::{LazyContent, PostRecord};
use crate::utils::plural::plural_count;
use crate::{debug, log};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Options for [`scan_posts`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Keep posts marked `draft: true`
    pub drafts: bool,
}

/// Collect all posts under `content_dir`, in sorted path order.
///
/// Fails on the first unreadable or invalid post (the error names the file),
/// and when two files map to the same URL.
pub fn scan_posts(content_dir: &Path, options: &ScanOptions) -> Result<Vec<PostRecord>> {
    if !content_dir.is_dir() {
        bail!("content directory `{}` not found", content_dir.display());
    }

    let files = collect_markdown_files(content_dir);
    debug!("scan"; "found {} in {}", plural_count(files.len(), "markdown file"), content_dir.display());

    let scanned: Vec<(PathBuf, Frontmatter)> = files
        .par_iter()
        .map(|path| read_frontmatter(path).map(|meta| (path.clone(), meta)))
        .collect::<Result<_>>()?;

    let mut posts = Vec::with_capacity(scanned.len());
    let mut draft_count = 0;
    let mut claimed: FxHashMap<String, PathBuf> = FxHashMap::default();

    for (path, frontmatter) in scanned {
        if frontmatter.draft && !options.drafts {
            draft_count += 1;
            continue;
        }

        let relative = path.strip_prefix(content_dir).unwrap_or(&path);
        let url = post_url(relative);
        if let Some(other) = claimed.insert(url.clone(), relative.to_path_buf()) {
            bail!(
                "url conflict: `{}` and `{}` both map to {}",
                other.display(),
                relative.display(),
                url
            );
        }

        posts.push(PostRecord {
            url,
            frontmatter,
            content: LazyContent::from_markdown_file(path.clone()),
            source: Some(path),
        });
    }

    if draft_count > 0 {
        log!("scan"; "skipped {}", plural_count(draft_count, "draft"));
    }

    Ok(posts)
}

/// Markdown files under `dir`, sorted.
///
/// Hidden entries and files starting with `_` are not posts.
fn collect_markdown_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort(true)
        .skip_hidden(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !name.starts_with('_')
        })
        .map(|e| e.path())
        .filter(|p| is_markdown(p))
        .collect()
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn read_frontmatter(path: &Path) -> Result<Frontmatter> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let (meta, _) = parse_post(&source).with_context(|| format!("in {}", path.display()))?;
    Ok(meta)
}

/// URL of a post from its path relative to the content directory.
fn post_url(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let mut segments: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }

    format!("/{}", segments.join("/"))
}
