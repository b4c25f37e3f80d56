//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"   # Markdown posts, searched recursively
//! output = "dist"       # Where `build` writes the feed
//! minify = true         # Strip indentation from the XML
//! drafts = false        # Include posts marked `draft: true`
//! ```

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Content directory (relative to the config file).
    pub content: PathBuf,
    /// Output directory (relative to the config file).
    pub output: PathBuf,
    /// Minify the generated XML.
    pub minify: bool,
    /// Include draft posts.
    pub drafts: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            output: "dist".into(),
            minify: true,
            drafts: false,
        }
    }
}
