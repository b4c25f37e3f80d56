//! Build command: scan posts, build the feed, write it to disk.
//!
//! The same pipeline backs the feed endpoint, see [`render_feed`].

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use crate::config::SiteConfig;
use crate::feed::{BuildOptions, SiteInfo, build_feed};
use crate::log;
use crate::post::{ScanOptions, scan_posts};
use crate::utils::plural::plural_count;

/// Runtime driving content resolution.
pub fn new_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}

/// Scan the content directory and serialize a fresh feed.
///
/// Returns the XML and the number of items.
pub fn render_feed(config: &SiteConfig, runtime: &Runtime) -> Result<(String, usize)> {
    let site = SiteInfo::from_config(&config.site)?;
    let scan = ScanOptions {
        drafts: config.build.drafts,
    };
    let posts = scan_posts(&config.build.content, &scan)?;

    let options = BuildOptions::from_config(&config.feed);
    let feed = runtime.block_on(build_feed(&site, &posts, &options))?;
    let xml = feed.render(config.build.minify)?;

    Ok((xml, feed.items.len()))
}

/// Build the feed into `<output>/<feed.path>`.
pub fn build_feed_file(config: &SiteConfig) -> Result<PathBuf> {
    let runtime = new_runtime()?;
    let (xml, count) = render_feed(config, &runtime)?;

    let path = config.feed_output_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, xml).with_context(|| format!("failed to write {}", path.display()))?;

    let shown = path.strip_prefix(config.get_root()).unwrap_or(&path);
    log!("rss"; "{} ({})", shown.display(), plural_count(count, "item"));
    Ok(path)
}
