//! `[feed]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [feed]
//! path = "rss.xml"        # Output file, also the served route (/rss.xml)
//! concurrency = 16        # Posts rendered at once
//!
//! [feed.sanitize]
//! extra_tags = ["mark"]   # Allowed in addition to the default tag list
//! strip_tags = ["img"]    # Removed from the default tag list
//! ```

use crate::config::ConfigDiagnostics;
use crate::sanitize::SanitizePolicy;
use serde::Deserialize;
use std::path::{Component, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Output path for the feed file, relative to the output directory.
    pub path: PathBuf,
    /// Maximum number of post contents resolved concurrently.
    pub concurrency: usize,
    /// Sanitizer allow-list adjustments.
    pub sanitize: SanitizeConfig,
}

/// Adjustments applied on top of the default sanitizer policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    pub extra_tags: Vec<String>,
    pub strip_tags: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: "rss.xml".into(),
            concurrency: 16,
            sanitize: SanitizeConfig::default(),
        }
    }
}

impl FeedConfig {
    /// URL route the feed is served at, e.g. `/rss.xml`.
    pub fn route(&self) -> String {
        let path = self
            .path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        format!("/{path}")
    }

    /// Build the sanitizer policy from the defaults plus this section.
    pub fn policy(&self) -> SanitizePolicy {
        let mut policy = SanitizePolicy::default();
        for tag in &self.sanitize.extra_tags {
            policy.allow_tag(tag);
        }
        for tag in &self.sanitize.strip_tags {
            policy.deny_tag(tag);
        }
        policy
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.path.as_os_str().is_empty() {
            diag.error("feed.path", "feed path is empty");
        } else if self.path.is_absolute()
            || self
                .path
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            diag.error_with_hint(
                "feed.path",
                format!("`{}` must be a relative path", self.path.display()),
                "use a path inside the output directory, e.g.: \"rss.xml\"",
            );
        }

        if self.concurrency == 0 {
            diag.error("feed.concurrency", "must be at least 1");
        }
    }
}
