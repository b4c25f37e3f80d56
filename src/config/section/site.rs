//! `[site]`: channel metadata.
//!
//! ```toml
//! [site]
//! title = "My Blog"
//! description = "Notes on things"
//! url = "https://blog.example.com"
//! language = "en-us"
//! ```

use serde::Deserialize;
use url::Url;

use crate::config::ConfigDiagnostics;

const URL_HINT: &str = "use an absolute URL such as https://example.com";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    /// Channel `<title>`
    pub title: String,
    /// Channel `<description>`
    pub description: String,
    /// Channel `<link>` and the base for relative post links
    pub url: Option<String>,
    /// Channel `<language>`
    pub language: String,
}

impl Default for SiteInfoConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            url: None,
            language: "en-us".into(),
        }
    }
}

impl SiteInfoConfig {
    /// A feed needs a title and an absolute http(s) base URL.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.error_with_hint("site.title", "is empty", "e.g. title = \"My Blog\"");
        }

        match &self.url {
            None => diag.error_with_hint(
                "site.url",
                "is not set, item links need a base URL",
                "set site.url or pass --site-url",
            ),
            Some(url) => {
                if let Err(problem) = check_base_url(url) {
                    diag.error_with_hint("site.url", problem, URL_HINT);
                }
            }
        }
    }
}

fn check_base_url(url: &str) -> Result<(), String> {
    let parsed = Url::parse(url).map_err(|e| format!("`{url}` is not a URL: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("scheme `{}` is not http or https", parsed.scheme()));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("`{url}` has no host"));
    }
    Ok(())
}
