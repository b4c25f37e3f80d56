//! MIME type constants for HTTP responses.

/// Common MIME type constants.
pub mod types {
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const RSS: &str = "application/rss+xml; charset=utf-8";
}
