//! Configuration errors.
//!
//! Section validators push into a shared [`ConfigDiagnostics`] so that every
//! problem in `blogfeed.toml` is reported in one run.

use owo_colors::{OwoColorize, Stream};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),

    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One invalid config field.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    /// Dotted key, e.g. `site.url`
    pub field: &'static str,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field.if_supports_color(Stream::Stderr, |s| s.cyan());
        write!(f, "  {field}: {}", self.message)?;
        if let Some(hint) = &self.hint {
            let label = "hint:".if_supports_color(Stream::Stderr, |s| s.yellow());
            write!(f, "\n    {label} {hint}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: &'static str,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: &'static str, message: String, hint: Option<String>) {
        self.errors.push(ConfigDiagnostic { field, message, hint });
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    /// `Err(self)` when anything was reported.
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        write!(
            f,
            "invalid config ({count} problem{})",
            if count == 1 { "" } else { "s" }
        )?;
        for error in &self.errors {
            write!(f, "\n{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_path() {
        let err = ConfigError::Io(
            PathBuf::from("blogfeed.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert_eq!(err.to_string(), "cannot read config `blogfeed.toml`");
    }

    #[test]
    fn test_toml_error_keeps_detail() {
        let toml_err = toml::from_str::<toml::Table>("[site").unwrap_err();
        let err = ConfigError::from(toml_err);
        assert!(err.to_string().starts_with("malformed config: "));
        assert!(err.to_string().len() > "malformed config: ".len());
    }

    #[test]
    fn test_into_result() {
        assert!(ConfigDiagnostics::new().into_result().is_ok());

        let mut diag = ConfigDiagnostics::new();
        diag.error("site.title", "must not be empty");
        diag.error_with_hint("site.url", "is not configured", "set site.url");
        let err = diag.into_result().unwrap_err();
        assert_eq!(err.errors().len(), 2);
        assert_eq!(err.errors()[1].hint.as_deref(), Some("set site.url"));
    }

    #[test]
    fn test_display_lists_every_field() {
        owo_colors::set_override(false);
        let mut diag = ConfigDiagnostics::new();
        diag.error("feed.path", "must be relative");
        diag.error_with_hint("feed.concurrency", "must be at least 1", "try 16");
        assert_eq!(
            diag.to_string(),
            "invalid config (2 problems)\n  feed.path: must be relative\n  \
             feed.concurrency: must be at least 1\n    hint: try 16"
        );
    }
}
