//! `blogfeed.toml`.
//!
//! ```text
//! config/
//! ├── section/   [site], [build], [feed], [serve]
//! ├── error      ConfigError, ConfigDiagnostics
//! └── util       config file discovery
//! ```
//!
//! Precedence is defaults < config file < CLI flags. `build.content` and
//! `build.output` are resolved against the directory holding the config file.

mod error;
mod section;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{BuildConfig, FeedConfig, ServeConfig, SiteInfoConfig, local_url_for};

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::{BuildArgs, Cli, Commands};
use crate::log;
use util::find_config_file;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    /// Where the config was loaded from
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory of `config_path`
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteInfoConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Find, parse, override and validate the config for this invocation.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let config_path = find_config_file(&cwd, &cli.config).ok_or_else(|| {
            ConfigError::Validation(format!(
                "no {} in {} or its parents",
                cli.config.display(),
                cwd.display()
            ))
        })?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.finalize(cli);

        // Listing posts needs no channel metadata
        let needs_site = !matches!(cli.command, Commands::Query { .. });
        config.validate(needs_site)?;
        Ok(config)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Toml)?)
    }

    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (config, unknown) = Self::parse_with_ignored(&content)?;
        if !unknown.is_empty() {
            warn_unknown_fields(path, &unknown);
        }
        Ok(config)
    }

    /// Parse, also returning the dotted paths of keys no section knows.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut unknown = Vec::new();
        let config = serde_ignored::deserialize(toml::Deserializer::new(content), |path| {
            unknown.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, unknown))
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// `<build.output>/<feed.path>`
    pub fn feed_output_path(&self) -> PathBuf {
        self.build.output.join(&self.feed.path)
    }

    fn finalize(&mut self, cli: &Cli) {
        self.root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        override_with(&mut self.build.content, cli.content.as_ref());
        override_with(&mut self.build.output, cli.output.as_ref());

        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Serve {
                build_args,
                interface,
                port,
            } => {
                self.apply_build_args(build_args);
                self.apply_serve_options(*interface, *port);
            }
            Commands::Query { args } => self.build.drafts |= args.drafts,
        }

        // feed.path stays relative: it is also the served route
        self.build.content = self.root.join(&self.build.content);
        self.build.output = self.root.join(&self.build.output);
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        override_with(&mut self.build.minify, args.minify.as_ref());
        self.build.drafts |= args.drafts;
        if let Some(url) = &args.site_url {
            self.site.url = Some(url.clone());
        }
    }

    fn apply_serve_options(&mut self, interface: Option<IpAddr>, port: Option<u16>) {
        override_with(&mut self.serve.interface, interface.as_ref());
        override_with(&mut self.serve.port, port.as_ref());
        if self.site.url.is_none() {
            self.site.url = Some(self.serve.local_url());
        }
    }

    /// Check every section, reporting all problems together.
    ///
    /// `[site]` is only checked when `needs_site` is set.
    pub fn validate(&self, needs_site: bool) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        if needs_site {
            self.site.validate(&mut diag);
        }
        self.feed.validate(&mut diag);
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

fn override_with<T: Clone>(value: &mut T, cli_value: Option<&T>) {
    if let Some(cli_value) = cli_value {
        value.clone_from(cli_value);
    }
}

fn warn_unknown_fields(path: &Path, fields: &[String]) {
    let name = path
        .file_name()
        .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy());
    log!("warning"; "{} has unknown fields, ignoring: {}", name, fields.join(", "));
}

/// A parsed config with a valid `[site]` plus `extra`. Fails on unknown keys.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let content = format!(
        "[site]\ntitle = \"Test\"\ndescription = \"Test\"\nurl = \"https://example.com\"\n{extra}"
    );
    let (config, unknown) = SiteConfig::parse_with_ignored(&content).unwrap();
    assert!(unknown.is_empty(), "unknown test config fields: {unknown:?}");
    config
}
