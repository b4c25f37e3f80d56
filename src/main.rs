//! blogfeed - RSS feed builder for a markdown blog.

mod cli;
mod config;
mod core;
mod feed;
mod logger;
mod post;
mod sanitize;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;
    debug!("config"; "loaded {}", config.config_path.display());

    match &cli.command {
        Commands::Build { .. } => cli::build::build_feed_file(&config).map(|_| ()),
        Commands::Serve { .. } => cli::serve::serve_feed(&config),
        Commands::Query { args } => cli::query::run_query(args, &config),
    }
}
