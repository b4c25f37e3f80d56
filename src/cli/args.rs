//! Command-line arguments.

use clap::{ArgAction, Args, ColorChoice, Parser, Subcommand, ValueHint};
use std::net::IpAddr;
use std::path::PathBuf;

/// Build the RSS feed of a markdown blog
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// When to color log output
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Print debug logs
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Config file, searched upward from the working directory
    #[arg(short = 'C', long, default_value = "blogfeed.toml", value_hint = ValueHint::FilePath)]
    pub config: PathBuf,

    /// Markdown posts directory, overrides `build.content`
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Output directory, overrides `build.output`
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write the feed to `<output>/<feed.path>`
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve the feed over HTTP, rebuilding it per request
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Address to bind, overrides `serve.interface`
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// First port to try, overrides `serve.port`
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Dump post front-matter as JSON
    #[command(visible_alias = "q")]
    Query {
        #[command(flatten)]
        args: QueryArgs,
    },
}

/// Options shared by `build` and `serve`.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Compact XML output (`--minify=false` forces indentation)
    #[arg(short, long, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub minify: Option<bool>,

    /// Site URL used for item links, overrides `site.url`
    #[arg(short = 'U', long = "site-url", value_hint = ValueHint::Url)]
    pub site_url: Option<String>,

    /// Publish posts marked `draft: true`
    #[arg(long)]
    pub drafts: bool,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Include drafts
    #[arg(short, long)]
    pub drafts: bool,

    /// Indent the JSON
    #[arg(short, long)]
    pub pretty: bool,

    /// Write to a file instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
