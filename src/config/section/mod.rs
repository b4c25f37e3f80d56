//! Configuration section definitions.
//!
//! Each module corresponds to a section in `blogfeed.toml`:
//!
//! | Module  | TOML Section | Purpose                                  |
//! |---------|--------------|------------------------------------------|
//! | `build` | `[build]`    | Content/output paths, minify, drafts     |
//! | `feed`  | `[feed]`     | Feed path, concurrency, sanitizer policy |
//! | `serve` | `[serve]`    | Feed endpoint interface and port         |
//! | `site`  | `[site]`     | Channel metadata (title, url, language)  |

mod build;
mod feed;
mod serve;
mod site;

pub use build::BuildConfig;
pub use feed::FeedConfig;
pub use serve::{ServeConfig, local_url_for};
pub use site::SiteInfoConfig;
