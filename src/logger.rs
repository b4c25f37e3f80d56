//! Terminal logging.
//!
//! Every line is tagged with the subsystem that wrote it:
//!
//! ```text
//! [scan] 12 posts, 2 drafts skipped
//! [rss] wrote public/rss.xml
//! ```
//!
//! Lines go to stderr so that `query` owns stdout.

use owo_colors::{OwoColorize, Stream, Style};
use std::io::{Write, stderr};
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// `log!("rss"; "wrote {}", path.display())`
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {
        $crate::logger::log($module, &format!($($arg)*))
    };
}

/// Like [`log!`], but silent unless `--verbose` was given.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*));
        }
    };
}

pub fn log(module: &str, message: &str) {
    // A closed stderr is not worth failing the build over
    let _ = writeln!(stderr().lock(), "{} {message}", tag(module));
}

fn tag(module: &str) -> String {
    let style = match module.to_ascii_lowercase().as_str() {
        "serve" => Style::new().bright_blue(),
        "rss" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        "warning" => Style::new().bright_magenta(),
        _ => Style::new().bright_yellow(),
    }
    .bold();

    let tag = format!("[{module}]");
    tag.if_supports_color(Stream::Stderr, |t| t.style(style))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_without_color() {
        owo_colors::set_override(false);
        assert_eq!(tag("rss"), "[rss]");
        assert_eq!(tag("Scan"), "[Scan]");
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
