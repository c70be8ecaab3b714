//! Console output with colored module prefixes.
//!
//! - `log!` prints `[module] message`
//! - `debug!` prints only with `--verbose`
//!
//! Run summaries go to stdout. `[warning]` and `[error]` lines go to stderr
//! so a redirected summary stays clean.
//!
//! # Example
//!
//! ```ignore
//! log!("select"; "eligible feeds: {} of {}", eligible, total);
//! debug!("select"; "   score {:.4}", score);
//! ```

use owo_colors::OwoColorize;
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Macros
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only with `--verbose`. Arguments are not evaluated
/// otherwise.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Output
// ============================================================================

/// How a module prefix is shown and where its line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Command,
    Success,
    Warning,
    Error,
    Other,
}

impl Kind {
    fn of(module: &str) -> Self {
        match module.to_ascii_lowercase().as_str() {
            "run" | "status" => Self::Command,
            "done" => Self::Success,
            "warning" => Self::Warning,
            "error" => Self::Error,
            _ => Self::Other,
        }
    }

    const fn to_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }

    fn paint(self, prefix: &str) -> String {
        match self {
            Self::Command => prefix.bright_blue().bold().to_string(),
            Self::Success => prefix.bright_green().bold().to_string(),
            Self::Error => prefix.bright_red().bold().to_string(),
            Self::Warning | Self::Other => prefix.bright_yellow().bold().to_string(),
        }
    }
}

/// Print `message` under a colored `[module]` prefix.
pub fn log(module: &str, message: &str) {
    let kind = Kind::of(module);
    let line = format!("{} {message}", kind.paint(&format!("[{module}]")));

    // Write failures (closed pipe) are ignored
    if kind.to_stderr() {
        writeln!(stderr().lock(), "{line}").ok();
    } else {
        let mut out = stdout().lock();
        writeln!(out, "{line}").ok();
        out.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_module() {
        assert_eq!(Kind::of("run"), Kind::Command);
        assert_eq!(Kind::of("Status"), Kind::Command);
        assert_eq!(Kind::of("done"), Kind::Success);
        assert_eq!(Kind::of("WARNING"), Kind::Warning);
        assert_eq!(Kind::of("select"), Kind::Other);
    }

    #[test]
    fn test_only_problems_go_to_stderr() {
        assert!(Kind::Warning.to_stderr());
        assert!(Kind::Error.to_stderr());
        assert!(!Kind::Command.to_stderr());
        assert!(!Kind::Other.to_stderr());
    }

    #[test]
    fn test_paint_keeps_prefix_text() {
        assert!(Kind::Other.paint("[select]").contains("[select]"));
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
