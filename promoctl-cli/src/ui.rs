//! Progress feedback for promoctl commands
//!
//! Spinners are suppressed when:
//! - `--quiet` flag is passed
//! - `PROMOCTL_QUIET=1` environment variable is set
//! - stderr is not a TTY (piped output)

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static QUIET_MODE: OnceLock<bool> = OnceLock::new();

/// Call once at startup with the --quiet flag value
pub fn init_quiet_mode(quiet_flag: bool) {
    let is_quiet = quiet_flag
        || std::env::var("PROMOCTL_QUIET").map(|v| v == "1").unwrap_or(false)
        || !std::io::stderr().is_terminal();

    QUIET_MODE.set(is_quiet).ok();
}

pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

const TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const DONE_TEMPLATE: &str = "{msg}";

/// How a spinner ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Success,
    Error,
}

impl Mark {
    fn line(self, msg: &str) -> String {
        let glyph = match self {
            Mark::Success => '✓',
            Mark::Error => '✗',
        };
        format!("{} {}", glyph, msg)
    }
}

/// Both templates are constants, so a parse failure only drops the styling
fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(TICKS)
}

/// Spinner on stderr, or None in quiet mode
pub fn spinner(msg: impl Into<String>) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }
    let pb = ProgressBar::new_spinner()
        .with_style(style(SPINNER_TEMPLATE))
        .with_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

fn finish(pb: Option<ProgressBar>, mark: Mark, msg: String) {
    let Some(pb) = pb else { return };
    pb.set_style(style(DONE_TEMPLATE));
    pb.finish_with_message(mark.line(&msg));
}

pub fn finish_success(pb: Option<ProgressBar>, msg: impl Into<String>) {
    finish(pb, Mark::Success, msg.into());
}

pub fn finish_error(pb: Option<ProgressBar>, msg: impl Into<String>) {
    finish(pb, Mark::Error, msg.into());
}

/// Run a request under a spinner.
///
/// The spinner is cleared on success so command output stays clean; failures
/// leave a one-line marker behind.
pub async fn with_spinner_async<T, E: std::fmt::Display>(
    msg: impl Into<String>,
    f: impl std::future::Future<Output = Result<T, E>>,
) -> Result<T, E> {
    let msg = msg.into();
    let pb = spinner(&msg);

    match f.await {
        Ok(result) => {
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }
            Ok(result)
        }
        Err(e) => {
            finish_error(pb, format!("{}: {}", msg, e));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_mode_is_stable_after_init() {
        // stderr is not a TTY under the test harness
        init_quiet_mode(false);
        let first = is_quiet();
        init_quiet_mode(true);
        assert_eq!(is_quiet(), first);
    }

    #[test]
    fn test_marks_prefix_message() {
        assert_eq!(Mark::Success.line("Promotion deleted"), "✓ Promotion deleted");
        assert_eq!(Mark::Error.line("Failed to delete promotion"), "✗ Failed to delete promotion");
    }

    #[test]
    fn test_finish_hidden_spinner() {
        let pb = ProgressBar::hidden().with_style(style(SPINNER_TEMPLATE));
        finish_success(Some(pb.clone()), "Promotion approved");
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Promotion approved");

        // quiet mode passes no spinner
        finish_error(None, "ignored");
    }
}
