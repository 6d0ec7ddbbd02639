//! Progress bar implementation for CLI operations.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use jarshift_core::ProgressCallback;
use std::fmt::Write;

/// CLI progress bar wrapper implementing `ProgressCallback`.
///
/// The bar length is taken from the first entry callback, since the entry
/// count is only known once the archive is open. Cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    message: String,
    changed: usize,
}

impl CliProgress {
    /// Creates a new CLI progress bar.
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new(0);

        // Template: "Migrating [████████░░░░] 42/100 entries (3 changed, 12s)"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} entries ({prefix}, {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_duration(state.eta())).unwrap_or(());
                })
                .progress_chars("█▓░"),
        );

        bar.set_message(message.to_string());
        bar.set_prefix("0 changed");

        Self {
            bar,
            message: message.to_string(),
            changed: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry_start(&mut self, name: &str, total: usize, _current: usize) {
        let total = total as u64;
        if self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }
        self.bar.set_message(format!("{} {name}", self.message));
    }

    fn on_entry_complete(&mut self, _name: &str, changed: bool) {
        if changed {
            self.changed += 1;
            self.bar.set_prefix(format!("{} changed", self.changed));
        }
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
