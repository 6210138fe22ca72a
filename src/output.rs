//! Terminal decoration for the interactive CLI: banner, status lines and spinners.
//!
//! Everything here writes to stderr so stdout carries only the formatted results.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BANNER: &str = r"
   _____ __                _____
  / ___// /_  ____  ____  / ___/_________ _____  ____  ___  _____
  \__ \/ __ \/ __ \/ __ \ \__ \/ ___/ __ `/ __ \/ __ \/ _ \/ ___/
 ___/ / / / / /_/ / /_/ /___/ / /__/ /_/ / / / / / / /  __/ /
/____/_/ /_/\____/ .___//____/\___/\__,_/_/ /_/_/ /_/\___/_/
                /_/";

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    quiet: bool,
}

impl Output {
    /// Create a new output handler. A quiet handler prints nothing.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print the application banner.
    pub fn banner(&self) {
        if self.quiet {
            return;
        }
        eprintln!("{}", style(BANNER).cyan().bold());
        eprintln!("{}\n", style("Photo in, prices out").dim());
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.quiet {
            return;
        }
        eprintln!("{} {}", style("✓").green(), msg);
    }

    /// Print an error message. Errors are shown even in quiet mode.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", style("✗").red(), style(msg).red().bold());
    }

    /// Print a highlighted key/value line, used for the identified query.
    pub fn highlight(&self, key: &str, value: &str) {
        if self.quiet {
            return;
        }
        eprintln!("{} {}", style(format!("{}:", key)).bold().blue(), style(value).bold());
    }

    /// Create a spinner for an outbound call.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
