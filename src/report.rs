// Console output helpers. Progress and summary lines are for humans only;
// diagnostics go through `tracing` instead.

use crossterm::style::{style, Stylize};
use indicatif::{ProgressBar, ProgressStyle};

/// Where progress lines are written. A hidden reporter swallows everything,
/// which is what tests use.
pub struct Reporter {
    bar: ProgressBar,
    quiet: bool,
}

impl Reporter {
    /// Progress bar over `len` items, drawn to stderr.
    pub fn with_bar(len: u64) -> Self {
        let bar = ProgressBar::new(len);
        if let Ok(template) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
            bar.set_style(template.progress_chars("=> "));
        }
        Reporter { bar, quiet: false }
    }

    /// Reporter that prints plain lines and draws no bar.
    pub fn plain() -> Self {
        Reporter {
            bar: ProgressBar::hidden(),
            quiet: false,
        }
    }

    /// Reporter that writes nothing at all.
    pub fn hidden() -> Self {
        Reporter {
            bar: ProgressBar::hidden(),
            quiet: true,
        }
    }

    /// Print a line above the bar (or straight to stdout without one).
    pub fn line(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        if self.bar.is_hidden() {
            println!("{}", msg.as_ref());
        } else {
            self.bar.println(msg.as_ref());
        }
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.line(format!("{}", style(msg.as_ref()).green()));
    }

    pub fn failure(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        let styled = format!("{}", style(msg.as_ref()).red());
        if self.bar.is_hidden() {
            eprintln!("{styled}");
        } else {
            self.bar.println(styled);
        }
    }

    pub fn set_length(&self, len: u64) {
        self.bar.set_length(len);
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.bar.set_message(msg.into());
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Print a fatal error and its remediation lines to stderr.
pub fn fatal(message: &str, remediation: &[String]) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    if !remediation.is_empty() {
        eprintln!();
        for line in remediation {
            eprintln!("{line}");
        }
    }
}

/// Numbered follow-up hints printed at the end of a run.
pub fn next_steps(steps: &[&str]) {
    println!("\n{}", style("Next steps:").bold());
    for (i, step) in steps.iter().enumerate() {
        println!("{}. {}", i + 1, step);
    }
}
