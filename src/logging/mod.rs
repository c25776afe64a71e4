//! Output control for mirror runs
//!
//! This module provides the [`Logger`] used for every user-visible line: plain
//! step-by-step progress by default, elapsed-time prefixes and per-step detail
//! in verbose mode, and warnings/errors only in quiet mode.

use std::time::{Duration, Instant};

/// Logger responsible for all user-visible output
#[derive(Debug, Clone)]
pub struct Logger {
    pub verbose: bool,
    pub quiet: bool,
    start_time: Instant,
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            quiet: false,
            start_time: Instant::now(),
        }
    }

    pub fn new_quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
            start_time: Instant::now(),
        }
    }

    /// Main section heading
    pub fn section(&self, title: &str) {
        if self.quiet {
            return;
        }

        if self.verbose {
            let separator = "━".repeat(60);
            println!("\n{}", separator);
            println!("📋 {}", title);
            println!("{}", separator);
        } else {
            println!("\n📋 {}", title);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_with_timestamp("INFO", message, "ℹ️ ");
        }
    }

    pub fn step(&self, message: &str) {
        if !self.quiet {
            self.print_with_timestamp("STEP", message, "▶️ ");
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_with_timestamp("SUCCESS", message, "✅");
        }
    }

    /// Only shown in verbose mode
    pub fn detail(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("      📝 {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        self.print_with_timestamp("WARN", message, "⚠️ ");
    }

    pub fn error(&self, message: &str) {
        let timestamp = self.timestamp();
        if self.verbose {
            eprintln!("{} ❌ ERROR {}", timestamp, message);
        } else {
            eprintln!("❌ ERROR: {}", message);
        }
    }

    /// Key-value summary block
    pub fn summary(&self, title: &str, items: &[(&str, String)]) {
        if self.quiet {
            return;
        }

        println!("\n📊 {}", title);
        for (key, value) in items {
            println!("  • {}: {}", key, value);
        }
    }

    /// Format duration in human-readable format
    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs < 60 {
            format!("{:.1}s", duration.as_secs_f64())
        } else if secs < 3600 {
            format!("{}m{:02}s", secs / 60, secs % 60)
        } else {
            format!("{}h{:02}m{:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn timestamp(&self) -> String {
        format!("[{:8.3}s]", self.start_time.elapsed().as_secs_f64())
    }

    fn print_with_timestamp(&self, level: &str, message: &str, emoji: &str) {
        if self.verbose {
            println!("{} {} {} {}", self.timestamp(), emoji, level, message);
        } else {
            println!("{} {}", emoji, message);
        }
    }
}
