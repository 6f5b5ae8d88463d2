use crate::infrastructure::scm::{ChangeKind, StatusEntry};
use colored::Colorize;

/// Display utilities for the CLI interface
#[derive(Debug, Clone, Copy)]
pub struct DisplayHelper {
    pub use_color: bool,
}

impl DisplayHelper {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{}", self.format_success(message));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "⚠".yellow().bold(), message);
        } else {
            println!("[WARNING] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "::".blue().bold(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    /// Print a terminal failure to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.format_error(message));
    }

    pub fn format_success(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "✓".green().bold(), message)
        } else {
            format!("[SUCCESS] {}", message)
        }
    }

    pub fn format_error(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "ERROR:".red().bold(), message)
        } else {
            format!("ERROR: {}", message)
        }
    }

    /// Print an aligned `label: value` line
    pub fn key_value(&self, label: &str, value: &str) {
        let label = format!("{:<10}", format!("{}:", label));
        if self.use_color {
            println!("  {} {}", label.bold(), value);
        } else {
            println!("  {} {}", label, value);
        }
    }

    pub fn format_path(&self, path: &str) -> String {
        if self.use_color {
            path.cyan().to_string()
        } else {
            format!("'{}'", path)
        }
    }

    pub fn format_url(&self, url: &str) -> String {
        if self.use_color {
            url.blue().underline().to_string()
        } else {
            url.to_string()
        }
    }

    /// Status line as printed by `svn status`, colored by severity
    pub fn format_entry(&self, entry: &StatusEntry) -> String {
        let line = entry.to_string();
        if !self.use_color {
            return line;
        }

        match entry.kind {
            ChangeKind::Missing | ChangeKind::Obstructed | ChangeKind::Conflicted => {
                line.red().to_string()
            }
            kind if kind.is_dirty() => line.yellow().to_string(),
            _ => line.dimmed().to_string(),
        }
    }
}

impl Default for DisplayHelper {
    fn default() -> Self {
        Self::new(true)
    }
}
