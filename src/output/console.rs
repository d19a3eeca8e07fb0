//! Colored console output for scan progress and results.

use crate::types::Report;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Console output handler with colors and formatting.
#[derive(Debug, Clone)]
pub struct ConsoleOutput {
    verbose: bool,
    json_mode: bool,
    quiet: bool,
}

impl ConsoleOutput {
    /// Create a new console output handler.
    pub fn new(verbose: bool, json_mode: bool, quiet: bool) -> Self {
        Self {
            verbose,
            json_mode,
            quiet,
        }
    }

    /// A handler that prints nothing.
    pub fn silent() -> Self {
        Self::new(false, false, true)
    }

    fn is_muted(&self) -> bool {
        self.json_mode || self.quiet
    }

    /// Print scan start message.
    pub fn print_scan_start(&self, domain: &str) {
        if self.is_muted() {
            return;
        }

        println!("{} Scanning: {}", "[*]".bright_blue(), domain.bright_white());
    }

    /// Print scan progress (only in verbose mode).
    pub fn print_progress(&self, message: &str) {
        if self.is_muted() || !self.verbose {
            return;
        }

        println!("{} {}", "[.]".dimmed(), message.dimmed());
    }

    /// Print info message.
    pub fn print_info(&self, message: &str) {
        if self.is_muted() {
            return;
        }

        println!("{} {}", "[*]".bright_blue(), message);
    }

    /// Print the four-count summary and, in verbose mode, a per-file breakdown.
    pub fn print_summary(&self, report: &Report) {
        if self.is_muted() {
            return;
        }

        println!();
        println!("{}", "=== Scan Summary ===".bright_cyan());
        println!("  Domain:        {}", report.domain);
        println!("  Scripts:       {}", report.files.len());
        println!("  Routes:        {}", report.total_routes);
        println!("  Dependencies:  {}", report.total_deps);

        if report.total_tokens > 0 {
            println!(
                "  {}",
                format!("Tokens:        {} (structure only, not verified)", report.total_tokens)
                    .yellow()
                    .bold()
            );
        } else {
            println!("  Tokens:        0");
        }

        if self.verbose {
            for file in &report.files {
                println!(
                    "    |-- {} {}",
                    file.url.dimmed(),
                    format!(
                        "[{} routes, {} deps, {} tokens]",
                        file.routes.len(),
                        file.dependencies.len(),
                        file.tokens.len()
                    )
                    .dimmed()
                );
            }
        }

        println!();
    }

    /// Create a progress bar.
    pub fn create_progress_bar(&self, total: u64, message: &str) -> Option<ProgressBar> {
        if self.is_muted() {
            return None;
        }

        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(message.to_string());
        Some(pb)
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(false, false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_output_creation() {
        let output = ConsoleOutput::new(true, false, false);
        assert!(output.verbose);
        assert!(!output.json_mode);
        assert!(!output.is_muted());
    }

    #[test]
    fn test_muted_modes_have_no_progress_bar() {
        assert!(ConsoleOutput::new(false, true, false).create_progress_bar(3, "x").is_none());
        assert!(ConsoleOutput::silent().create_progress_bar(3, "x").is_none());
    }
}
