//! Command-line configuration.

use crate::discovery::BrowserOptions;
use crate::scanner::ScanOptions;
use crate::types::HttpConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the HTML report.
pub const DEFAULT_REPORT_PATH: &str = "jsrecon-report.html";

/// Render a web page, scan its scripts for routes, requires and token-shaped strings.
#[derive(Parser, Debug, Clone)]
#[command(name = "jsrecon")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan a domain's scripts and write a report
    Scan(ScanConfig),
    /// Download and set up a managed Chromium browser
    Setup(SetupConfig),
}

/// Configuration for the setup command.
#[derive(Parser, Debug, Clone)]
pub struct SetupConfig {
    /// Force re-download even if Chromium is already installed
    #[arg(long)]
    pub force: bool,
}

/// Configuration for the scan command.
#[derive(Parser, Debug, Clone)]
pub struct ScanConfig {
    /// Target URL including scheme, e.g. https://example.com
    pub domain: String,

    /// Where to write the HTML report
    #[arg(short, long, env = "JSRECON_OUTPUT", default_value = DEFAULT_REPORT_PATH)]
    pub output: PathBuf,

    /// Also print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Number of scripts fetched and analyzed concurrently
    #[arg(short, long, default_value = "4")]
    pub concurrency: usize,

    /// Timeout for the whole run in seconds (page render plus all script fetches)
    #[arg(long, default_value = "120")]
    pub timeout: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub fetch_timeout: u64,

    /// Retries for failed script requests (4xx is never retried)
    #[arg(long, default_value = "0")]
    pub max_retries: u32,

    /// Rate limit for script requests (requests per second)
    #[arg(long, default_value = "10")]
    pub rate_limit: u32,

    /// Custom User-Agent string
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Path to Chrome/Chromium executable (overrides auto-detection)
    #[arg(long, env = "JSRECON_CHROME")]
    pub chrome_path: Option<PathBuf>,

    /// Milliseconds to wait after page load before reading the DOM
    #[arg(long, default_value = "1000")]
    pub settle_ms: u64,

    /// Quiet mode: no banner or status lines
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            output: PathBuf::from(DEFAULT_REPORT_PATH),
            json: false,
            concurrency: 4,
            timeout: 120,
            fetch_timeout: 30,
            max_retries: 0,
            rate_limit: 10,
            user_agent: None,
            chrome_path: None,
            settle_ms: 1000,
            quiet: false,
        }
    }
}

impl ScanConfig {
    /// Get HTTP configuration from scan config.
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout_secs: self.fetch_timeout,
            max_retries: self.max_retries,
            user_agent: self.user_agent.clone().unwrap_or_else(|| {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
            }),
        }
    }

    /// Get browser options; an explicit flag wins over the managed install.
    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            timeout: Duration::from_secs(self.fetch_timeout),
            settle: Duration::from_millis(self.settle_ms),
            headless: true,
            chrome_executable: self
                .chrome_path
                .clone()
                .or_else(crate::browser::resolve_chrome_executable),
        }
    }

    /// Get scheduling options for the scanner.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            concurrency: self.concurrency.max(1),
            run_timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_defaults() {
        let config = Config::parse_from(["jsrecon", "scan", "https://example.com"]);
        match config.command {
            Commands::Scan(scan) => {
                assert_eq!(scan.domain, "https://example.com");
                assert_eq!(scan.concurrency, 4);
                assert_eq!(scan.timeout, 120);
                assert_eq!(scan.max_retries, 0);
                assert!(!scan.json);
            }
            other => panic!("expected scan, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_scan_flags() {
        let config = Config::parse_from([
            "jsrecon",
            "-v",
            "scan",
            "https://example.com",
            "-c",
            "8",
            "--timeout",
            "10",
            "--json",
            "-o",
            "out.html",
        ]);
        assert!(config.verbose);
        match config.command {
            Commands::Scan(scan) => {
                assert_eq!(scan.concurrency, 8);
                assert_eq!(scan.timeout, 10);
                assert!(scan.json);
                assert_eq!(scan.output, PathBuf::from("out.html"));
            }
            other => panic!("expected scan, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_options_clamp_concurrency() {
        let config = ScanConfig {
            concurrency: 0,
            ..ScanConfig::default()
        };
        assert_eq!(config.scan_options().concurrency, 1);
    }

    #[test]
    fn test_http_config() {
        let config = ScanConfig {
            fetch_timeout: 5,
            user_agent: Some("custom/1.0".to_string()),
            ..ScanConfig::default()
        };
        let http = config.http_config();
        assert_eq!(http.timeout_secs, 5);
        assert_eq!(http.user_agent, "custom/1.0");
    }
}
