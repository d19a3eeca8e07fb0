//! Main scanner orchestrating all components.

use crate::aggregate::aggregate;
use crate::config::ScanConfig;
use crate::discovery::{
    absolute_script_url, validate_domain, ChromePageFetcher, PageFetcher, ResourceFetcher,
    ScriptFetcher, ScriptLocator,
};
use crate::output::{html, ConsoleOutput};
use crate::parser::Extractor;
use crate::types::{ReconError, Report, Result, ScriptRecord};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::pin::pin;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Scheduling limits for one run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Scripts fetched and analyzed at the same time.
    pub concurrency: usize,
    /// Bound on the whole run: page render plus every script fetch.
    pub run_timeout: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            run_timeout: Duration::from_secs(120),
        }
    }
}

/// Main scanner: render the page, locate scripts, analyze them, build the report.
pub struct Scanner<P, F> {
    page_fetcher: P,
    fetcher: F,
    extractor: Extractor,
    locator: ScriptLocator,
    options: ScanOptions,
    console: ConsoleOutput,
}

impl Scanner<ChromePageFetcher, ScriptFetcher> {
    /// Create a scanner that renders with headless Chrome and fetches over HTTP.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let fetcher = ScriptFetcher::new(config.http_config(), config.rate_limit)?;
        let page_fetcher = ChromePageFetcher::new(config.browser_options());

        Ok(Self::new(page_fetcher, fetcher, config.scan_options()))
    }
}

impl<P, F> Scanner<P, F>
where
    P: PageFetcher,
    F: ResourceFetcher,
{
    pub fn new(page_fetcher: P, fetcher: F, options: ScanOptions) -> Self {
        Self {
            page_fetcher,
            fetcher,
            extractor: Extractor::new(),
            locator: ScriptLocator::new(),
            options,
            console: ConsoleOutput::silent(),
        }
    }

    /// Replace the console handler (silent by default).
    pub fn with_console(mut self, console: ConsoleOutput) -> Self {
        self.console = console;
        self
    }

    /// Scan a domain and return the report.
    ///
    /// The domain is validated before anything is fetched. Any fetch failure,
    /// or the run outlasting [`ScanOptions::run_timeout`], fails the whole run.
    pub async fn scan(&self, domain: &str) -> Result<Report> {
        validate_domain(domain)?;

        let start_time = Instant::now();
        self.console.print_scan_start(domain);

        let report = match tokio::time::timeout(self.options.run_timeout, self.run(domain)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Run for {} exceeded {:?}", domain, self.options.run_timeout);
                return Err(ReconError::Timeout(self.options.run_timeout));
            }
        };

        info!(
            "Scanned {} in {:.2}s: {} scripts, {} routes, {} dependencies, {} tokens",
            domain,
            start_time.elapsed().as_secs_f64(),
            report.files.len(),
            report.total_routes,
            report.total_deps,
            report.total_tokens
        );
        Ok(report)
    }

    /// Scan a domain and write the HTML report to `output_path`.
    ///
    /// Nothing is written when the scan fails.
    pub async fn scan_to_file(&self, domain: &str, output_path: &Path) -> Result<Report> {
        let report = self.scan(domain).await?;
        html::write(&report, output_path)?;
        Ok(report)
    }

    async fn run(&self, domain: &str) -> Result<Report> {
        self.console.print_progress("Rendering page...");
        let markup = self.page_fetcher.fetch_page(domain).await?;
        debug!("Rendered markup: {} bytes", markup.len());

        let script_urls = self.locator.locate(&markup, domain);
        self.console
            .print_progress(&format!("Located {} scripts", script_urls.len()));

        let results = self.analyze_all(&script_urls).await;
        aggregate(domain, results)
    }

    /// Analyze scripts with bounded concurrency.
    ///
    /// Results land in slots addressed by discovery index, so completion order
    /// never affects output order. Polling stops at the first failure.
    async fn analyze_all(&self, script_urls: &[String]) -> Vec<Result<ScriptRecord>> {
        let mut slots: Vec<Option<Result<ScriptRecord>>> =
            script_urls.iter().map(|_| None).collect();

        let pb = self
            .console
            .create_progress_bar(script_urls.len() as u64, "Fetching scripts");

        let mut completions = pin!(stream::iter(script_urls.iter().enumerate())
            .map(|(index, url)| async move { (index, self.analyze_one(url).await) })
            .buffer_unordered(self.options.concurrency.max(1)));

        while let Some((index, result)) = completions.next().await {
            if let Some(ref pb) = pb {
                pb.inc(1);
            }

            let failed = result.is_err();
            slots[index] = Some(result);
            if failed {
                warn!("Script {} failed, aborting remaining fetches", script_urls[index]);
                break;
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        slots.into_iter().flatten().collect()
    }

    async fn analyze_one(&self, url: &str) -> Result<ScriptRecord> {
        let url = absolute_script_url(url);
        let fetched = self.fetcher.fetch_bytes(&url).await?;
        let extraction = self.extractor.extract(&fetched.text());

        debug!(
            "{}: {} routes, {} dependencies, {} tokens",
            url,
            extraction.routes.len(),
            extraction.dependencies.len(),
            extraction.tokens.len()
        );
        Ok(ScriptRecord::new(url, extraction))
    }
}
