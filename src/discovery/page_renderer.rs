//! Page rendering through headless Chrome (Chrome DevTools Protocol).
//!
//! The browser is an explicit handle: [`BrowserSession::launch`] acquires it,
//! [`BrowserSession::close`] releases it. [`ChromePageFetcher`] scopes one
//! session around a single render call.
//!
//! Requires: Chrome or Chromium browser installed (or `jsrecon setup`)

use crate::types::{ReconError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Counter for generating unique browser profile directories
static BROWSER_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Produces the rendered markup of a page.
pub trait PageFetcher {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String>>;
}

/// Options for launching and driving the browser.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Navigation timeout.
    pub timeout: Duration,
    /// Extra wait after load so client-side rendering can add script tags.
    pub settle: Duration,
    pub headless: bool,
    /// Explicit path to Chrome/Chromium executable
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            settle: Duration::from_millis(1000),
            headless: true,
            chrome_executable: None,
        }
    }
}

/// A browser profile directory, removed when dropped.
#[derive(Debug)]
struct ProfileDir {
    path: PathBuf,
}

impl ProfileDir {
    /// Create a profile directory unique to this process and session.
    fn create_in(parent: &Path) -> Result<Self> {
        // Unique profile so parallel sessions never share a lock file
        let instance_id = BROWSER_INSTANCE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = parent.join(format!(
            "jsrecon-browser-{}-{}",
            std::process::id(),
            instance_id
        ));

        std::fs::create_dir_all(&path).map_err(|e| {
            ReconError::Browser(format!("Failed to create profile dir {:?}: {}", path, e))
        })?;

        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            debug!("Failed to cleanup profile dir {:?}: {}", self.path, e);
        }
    }
}

/// A running browser plus its CDP handler task and profile directory.
///
/// Dropping the session (a timed-out or cancelled run) aborts the handler and
/// removes the profile; [`BrowserSession::close`] also shuts Chrome down first.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    profile_dir: ProfileDir,
    options: BrowserOptions,
}

impl BrowserSession {
    /// Launch a browser, with auto-download fallback if no Chrome is found.
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        let profile_dir = ProfileDir::create_in(&std::env::temp_dir())?;

        // Explicit path > previously downloaded > system Chrome
        let chrome_exe = options
            .chrome_executable
            .clone()
            .or_else(crate::browser::resolve_chrome_executable);

        let launch_result = match build_browser_config(options, profile_dir.path(), chrome_exe.as_deref()) {
            Ok(config) => Browser::launch(config).await,
            Err(e) => Err(chromiumoxide::error::CdpError::msg(e.to_string())),
        };

        let (browser, mut handler) = match launch_result {
            Ok(pair) => pair,
            Err(e) => {
                if let Some(exe) = chrome_exe {
                    return Err(ReconError::Browser(format!(
                        "Failed to launch browser with Chrome at {:?}: {}",
                        exe, e
                    )));
                }

                warn!("Chrome not found, downloading Chromium automatically... (run `jsrecon setup` to pre-install)");
                let exe = crate::browser::download_chrome(false).await?;

                let config = build_browser_config(options, profile_dir.path(), Some(&exe))?;
                Browser::launch(config).await.map_err(|e| {
                    ReconError::Browser(format!(
                        "Failed to launch browser even after downloading Chromium: {}",
                        e
                    ))
                })?
            }
        };

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("Browser session started ({:?})", profile_dir.path());

        Ok(Self {
            browser,
            handler_task,
            profile_dir,
            options: options.clone(),
        })
    }

    /// Navigate to `url` and return the rendered document's outer HTML.
    pub async fn render(&self, url: &str) -> Result<String> {
        let page_error = |reason: String| ReconError::PageFetch {
            url: url.to_string(),
            reason,
        };

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| page_error(format!("failed to create page: {}", e)))?;

        debug!("Navigating to: {}", url);
        match tokio::time::timeout(self.options.timeout, page.goto(url)).await {
            Ok(Ok(_)) => debug!("Navigation completed"),
            Ok(Err(e)) => return Err(page_error(e.to_string())),
            Err(_) => {
                return Err(page_error(format!(
                    "navigation timed out after {}s",
                    self.options.timeout.as_secs()
                )))
            }
        }

        if let Err(e) = page.find_element("body").await {
            warn!("No <body> in {} ({}), continuing", url, e);
        }

        tokio::time::sleep(self.options.settle).await;

        let html = page
            .evaluate("document.documentElement.outerHTML")
            .await
            .map_err(|e| page_error(e.to_string()))?
            .into_value::<String>()
            .map_err(|e| page_error(format!("unexpected DOM snapshot: {}", e)))?;

        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }

        info!("Rendered {} ({} bytes)", url, html.len());
        Ok(html)
    }

    /// Shut the browser down; dropping the session then removes its profile directory.
    pub async fn close(mut self) {
        debug!("Closing browser session ({:?})", self.profile_dir.path());
        if let Err(e) = self.browser.close().await {
            debug!("Browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser wait failed: {}", e);
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

/// Build a BrowserConfig with the given profile directory.
fn build_browser_config(
    options: &BrowserOptions,
    profile_dir: &Path,
    chrome_exe: Option<&Path>,
) -> Result<BrowserConfig> {
    let mut config_builder = BrowserConfig::builder().user_data_dir(profile_dir);

    if let Some(exe) = chrome_exe {
        config_builder = config_builder.chrome_executable(exe);
    }

    if !options.headless {
        config_builder = config_builder.with_head();
    }

    config_builder = config_builder.no_sandbox().viewport(None);

    config_builder
        .build()
        .map_err(|e| ReconError::Browser(format!("Failed to build browser config: {}", e)))
}

/// Renders pages with a fresh [`BrowserSession`] per call.
#[derive(Debug, Clone, Default)]
pub struct ChromePageFetcher {
    options: BrowserOptions,
}

impl ChromePageFetcher {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }
}

impl PageFetcher for ChromePageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        info!("Rendering with headless browser: {}", url);
        let session = BrowserSession::launch(&self.options).await?;
        let rendered = session.render(url).await;
        session.close().await;
        rendered
    }
}

/// A page fetcher that returns markup the caller already has.
#[derive(Debug, Clone)]
pub struct StaticPage {
    markup: String,
}

impl StaticPage {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }
}

impl PageFetcher for StaticPage {
    async fn fetch_page(&self, _url: &str) -> Result<String> {
        Ok(self.markup.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BrowserOptions::default();
        assert!(options.headless);
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert!(options.chrome_executable.is_none());
    }

    #[test]
    fn test_profile_dir_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let profile = ProfileDir::create_in(parent.path()).unwrap();
        let path = profile.path().to_path_buf();
        std::fs::write(path.join("SingletonLock"), b"").unwrap();
        assert!(path.is_dir());

        drop(profile);
        assert!(!path.exists());
    }

    #[test]
    fn test_profile_dirs_are_unique() {
        let parent = tempfile::tempdir().unwrap();
        let first = ProfileDir::create_in(parent.path()).unwrap();
        let second = ProfileDir::create_in(parent.path()).unwrap();
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn test_profile_dir_creation_failure_is_reported() {
        let parent = tempfile::tempdir().unwrap();
        let file = parent.path().join("not-a-dir");
        std::fs::write(&file, b"").unwrap();

        let err = ProfileDir::create_in(&file).unwrap_err();
        assert!(matches!(err, ReconError::Browser(_)));
    }

    #[tokio::test]
    async fn test_static_page() {
        let page = StaticPage::new("<script src=\"/a.js\"></script>");
        let markup = page.fetch_page("https://example.com").await.unwrap();
        assert!(markup.contains("/a.js"));
    }
}
