//! Browser management: auto-download Chromium and resolve executable paths.

use crate::types::{ReconError, Result};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use std::path::{Path, PathBuf};
use tracing::info;

/// Returns the managed Chrome installation directory: `~/.jsrecon/chrome/`
pub fn managed_chrome_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        ReconError::ConfigError("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".jsrecon").join("chrome"))
}

/// Checks the managed directory for a previously-downloaded Chrome executable.
pub fn resolve_chrome_executable() -> Option<PathBuf> {
    let chrome_dir = managed_chrome_dir().ok()?;
    find_chrome_in_dir(&chrome_dir)
}

/// Download Chromium to the managed directory using `BrowserFetcher`.
/// Returns the path to the downloaded executable.
pub async fn download_chrome(force: bool) -> Result<PathBuf> {
    let chrome_dir = managed_chrome_dir()?;

    if !force {
        if let Some(exe) = find_chrome_in_dir(&chrome_dir) {
            info!("Chrome already installed at {:?}", exe);
            return Ok(exe);
        }
    }

    if force && chrome_dir.exists() {
        info!("Removing existing Chrome installation for re-download...");
        tokio::fs::remove_dir_all(&chrome_dir).await?;
    }

    tokio::fs::create_dir_all(&chrome_dir).await?;

    info!("Downloading Chromium to {:?}...", chrome_dir);

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&chrome_dir)
            .build()
            .map_err(|e| {
                ReconError::Browser(format!("Failed to configure browser fetcher: {}", e))
            })?,
    );

    let installed = fetcher
        .fetch()
        .await
        .map_err(|e| ReconError::Browser(format!("Failed to download Chromium: {}", e)))?;

    info!("Chromium downloaded to {:?}", installed.executable_path);
    Ok(installed.executable_path)
}

/// Search a directory recursively for a Chrome/Chromium executable.
fn find_chrome_in_dir(dir: &Path) -> Option<PathBuf> {
    if !dir.exists() {
        return None;
    }

    let mut entries = Vec::new();
    walk_recursive(dir, &mut entries);

    for path in entries {
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => continue,
        };

        match name.as_str() {
            // macOS app bundle
            "Chromium.app" => {
                let inner = path.join("Contents/MacOS/Chromium");
                if inner.exists() {
                    return Some(inner);
                }
            }
            "chrome" | "chromium" | "Chromium" | "Google Chrome" | "chrome.exe" | "chromium.exe" => {
                if path.is_file() {
                    return Some(path);
                }
            }
            _ => {}
        }
    }

    None
}

fn walk_recursive(dir: &Path, results: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let is_dir = path.is_dir();
            results.push(path.clone());
            if is_dir {
                walk_recursive(&path, results);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_chrome_dir() {
        let dir = managed_chrome_dir().unwrap();
        assert!(dir.ends_with("chrome"));
        assert!(dir.to_string_lossy().contains(".jsrecon"));
    }

    #[test]
    fn test_find_chrome_in_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("linux-1234").join("chrome-linux");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_chrome_in_dir(tmp.path()), None);

        std::fs::write(nested.join("chrome"), b"").unwrap();
        assert_eq!(find_chrome_in_dir(tmp.path()), Some(nested.join("chrome")));
    }

    #[test]
    fn test_missing_dir() {
        assert_eq!(find_chrome_in_dir(Path::new("/nonexistent/jsrecon/chrome")), None);
    }
}
