//! Script retrieval over HTTP with rate limiting and optional retries.

use crate::types::{FetchedScript, HttpConfig, ReconError, Result};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Retrieves the raw bytes of one script URL.
pub trait ResourceFetcher {
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<FetchedScript>>;
}

/// Fetcher for script files backed by `reqwest`.
pub struct ScriptFetcher {
    client: Client,
    config: HttpConfig,
    rate_limiter: Arc<RateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>>,
}

impl ScriptFetcher {
    /// Create a new script fetcher.
    pub fn new(config: HttpConfig, rate_limit: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .http1_only()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        let quota = Quota::per_second(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Fetch a script, retrying up to `max_retries` times on non-4xx failures.
    async fn fetch_with_retries(&self, url: &str) -> Result<FetchedScript> {
        let mut retries = 0;

        loop {
            self.rate_limiter.until_ready().await;

            let err = match self.do_fetch(url).await {
                Ok(fetched) => {
                    debug!(
                        "Fetched script: {} ({} bytes, {})",
                        url,
                        fetched.bytes.len(),
                        fetched.content_type.as_deref().unwrap_or("no content type")
                    );
                    return Ok(fetched);
                }
                Err(e) => e,
            };

            // 4xx won't succeed on retry
            let should_retry = !matches!(err, ReconError::HttpStatus { status, .. } if (400..500).contains(&status));

            if !should_retry || retries >= self.config.max_retries {
                if retries > 0 {
                    warn!("Failed to fetch {} after {} retries: {}", url, retries, err);
                }
                return Err(err);
            }

            retries += 1;
            trace!("Retry {} for {}", retries, url);
            tokio::time::sleep(Duration::from_millis(500 * retries as u64)).await;
        }
    }

    /// Perform the actual HTTP fetch.
    async fn do_fetch(&self, url: &str) -> Result<FetchedScript> {
        let fetch_error = |e: reqwest::Error| ReconError::ScriptFetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReconError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(fetch_error)?;

        Ok(FetchedScript {
            url: url.to_string(),
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

impl ResourceFetcher for ScriptFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<FetchedScript> {
        self.fetch_with_retries(url).await
    }
}

/// Turn a protocol-relative reference into an absolute `https` URL.
pub fn absolute_script_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}
