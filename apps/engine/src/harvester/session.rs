//! Session manager: the single long-lived HTTP client used for harvesting.
//!
//! Every outbound request goes through `AdaptiveDelay`, so requests are
//! spaced out even when several queries run concurrently over one manager.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{redirect, Client, StatusCode};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::harvester::pacing::AdaptiveDelay;
use crate::harvester::HarvesterConfig;

const MAX_REDIRECTS: usize = 5;

pub const USER_AGENTS: [&str; 6] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.4; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 429 or 503: the upstream asked us to back off.
    #[error("rate limited (status {status})")]
    RateLimited { status: u16 },

    #[error("unexpected status {status}")]
    Status { status: u16 },
}

impl FetchError {
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
                Some(FetchError::RateLimited {
                    status: status.as_u16(),
                })
            }
            s if s.is_success() => None,
            s => Some(FetchError::Status { status: s.as_u16() }),
        }
    }
}

/// Anything that can fetch a page body. `SessionManager` in production,
/// canned pages in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct SessionManager {
    client: Client,
    delay: AdaptiveDelay,
    permits: Semaphore,
}

impl SessionManager {
    pub fn new(config: &HarvesterConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.keepalive_max)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers(default_headers())
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            delay: AdaptiveDelay::new(config.min_delay, config.max_delay),
            permits: Semaphore::new(config.pool_max.max(1)),
        })
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("delay", &self.delay.bounds())
            .field("available_connections", &self.permits.available_permits())
            .finish()
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("es-MX,es;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

#[async_trait]
impl PageFetcher for SessionManager {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        // the semaphore is never closed, so acquire only fails after shutdown
        let _permit = self.permits.acquire().await.ok();
        self.delay.wait().await;

        let user_agent = random_user_agent();
        debug!(url, user_agent, "fetching page");

        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, user_agent)
            .send()
            .await?;

        if let Some(err) = FetchError::from_status(response.status()) {
            return Err(err);
        }

        Ok(response.text().await?)
    }
}
