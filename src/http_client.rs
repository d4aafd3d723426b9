//! Page fetching.
//!
//! Features:
//! - Browser-like default headers (see [`crate::fingerprint`])
//! - Default per-request timeout, overridable per call
//! - Optional forward proxy for both `http` and `https`
//! - Connection pooling, reused across a whole batch
//! - Brotli, Zstd, Gzip compression (auto-negotiated)

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::fingerprint::BrowserProfile;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source of page text for the resolver.
///
/// Any non-success status or transport failure is an error.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Settings for building a [`PageClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub use_proxy: bool,
    pub proxy_url: Option<String>,
    pub profile: BrowserProfile,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_proxy: false,
            proxy_url: None,
            profile: BrowserProfile::default(),
        }
    }
}

/// reqwest-backed page fetcher.
pub struct PageClient {
    client: Client,
    timeout: Duration,
    proxied: bool,
}

impl PageClient {
    /// Build a client from options.
    ///
    /// Requesting a proxy without an address logs a warning and proceeds
    /// unproxied. An unparsable proxy address is an error.
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .default_headers(options.profile.to_headers())
            .connect_timeout(Duration::from_secs(10))
            .timeout(options.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true);

        let proxy_url = options
            .proxy_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty());

        let proxied = match (options.use_proxy, proxy_url) {
            (true, Some(url)) => {
                info!(proxy = url, "Configuring HTTP/HTTPS proxy");
                let proxy = reqwest::Proxy::all(url)
                    .map_err(|e| anyhow!("Invalid proxy URL '{url}': {e}"))?;
                builder = builder.proxy(proxy);
                true
            }
            (true, None) => {
                warn!("Proxy requested but no proxy URL provided. Proceeding without proxy.");
                false
            }
            (false, _) => {
                info!("Proxy usage disabled");
                false
            }
        };

        Ok(Self {
            client: builder.build()?,
            timeout: options.timeout,
            proxied,
        })
    }

    /// Fetch a page, overriding the default timeout when `timeout` is set.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page_with_timeout(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> Result<String> {
        let timeout = timeout.unwrap_or(self.timeout);
        debug!(timeout_secs = timeout.as_secs(), "Requesting page");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;

        debug!(
            status = %response.status(),
            version = ?response.version(),
            "Response received"
        );

        Ok(response.text().await?)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether requests are routed through a proxy.
    pub fn is_proxied(&self) -> bool {
        self.proxied
    }
}

#[async_trait]
impl PageFetcher for PageClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.fetch_page_with_timeout(url, None).await
    }
}
