//! Batch resolution of page URLs.
//!
//! URLs are processed strictly one after another in input order. A failure
//! for one URL is logged and skipped; it never aborts the rest of the batch.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::extract::resolve;
use crate::http_client::PageFetcher;
use crate::quality::QualityPreference;

/// A page URL together with the direct stream URL resolved from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVideo {
    pub source_url: String,
    pub download_url: String,
}

/// Resolves direct stream URLs for a list of pages through one fetcher.
pub struct BatchResolver<F> {
    fetcher: F,
    quality: QualityPreference,
}

impl<F: PageFetcher> BatchResolver<F> {
    pub fn new(fetcher: F, quality: QualityPreference) -> Self {
        debug!(quality = %quality, "Initializing resolver");
        Self { fetcher, quality }
    }

    /// Fetch one page and resolve its stream URL.
    ///
    /// `Ok(None)` means the page was fetched but carried no usable metadata.
    #[instrument(skip(self), fields(url = %url, quality = %self.quality))]
    pub async fn resolve_one(&self, url: &str) -> anyhow::Result<Option<String>> {
        debug!("Requesting page");
        let page = self.fetcher.fetch_page(url).await?;
        let resolved = resolve(&page, self.quality);
        if resolved.is_none() {
            warn!(url = %url, "Failed to resolve any download URL");
        }
        Ok(resolved)
    }

    /// Resolve every URL, returning the successes in input order.
    pub async fn process_all<S: AsRef<str>>(&self, urls: &[S]) -> Vec<ResolvedVideo> {
        let mut results = Vec::new();

        for url in urls.iter().map(AsRef::as_ref) {
            info!(url = %url, "Processing URL");

            match self.resolve_one(url).await {
                Ok(Some(download_url)) => {
                    info!(url = %url, download_url = %download_url, "Resolved download URL");
                    results.push(ResolvedVideo {
                        source_url: url.to_string(),
                        download_url,
                    });
                }
                Ok(None) => {
                    warn!(url = %url, "Could not resolve download URL");
                }
                Err(e) => {
                    error!(url = %url, error = %format!("{e:#}"), "Failed to process URL");
                }
            }
        }

        if results.is_empty() {
            warn!(total = urls.len(), "No videos were successfully processed");
        }

        results
    }
}
