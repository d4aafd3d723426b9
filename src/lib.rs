//! `vidresolve` - Direct video stream URL resolver
//!
//! # Features
//!
//! - **Progressive metadata extraction**: finds the `"progressive"` stream
//!   list embedded in a page's `<script>` blocks
//! - **Quality selection**: lowest / medium / highest by resolution rank
//! - **Heuristic fallback**: `"downloadUrl"` fields anywhere in the page
//! - **Batch resolution**: one failing URL never aborts the rest
//!
//! # Example
//!
//! ```rust,no_run
//! use vidresolve::{BatchResolver, ClientOptions, PageClient, QualityPreference};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PageClient::new(&ClientOptions::default())?;
//!     let resolver = BatchResolver::new(client, QualityPreference::Highest);
//!     for video in resolver.process_all(&["https://vimeo.com/76979871"]).await {
//!         println!("{} -> {}", video.source_url, video.download_url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod extract;
pub mod fingerprint;
pub mod http_client;
pub mod logging;
pub mod output;
pub mod quality;

pub use batch::{BatchResolver, ResolvedVideo};
pub use config::{ConfigError, RunConfig};
pub use extract::resolve;
pub use fingerprint::BrowserProfile;
pub use http_client::{ClientOptions, PageClient, PageFetcher};
pub use logging::{logger, Logger};
pub use quality::{select, QualityPreference, StreamDescriptor};

/// Version of vidresolve
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
