//! Direct stream URL extraction from fetched page markup.
//!
//! Two strategies, tried in order:
//!
//! 1. **Progressive metadata** – every `<script>` block mentioning
//!    `progressive` is searched for a `"progressive": [ ... ]` array. The
//!    first block whose array parses and yields a usable URL wins.
//! 2. **`downloadUrl` heuristic** – the raw page is searched for
//!    `"downloadUrl": "http(s)://..."`.
//!
//! The array pattern stops at the first `]`, so arrays whose descriptors
//! contain nested arrays are cut short, fail to parse, and fall through to
//! the next block.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::quality::{select, QualityPreference, StreamDescriptor};

static PROGRESSIVE_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""progressive"\s*:\s*(\[[^\]]+\])"#).expect("progressive pattern is valid")
});

static DOWNLOAD_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""downloadUrl"\s*:\s*"(?P<url>https?://[^"]+)""#)
        .expect("downloadUrl pattern is valid")
});

static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("script selector is valid"));

/// Resolve a direct stream URL from page content.
///
/// Returns `None` when neither strategy finds anything. Malformed metadata
/// is never an error.
pub fn resolve(page: &str, preference: QualityPreference) -> Option<String> {
    for script in script_blocks(page) {
        if !script.contains("progressive") {
            continue;
        }
        debug!("Found candidate script containing 'progressive' streams");
        if let Some(url) = from_progressive(&script, preference) {
            return Some(url);
        }
    }

    if let Some(url) = find_download_url(page) {
        debug!("Resolved download URL via downloadUrl heuristic");
        return Some(url);
    }

    None
}

/// Text content of every `<script>` element, in document order.
fn script_blocks(page: &str) -> Vec<String> {
    let document = Html::parse_document(page);
    document
        .select(&SCRIPT)
        .map(|element| element.text().collect::<String>())
        .collect()
}

/// Select a stream URL from the `progressive` array inside one script block.
fn from_progressive(script: &str, preference: QualityPreference) -> Option<String> {
    let Some(captures) = PROGRESSIVE_ARRAY.captures(script) else {
        debug!("No 'progressive' array found in script content");
        return None;
    };
    let array = captures.get(1)?.as_str();

    let streams: Vec<StreamDescriptor> = match serde_json::from_str(array) {
        Ok(streams) => streams,
        Err(e) => {
            debug!(error = %e, "Error while parsing 'progressive' JSON");
            return None;
        }
    };

    let Some(selected) = select(&streams, preference) else {
        warn!(quality = %preference, "No stream matched requested quality setting");
        return None;
    };

    match selected.url() {
        Some(url) => Some(url.to_string()),
        None => {
            debug!(rank = selected.rank(), "Selected stream does not contain a 'url' field");
            None
        }
    }
}

/// First `"downloadUrl": "http(s)://..."` value in the page, verbatim.
fn find_download_url(page: &str) -> Option<String> {
    DOWNLOAD_URL
        .captures(page)
        .and_then(|captures| captures.name("url"))
        .map(|m| m.as_str().to_string())
}
