//! Run configuration loaded from JSON documents.
//!
//! Two documents feed a run: an *input* document that must carry
//! `startUrls`, and an optional *settings* document with defaults. Input
//! keys override settings keys (shallow merge).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::http_client::{ClientOptions, DEFAULT_TIMEOUT_SECS};
use crate::quality::QualityPreference;

/// Configuration problems. All of them abort the run before any fetch.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} must contain a JSON object at the top level")]
    NotAnObject(PathBuf),

    #[error("input must contain 'startUrls' as a non-empty list")]
    MissingStartUrls,

    #[error("'startUrls' list cannot be empty")]
    EmptyStartUrls,

    #[error("each item in 'startUrls' must be an object with a 'url' field")]
    InvalidEntry,

    #[error("invalid configuration: {0}")]
    Invalid(#[source] serde_json::Error),

    #[error("no input given: pass --input <FILE> or one or more URLs")]
    NoInput,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// One entry of `startUrls`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartUrl {
    pub url: String,
}

/// Effective settings for a run after merging input over settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default)]
    pub start_urls: Vec<StartUrl>,

    #[serde(default)]
    pub quality: QualityPreference,

    #[serde(default)]
    pub use_proxy_for_download: bool,

    #[serde(default)]
    pub proxy_url: Option<String>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Accepted snake_case spellings and their canonical camelCase keys.
const KEY_ALIASES: [(&str, &str); 3] = [
    ("use_proxy_for_download", "useProxyForDownload"),
    ("proxy_url", "proxyUrl"),
    ("output_dir", "outputDir"),
];

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl RunConfig {
    /// Build from a settings object and an input object.
    ///
    /// The input must already have passed [`validate_input`].
    pub fn from_documents(settings: Map<String, Value>, input: Map<String, Value>) -> Result<Self> {
        let merged = normalize_keys(merge(settings, input));
        serde_json::from_value(Value::Object(merged)).map_err(ConfigError::Invalid)
    }

    pub fn urls(&self) -> Vec<String> {
        self.start_urls.iter().map(|entry| entry.url.clone()).collect()
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_secs(self.timeout),
            use_proxy: self.use_proxy_for_download,
            proxy_url: self.proxy_url.clone().filter(|url| !url.is_empty()),
            ..ClientOptions::default()
        }
    }
}

/// Check the shape of `startUrls` in an input document.
pub fn validate_input(input: &Map<String, Value>) -> Result<()> {
    let Some(Value::Array(entries)) = input.get("startUrls") else {
        return Err(ConfigError::MissingStartUrls);
    };

    if entries.is_empty() {
        return Err(ConfigError::EmptyStartUrls);
    }

    let well_formed = entries
        .iter()
        .all(|entry| entry.get("url").is_some_and(Value::is_string));
    if !well_formed {
        return Err(ConfigError::InvalidEntry);
    }

    Ok(())
}

/// Shallow merge: keys of `overrides` replace keys of `base`.
pub fn merge(mut base: Map<String, Value>, overrides: Map<String, Value>) -> Map<String, Value> {
    base.extend(overrides);
    base
}

/// Rename snake_case keys to their camelCase form.
///
/// When both spellings are present the camelCase value is kept.
pub fn normalize_keys(mut document: Map<String, Value>) -> Map<String, Value> {
    for (snake, camel) in KEY_ALIASES {
        if let Some(value) = document.remove(snake) {
            document.entry(camel).or_insert(value);
        }
    }
    document
}

/// Read a JSON object document from disk.
pub fn load_document(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject(path.to_path_buf())),
    }
}

/// Load the settings document.
///
/// An explicit path must exist. Without one, the default location is used
/// when present and an empty document otherwise.
pub fn load_settings(explicit: Option<&Path>) -> Result<Map<String, Value>> {
    if let Some(path) = explicit {
        return load_document(path);
    }

    let path = default_settings_path();
    if path.exists() {
        load_document(&path)
    } else {
        Ok(Map::new())
    }
}

/// `<config dir>/vidresolve/settings.json`.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vidresolve")
        .join("settings.json")
}

/// Build an input document from bare URLs.
pub fn input_from_urls<S: AsRef<str>>(urls: &[S]) -> Map<String, Value> {
    let entries = urls
        .iter()
        .map(|url| {
            let url: &str = url.as_ref();
            serde_json::json!({ "url": url })
        })
        .collect();
    let mut input = Map::new();
    input.insert("startUrls".to_string(), Value::Array(entries));
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn defaults_apply_when_keys_absent() {
        let input = object(json!({ "startUrls": [{ "url": "https://vimeo.com/1" }] }));
        let config = RunConfig::from_documents(Map::new(), input).unwrap();
        assert_eq!(config.urls(), vec!["https://vimeo.com/1"]);
        assert_eq!(config.quality, QualityPreference::Highest);
        assert!(!config.use_proxy_for_download);
        assert_eq!(config.proxy_url, None);
        assert_eq!(config.output_dir, PathBuf::from("downloads"));
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn input_overrides_settings() {
        let settings = object(json!({
            "quality": "lowest",
            "timeout": 10,
            "proxyUrl": "http://proxy.local:3128"
        }));
        let input = object(json!({
            "startUrls": [{ "url": "https://vimeo.com/1" }],
            "quality": "medium"
        }));
        let config = RunConfig::from_documents(settings, input).unwrap();
        assert_eq!(config.quality, QualityPreference::Medium);
        assert_eq!(config.timeout, 10);
        assert_eq!(config.proxy_url.as_deref(), Some("http://proxy.local:3128"));
    }

    #[test]
    fn snake_case_aliases_are_accepted() {
        let input = object(json!({
            "startUrls": [{ "url": "https://vimeo.com/1" }],
            "use_proxy_for_download": true,
            "proxy_url": "http://proxy.local:3128",
            "output_dir": "out"
        }));
        let config = RunConfig::from_documents(Map::new(), input).unwrap();
        assert!(config.use_proxy_for_download);
        assert_eq!(config.output_dir, PathBuf::from("out"));

        let options = config.client_options();
        assert!(options.use_proxy);
        assert_eq!(options.proxy_url.as_deref(), Some("http://proxy.local:3128"));
    }

    #[test]
    fn camel_case_wins_over_snake_case_across_documents() {
        let settings = object(json!({
            "proxy_url": "http://settings:1",
            "use_proxy_for_download": false,
            "output_dir": "from-settings"
        }));
        let input = object(json!({
            "startUrls": [{ "url": "https://vimeo.com/1" }],
            "proxyUrl": "http://input:2",
            "useProxyForDownload": true
        }));
        let config = RunConfig::from_documents(settings, input).unwrap();
        assert_eq!(config.proxy_url.as_deref(), Some("http://input:2"));
        assert!(config.use_proxy_for_download);
        assert_eq!(config.output_dir, PathBuf::from("from-settings"));
    }

    #[test]
    fn camel_case_wins_within_one_document() {
        let normalized = normalize_keys(object(json!({
            "proxy_url": "http://snake:1",
            "proxyUrl": "http://camel:2"
        })));
        assert_eq!(normalized.get("proxyUrl"), Some(&json!("http://camel:2")));
        assert!(!normalized.contains_key("proxy_url"));
    }

    #[test]
    fn null_proxy_url_proceeds_unproxied() {
        let input = object(json!({
            "startUrls": [{ "url": "https://vimeo.com/1" }],
            "useProxyForDownload": true,
            "proxyUrl": null
        }));
        let config = RunConfig::from_documents(Map::new(), input).unwrap();
        assert_eq!(config.proxy_url, None);
        let options = config.client_options();
        assert!(options.use_proxy);
        assert!(options.proxy_url.is_none());
    }

    #[test]
    fn non_string_quality_becomes_highest() {
        for quality in [json!(null), json!(5), json!(true)] {
            let input = object(json!({
                "startUrls": [{ "url": "https://vimeo.com/1" }],
                "quality": quality
            }));
            let config = RunConfig::from_documents(Map::new(), input).unwrap();
            assert_eq!(config.quality, QualityPreference::Highest);
        }
    }

    #[test]
    fn unknown_quality_becomes_highest() {
        let input = object(json!({
            "startUrls": [{ "url": "https://vimeo.com/1" }],
            "quality": "ultra"
        }));
        let config = RunConfig::from_documents(Map::new(), input).unwrap();
        assert_eq!(config.quality, QualityPreference::Highest);
    }

    #[test]
    fn client_options_follow_timeout_and_empty_proxy() {
        let input = object(json!({
            "startUrls": [{ "url": "https://vimeo.com/1" }],
            "timeout": 12,
            "useProxyForDownload": true
        }));
        let options = RunConfig::from_documents(Map::new(), input)
            .unwrap()
            .client_options();
        assert_eq!(options.timeout, Duration::from_secs(12));
        assert!(options.use_proxy);
        assert!(options.proxy_url.is_none());
    }

    #[test]
    fn validate_rejects_missing_start_urls() {
        let err = validate_input(&object(json!({ "quality": "lowest" }))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingStartUrls));

        let err = validate_input(&object(json!({ "startUrls": "https://vimeo.com/1" }))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingStartUrls));
    }

    #[test]
    fn validate_rejects_empty_start_urls() {
        let err = validate_input(&object(json!({ "startUrls": [] }))).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyStartUrls));
        assert_eq!(err.to_string(), "'startUrls' list cannot be empty");
    }

    #[test]
    fn validate_rejects_entries_without_url() {
        for bad in [json!(["https://vimeo.com/1"]), json!([{ "href": "x" }]), json!([{ "url": 5 }])] {
            let err = validate_input(&object(json!({ "startUrls": bad }))).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEntry));
        }
    }

    #[test]
    fn input_from_urls_passes_validation() {
        let input = input_from_urls(&["https://vimeo.com/1", "https://vimeo.com/2"]);
        validate_input(&input).unwrap();
        let config = RunConfig::from_documents(Map::new(), input).unwrap();
        assert_eq!(config.urls().len(), 2);
    }

    #[test]
    fn load_document_reports_missing_file() {
        let path = std::env::temp_dir().join("vidresolve_missing_settings_for_test.json");
        let _ = std::fs::remove_file(&path);
        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_document_rejects_non_objects() {
        let path = std::env::temp_dir().join("vidresolve_array_document_for_test.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject(_)));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_document_reports_invalid_json() {
        let path = std::env::temp_dir().join("vidresolve_invalid_document_for_test.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
