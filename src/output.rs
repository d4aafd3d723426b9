//! Result serialization.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::batch::ResolvedVideo;

/// Pretty JSON array of `{sourceUrl, downloadUrl}` objects.
pub fn to_json(results: &[ResolvedVideo]) -> Result<String> {
    serde_json::to_string_pretty(results).context("failed to serialize results")
}

/// Write results to `path`, creating parent directories as needed.
pub fn write_results(results: &[ResolvedVideo], path: &Path) -> Result<()> {
    let json = to_json(results)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Results saved");
    Ok(())
}

/// Write results to `path` if given, otherwise print them to stdout.
pub fn emit(results: &[ResolvedVideo], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => write_results(results, path),
        None => {
            println!("{}", to_json(results)?);
            Ok(())
        }
    }
}
