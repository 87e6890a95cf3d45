//! Raw page provider: read the trimmed page from the cache file, or fetch,
//! trim and cache it.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

/// Return the trimmed page markup.
///
/// An existing cache file is used verbatim unless `refresh` is set. Otherwise
/// the page is fetched from `url`, trimmed, and written to `cache_path`
/// before being returned. Fetch failures (including non-2xx responses) are
/// not retried.
pub fn load_page(url: &str, cache_path: &Path, refresh: bool, quiet: bool) -> Result<String> {
    if !refresh && cache_path.exists() {
        log::info!("cache hit: {}", cache_path.display());
        if !quiet {
            println!("{} {}", "Cached".green(), cache_path.display());
        }
        return fs::read_to_string(cache_path)
            .with_context(|| format!("Failed to read cache {}", cache_path.display()));
    }

    log::info!("cache miss, fetching {url}");
    let raw = fetch(url)?;
    if !quiet {
        println!("{} {}", "Fetched".cyan().bold(), url);
    }
    let trimmed = campaign_parse::trim_page(&raw)
        .with_context(|| format!("Failed to trim page fetched from {url}"))?;

    if let Some(dir) = cache_path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    fs::write(cache_path, trimmed)
        .with_context(|| format!("Failed to write cache {}", cache_path.display()))?;
    if !quiet {
        println!("  {} {}", "Cached".green(), cache_path.display());
    }

    Ok(trimmed.to_string())
}

fn fetch(url: &str) -> Result<String> {
    let response = ureq::get(url)
        .call()
        .with_context(|| format!("Failed to fetch {url}"))?;
    response
        .into_string()
        .with_context(|| format!("Failed to read response body from {url}"))
}
