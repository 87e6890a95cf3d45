use anyhow::{Context, Result};
use campaign_parse::Preamble;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "campaign-quotes.json";

/// campaign-quotes.json schema. Every field is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotesConfig {
    #[serde(default = "default_source_url")]
    pub source_url: String,

    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            cache_path: default_cache_path(),
            output_path: default_output_path(),
            author: default_author(),
            font_size: default_font_size(),
        }
    }
}

impl QuotesConfig {
    /// LaTeX preamble settings for this config.
    pub fn preamble(&self) -> Preamble {
        Preamble {
            author: self.author.clone(),
            font_size: self.font_size,
            ..Preamble::default()
        }
    }
}

fn default_source_url() -> String {
    "https://web.archive.org/web/20240602054927/https://starcraft.fandom.com/wiki/StarCraft_campaign_quotations".to_string()
}
fn default_cache_path() -> PathBuf {
    PathBuf::from("cache/html")
}
fn default_output_path() -> PathBuf {
    PathBuf::from("out/output.tex")
}
fn default_author() -> String {
    Preamble::default().author
}
fn default_font_size() -> u32 {
    Preamble::default().font_size
}

/// Load config from `explicit`, else from [`DEFAULT_CONFIG_FILE`] if it
/// exists, else return defaults. An explicit path must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<QuotesConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                log::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                return Ok(QuotesConfig::default());
            }
            fallback
        }
    };

    let raw = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: QuotesConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    log::debug!("loaded config from {}", config_path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "sourceUrl": "https://example.org/quotes",
            "cachePath": "/tmp/quotes/html",
            "outputPath": "/tmp/quotes/out.tex",
            "author": "Jim Raynor",
            "fontSize": 10
        }"#;

        let config: QuotesConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.source_url, "https://example.org/quotes");
        assert_eq!(config.cache_path, PathBuf::from("/tmp/quotes/html"));
        assert_eq!(config.output_path, PathBuf::from("/tmp/quotes/out.tex"));
        assert_eq!(config.preamble().author, "Jim Raynor");
        assert_eq!(config.preamble().font_size, 10);
    }

    #[test]
    fn test_defaults() {
        let config: QuotesConfig = serde_json::from_str("{}").unwrap();
        assert!(config.source_url.starts_with("https://web.archive.org/"));
        assert_eq!(config.cache_path, PathBuf::from("cache/html"));
        assert_eq!(config.output_path, PathBuf::from("out/output.tex"));
        assert_eq!(config.preamble(), Preamble::default());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let missing = std::env::temp_dir().join("campaign-quotes-no-such-config.json");
        assert!(load_config(Some(&missing)).is_err());
    }
}
