use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{HubError, Result};
use crate::types::{SortKey, SortOrder};

/// GitHub search returns at most 100 items per page
pub const MAX_PER_PAGE: u8 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Override for GitHub Enterprise, e.g. "https://ghe.example.com/api/v3"
    pub api_url: Option<String>,
    pub token_env: Option<String>,
    pub token_command: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            token_env: Some("GITHUB_TOKEN".to_string()),
            token_command: Some("gh auth token".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub per_page: u8,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_page: 30,
            sort: SortKey::default(),
            order: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

pub fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("hubsearch"))
}

fn config_path() -> Option<PathBuf> {
    Some(config_dir()?.join("config.toml"))
}

impl Config {
    /// Load the default config file, falling back to defaults if it is missing or broken.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        match Config::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("ignoring config at {}: {}", path.display(), e);
                }
                Config::default()
            }
        }
    }

    /// Load an explicit config file. Unlike `load`, a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Config::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| HubError::Config(e.to_string()))?;
        config.search.per_page = clamp_per_page(config.search.per_page);
        Ok(config)
    }
}

pub fn clamp_per_page(per_page: u8) -> u8 {
    per_page.clamp(1, MAX_PER_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[github]
api_url = "https://ghe.example.com/api/v3"
token_env = "GHE_TOKEN"

[search]
per_page = 50
sort = "stars"
order = "asc"
"#;
        let config = Config::parse(toml_str).unwrap();
        assert_eq!(
            config.github.api_url.as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
        assert_eq!(config.github.token_env.as_deref(), Some("GHE_TOKEN"));
        // unspecified keys keep their defaults
        assert_eq!(config.github.token_command.as_deref(), Some("gh auth token"));
        assert_eq!(config.search.per_page, 50);
        assert_eq!(config.search.sort, SortKey::Stars);
        assert_eq!(config.search.order, SortOrder::Asc);
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.search.per_page, 30);
        assert_eq!(config.search.sort, SortKey::BestMatch);
        assert_eq!(config.search.order, SortOrder::Desc);
        assert_eq!(config.github.token_env.as_deref(), Some("GITHUB_TOKEN"));
    }

    #[test]
    fn per_page_is_clamped() {
        // does not fit in u8 at all
        let err = Config::parse("[search]\nper_page = 300").unwrap_err();
        assert!(matches!(err, HubError::Config(_)));

        let config = Config::parse("[search]\nper_page = 200").unwrap();
        assert_eq!(config.search.per_page, MAX_PER_PAGE);

        let config = Config::parse("[search]\nper_page = 0").unwrap();
        assert_eq!(config.search.per_page, 1);
    }

    #[test]
    fn invalid_sort_is_rejected() {
        let err = Config::parse("[search]\nsort = \"popularity\"").unwrap_err();
        assert!(matches!(err, HubError::Config(_)));
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let err = Config::load_from(Path::new("/nonexistent/hubsearch.toml")).unwrap_err();
        assert!(matches!(err, HubError::Io(_)));
    }
}
