use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CacheConfig {
    /// Override for the cache directory. Defaults to `~/.cache/shelfmark`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
        }
    }
}

fn default_profile() -> String {
    "Default".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GithubConfig {
    /// Default GitHub user for `shelf stars` when `--user` is not given.
    #[serde(default)]
    pub user: Option<String>,
    /// Ceiling on the number of starred-repository pages fetched per sync.
    /// Unset means unlimited.
    #[serde(default)]
    pub page_limit: Option<usize>,
}

impl Config {
    /// A default configuration for running without a config file.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.browser.profile.is_empty() {
        anyhow::bail!("browser.profile must not be empty");
    }

    if config.github.page_limit == Some(0) {
        anyhow::bail!("github.page_limit must be >= 1 when set");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_has_default_profile() {
        let config = Config::minimal();
        assert_eq!(config.browser.profile, "Default");
        assert!(config.cache.dir.is_none());
        assert!(config.github.page_limit.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("shelf.toml");
        std::fs::write(
            &path,
            r#"
[cache]
dir = "/tmp/shelf-cache"

[browser]
profile = "Profile 1"

[github]
user = "rwjblue"
page_limit = 3
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.cache.dir, Some(PathBuf::from("/tmp/shelf-cache")));
        assert_eq!(config.browser.profile, "Profile 1");
        assert_eq!(config.github.user.as_deref(), Some("rwjblue"));
        assert_eq!(config.github.page_limit, Some(3));
    }

    #[test]
    fn zero_page_limit_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("shelf.toml");
        std::fs::write(&path, "[github]\npage_limit = 0\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}
