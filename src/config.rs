use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::board::DEFAULT_PAGE_SIZE;

const DEFAULT_OWNER: &str = "kkhassou";
const DEFAULT_REPO: &str = "kanagawaken-yokohamashi-kanagawaku-issue";
const DEFAULT_OUTPUT_DIR: &str = "site";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub page_size: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub theme: Option<String>,
}

impl Config {
    /// Loads `path` when given, otherwise the per-user config file. A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn owner(&self) -> &str {
        self.owner.as_deref().unwrap_or(DEFAULT_OWNER)
    }

    pub fn repo(&self) -> &str {
        self.repo.as_deref().unwrap_or(DEFAULT_REPO)
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

fn config_path() -> PathBuf {
    config_dir().join("issueboard").join("config.toml")
}

fn config_dir() -> PathBuf {
    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&dir).to_path_buf();
    }

    if let Ok(home) = env::var("HOME") {
        return Path::new(&home).join(".config");
    }

    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::Config;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    #[test]
    fn defaults_point_at_fixed_repository() {
        let config = Config::default();
        assert_eq!(config.owner(), "kkhassou");
        assert_eq!(config.repo(), "kanagawaken-yokohamashi-kanagawaku-issue");
        assert_eq!(config.page_size(), 20);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.output_dir(), PathBuf::from("site"));
    }

    #[test]
    fn parses_overrides() {
        let input = r#"
            owner = "acme"
            repo = "board"
            page_size = 0
            request_timeout_secs = 5
            output_dir = "public"
            theme = "paper"
        "#;

        let config: Config = toml::from_str(input).expect("parse config");
        assert_eq!(config.owner(), "acme");
        assert_eq!(config.repo(), "board");
        assert_eq!(config.page_size(), 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.output_dir(), PathBuf::from("public"));
        assert_eq!(config.theme.as_deref(), Some("paper"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/issueboard/config.toml"))
            .expect("load");
        assert_eq!(config, Config::default());
    }
}
