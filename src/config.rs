//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::error::ConfigError;
use crate::shopping::SortBy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_VISION_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_SEARCH_KEY: &str = "RAPIDAPI_KEY";
pub const ENV_SEARCH_HOST: &str = "RAPIDAPI_HOST";

/// Settings resolved from the config file, the environment and CLI flags, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Market searched by default (us, in, uk, ...)
    #[serde(default = "default_country")]
    pub country: String,

    /// Sort directive forwarded to the search API
    #[serde(default)]
    pub sort_by: SortBy,

    /// Rendering of CLI results
    #[serde(default)]
    pub format: OutputFormat,

    /// Proxy URL (e.g., socks5://host:port) used for both APIs
    #[serde(default)]
    pub proxy: Option<String>,

    /// Maximum number of offers shown by the CLI
    #[serde(default)]
    pub max_results: Option<usize>,

    /// CLI only: hide offers below this price
    #[serde(default)]
    pub min_price: Option<f64>,

    /// CLI only: hide offers above this price
    #[serde(default)]
    pub max_price: Option<f64>,

    #[serde(default)]
    pub vision: VisionConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Vision model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_vision_model")]
    pub model: String,

    #[serde(default = "default_vision_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_vision_base_url")]
    pub base_url: String,
}

/// Shopping-search API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    /// Value of the `x-rapidapi-host` header
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_search_base_url")]
    pub base_url: String,
}

/// Web backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_country() -> String {
    "us".to_string()
}

fn default_vision_model() -> String {
    "claude-3-7-sonnet-20250219".to_string()
}

fn default_vision_max_tokens() -> u32 {
    200
}

fn default_vision_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_search_base_url() -> String {
    "https://real-time-product-search.p.rapidapi.com".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_vision_model(),
            max_tokens: default_vision_max_tokens(),
            base_url: default_vision_base_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { api_key: None, host: None, base_url: default_search_base_url() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: default_country(),
            sort_by: SortBy::BestMatch,
            format: OutputFormat::Table,
            proxy: None,
            max_results: None,
            min_price: None,
            max_price: None,
            vision: VisionConfig::default(),
            search: SearchConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Reads one TOML file. Keys it omits keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading config {}", path.display());

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;

        toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Loads `explicit_path` if given, otherwise the first existing file among
    /// `./shopscanner.toml` and `<config dir>/shopscanner/config.toml`, otherwise defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        match Self::candidate_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("shopscanner.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("shopscanner").join("config.toml"));
        }
        paths
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Some(key) = non_empty_var(ENV_VISION_KEY) {
            self.vision.api_key = Some(key);
        }

        if let Some(key) = non_empty_var(ENV_SEARCH_KEY) {
            self.search.api_key = Some(key);
        }

        if let Some(host) = non_empty_var(ENV_SEARCH_HOST) {
            self.search.host = Some(host);
        }

        if let Some(model) = non_empty_var("SHOPSCANNER_VISION_MODEL") {
            self.vision.model = model;
        }

        if let Some(country) = non_empty_var("SHOPSCANNER_COUNTRY") {
            self.country = country.to_lowercase();
        }

        if let Some(bind) = non_empty_var("SHOPSCANNER_BIND") {
            self.server.bind = bind;
        }

        if let Some(proxy) = non_empty_var("SHOPSCANNER_PROXY") {
            self.proxy = Some(proxy);
        }

        self
    }

    /// Returns the vision API key or a startup error naming the missing variable.
    pub fn vision_api_key(&self) -> Result<&str, ConfigError> {
        self.vision
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential { name: "vision API key", env: ENV_VISION_KEY })
    }

    /// Returns the search API key and host, or a startup error naming what is missing.
    pub fn search_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let key = self
            .search
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential { name: "search API key", env: ENV_SEARCH_KEY })?;

        let host = self
            .search
            .host
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingCredential { name: "search API host", env: ENV_SEARCH_HOST })?;

        Ok((key, host))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// How command results are rendered on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [OutputFormat::Table, OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Csv]
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .or_else(|| s.eq_ignore_ascii_case("md").then_some(OutputFormat::Markdown))
            .ok_or_else(|| format!("Unknown output format '{}' (table, json, markdown, csv)", s))
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.country, "us");
        assert_eq!(config.sort_by, SortBy::BestMatch);
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.proxy.is_none());
        assert!(config.max_results.is_none());
        assert_eq!(config.vision.model, "claude-3-7-sonnet-20250219");
        assert_eq!(config.vision.max_tokens, 200);
        assert_eq!(config.vision.base_url, "https://api.anthropic.com");
        assert_eq!(config.search.base_url, "https://real-time-product-search.p.rapidapi.com");
        assert_eq!(config.server.bind, "0.0.0.0:5000");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown output format"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn test_config_from_toml_sections() {
        let toml = r#"
            country = "in"
            sort_by = "LOWEST_PRICE"
            format = "json"
            max_results = 10

            [vision]
            api_key = "sk-test"
            model = "claude-other"

            [search]
            api_key = "rapid-test"
            host = "search.example"

            [server]
            bind = "127.0.0.1:8080"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.country, "in");
        assert_eq!(config.sort_by, SortBy::LowestPrice);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.max_results, Some(10));
        assert_eq!(config.vision.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.vision.model, "claude-other");
        assert_eq!(config.vision.max_tokens, 200);
        assert_eq!(config.search.host.as_deref(), Some("search.example"));
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            country = "uk"
            min_price = 5.0
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.country, "uk");
        assert_eq!(config.min_price, Some(5.0));
    }

    #[test]
    fn test_config_from_file_not_found() {
        let err = Config::from_file("/nonexistent/path/config.toml").unwrap_err().to_string();
        assert!(err.contains("Cannot read config"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let err = Config::from_file(file.path()).unwrap_err().to_string();
        assert!(err.contains("Invalid config"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"country = "de""#).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.country, "de");
    }

    #[test]
    fn test_config_with_env() {
        let names = [
            ENV_VISION_KEY,
            ENV_SEARCH_KEY,
            ENV_SEARCH_HOST,
            "SHOPSCANNER_COUNTRY",
            "SHOPSCANNER_BIND",
        ];
        let originals: Vec<Option<String>> =
            names.iter().map(|n| std::env::var(n).ok()).collect();

        std::env::set_var(ENV_VISION_KEY, "sk-env");
        std::env::set_var(ENV_SEARCH_KEY, "rapid-env");
        std::env::set_var(ENV_SEARCH_HOST, "host.env");
        std::env::set_var("SHOPSCANNER_COUNTRY", "IN");
        std::env::set_var("SHOPSCANNER_BIND", "");

        let config = Config::default().with_env();
        assert_eq!(config.vision_api_key().unwrap(), "sk-env");
        assert_eq!(config.search_credentials().unwrap(), ("rapid-env", "host.env"));
        assert_eq!(config.country, "in");
        // Empty values are ignored
        assert_eq!(config.server.bind, "0.0.0.0:5000");

        for (name, original) in names.iter().zip(originals) {
            match original {
                Some(v) => std::env::set_var(name, v),
                None => std::env::remove_var(name),
            }
        }
    }

    #[test]
    fn test_missing_credentials() {
        let config = Config::default();

        let err = config.vision_api_key().unwrap_err();
        assert!(err.to_string().contains(ENV_VISION_KEY));

        let err = config.search_credentials().unwrap_err();
        assert!(err.to_string().contains(ENV_SEARCH_KEY));

        let mut config = Config::default();
        config.search.api_key = Some("key".to_string());
        let err = config.search_credentials().unwrap_err();
        assert!(err.to_string().contains(ENV_SEARCH_HOST));

        config.vision.api_key = Some(String::new());
        assert!(config.vision_api_key().is_err());
    }
}
