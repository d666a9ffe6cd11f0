use serde::Deserialize;
use anyhow::{Context, Result};
use dotenvy::dotenv;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_file_size: default_max_file_size(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("SHEET_EXTRACTOR_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid SHEET_EXTRACTOR_PORT: {}", raw))?,
            None => defaults.port,
        };

        let max_file_size = match lookup("SHEET_EXTRACTOR_MAX_FILE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid SHEET_EXTRACTOR_MAX_FILE_SIZE: {}", raw))?,
            None => defaults.max_file_size,
        };

        Ok(Config {
            host: lookup("SHEET_EXTRACTOR_HOST").unwrap_or(defaults.host),
            port,
            max_file_size,
            log_filter: lookup("SHEET_EXTRACTOR_LOG").unwrap_or(defaults.log_filter),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn load_config() -> Result<Config> {
    Config::new()
}
