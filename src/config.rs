//! Configuration module for loading and parsing TOML configuration files.

use crate::models::Quote;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Security search configuration.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
    /// Serve the list-everything routes (`GET /portfolio`, `GET /security`);
    /// they answer 404 otherwise. Development only.
    pub expose_listing: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            expose_listing: false,
        }
    }
}

/// Database configuration. Without a URL the in-memory store is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// Apply pending migrations at startup.
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            run_migrations: true,
        }
    }
}

/// Which quote source backs the search endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchProviderKind {
    /// Quotes listed in the configuration.
    #[default]
    Static,
    /// Remote quote API.
    Upstream,
}

/// Security search configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quote source.
    pub provider: SearchProviderKind,
    /// Upstream endpoint URL.
    pub base_url: Option<String>,
    /// Upstream API key.
    pub api_key: Option<String>,
    /// Upstream request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Quotes served by the static provider.
    pub quotes: Vec<QuoteConfig>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProviderKind::Static,
            base_url: None,
            api_key: None,
            timeout_ms: 5000,
            quotes: Vec::new(),
        }
    }
}

/// A quote served by the static search provider.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
    /// Ticker symbol.
    pub symbol: String,
    /// Instrument name.
    pub name: String,
    /// Last traded price in dollars.
    pub last_price: f64,
}

impl QuoteConfig {
    /// Converts to the API quote type.
    #[must_use]
    pub fn to_quote(&self) -> Quote {
        Quote {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            last_price: self.last_price,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `HOST`, `PORT` and `DATABASE_URL` overrides.
    ///
    /// # Errors
    /// Returns error if `PORT` is not a valid port number.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT is not a port: {}", port)))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        self.validate()
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::InvalidValue(
                "server host cannot be empty".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database max_connections must be positive".to_string(),
            ));
        }

        if self.search.provider == SearchProviderKind::Upstream && self.search.base_url.is_none() {
            return Err(ConfigError::InvalidValue(
                "search base_url is required for the upstream provider".to_string(),
            ));
        }

        for quote in &self.search.quotes {
            if quote.symbol.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "quote symbol cannot be empty".to_string(),
                ));
            }
            if !quote.last_price.is_finite() || quote.last_price <= 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "quote {} last_price must be positive",
                    quote.symbol
                )));
            }
        }

        Ok(())
    }
}
