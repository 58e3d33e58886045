//! Security search backing the `/api` endpoint.
//!
//! The front end looks tickers up through the backend rather than calling a
//! market data vendor directly. Quotes come either from a fixed list in the
//! configuration or from an upstream quote API.

use crate::config::{QuoteConfig, SearchConfig, SearchProviderKind};
use crate::models::{Quote, SearchResponse};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Search error types.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The upstream request failed.
    #[error("quote request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream query string could not be encoded.
    #[error("failed to encode quote query: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// The upstream answered with a non-success status.
    #[error("quote service returned {0}")]
    Status(u16),

    /// The provider is misconfigured.
    #[error("search misconfigured: {0}")]
    Config(String),
}

/// Source of quotes for the search endpoint.
#[derive(Debug, Clone)]
pub enum SearchProvider {
    /// Fixed quote list, matched case-insensitively on symbol.
    Static(Vec<Quote>),
    /// Remote quote API returning `{"results": [...]}`.
    Upstream {
        /// Shared HTTP client.
        client: reqwest::Client,
        /// Endpoint URL, without query string.
        base_url: String,
        /// API key passed as the `apikey` query parameter.
        api_key: Option<String>,
    },
}

#[derive(Serialize)]
struct UpstreamQuery<'a> {
    symbols: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    apikey: Option<&'a str>,
}

impl SearchProvider {
    /// Builds the provider described by the configuration.
    ///
    /// # Errors
    /// Returns error if the upstream provider lacks a base URL or the HTTP
    /// client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        match config.provider {
            SearchProviderKind::Static => Ok(SearchProvider::Static(
                config.quotes.iter().map(QuoteConfig::to_quote).collect(),
            )),
            SearchProviderKind::Upstream => {
                let base_url = config.base_url.clone().ok_or_else(|| {
                    SearchError::Config("search.base_url is required for upstream".to_string())
                })?;
                let client = reqwest::Client::builder()
                    .timeout(Duration::from_millis(config.timeout_ms))
                    .build()?;
                Ok(SearchProvider::Upstream {
                    client,
                    base_url,
                    api_key: config.api_key.clone(),
                })
            }
        }
    }

    /// Looks up quotes for `symbol`.
    ///
    /// # Errors
    /// Returns error if the query cannot be encoded or the upstream request
    /// fails.
    pub async fn search(&self, symbol: &str) -> Result<SearchResponse, SearchError> {
        match self {
            SearchProvider::Static(quotes) => {
                let results: Vec<Quote> = quotes
                    .iter()
                    .filter(|q| q.symbol.eq_ignore_ascii_case(symbol))
                    .cloned()
                    .collect();
                debug!("static search for {} matched {}", symbol, results.len());
                Ok(SearchResponse { results })
            }
            SearchProvider::Upstream {
                client,
                base_url,
                api_key,
            } => {
                let params = serde_urlencoded::to_string(UpstreamQuery {
                    symbols: symbol,
                    apikey: api_key.as_deref(),
                })?;
                let url = format!("{}?{}", base_url, params);

                let resp = client.get(&url).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    warn!("quote service answered {} for {}", status, symbol);
                    return Err(SearchError::Status(status.as_u16()));
                }
                let body: SearchResponse = resp.json().await?;
                Ok(body)
            }
        }
    }
}

impl Default for SearchProvider {
    fn default() -> Self {
        SearchProvider::Static(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SearchProvider {
        SearchProvider::Static(vec![
            Quote {
                symbol: "GME".to_string(),
                name: "GameStop Corp.".to_string(),
                last_price: 20.0,
            },
            Quote {
                symbol: "AAPL".to_string(),
                name: "Apple Inc.".to_string(),
                last_price: 180.25,
            },
        ])
    }

    #[tokio::test]
    async fn test_static_search_case_insensitive() {
        let response = provider().search("gme").await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].symbol, "GME");
    }

    #[tokio::test]
    async fn test_static_search_no_match() {
        let response = provider().search("TSLA").await.unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_upstream_requires_base_url() {
        let config = SearchConfig {
            provider: SearchProviderKind::Upstream,
            base_url: None,
            ..SearchConfig::default()
        };
        assert!(matches!(
            SearchProvider::from_config(&config),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn test_upstream_query_encoding() {
        let params = serde_urlencoded::to_string(UpstreamQuery {
            symbols: "BRK.B",
            apikey: Some("k&y"),
        })
        .unwrap();
        assert_eq!(params, "symbols=BRK.B&apikey=k%26y");
    }

    #[test]
    fn test_query_encoding_failure_is_an_error() {
        let err = serde_urlencoded::to_string(vec![1]).unwrap_err();
        let error = SearchError::from(err);
        assert!(matches!(error, SearchError::Encode(_)));
        assert!(error.to_string().starts_with("failed to encode quote query"));
    }
}
