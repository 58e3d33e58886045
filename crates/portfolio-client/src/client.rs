//! HTTP client for the portfolio API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;
use url::Url;

#[cfg(test)]
mod tests;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:8080").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the portfolio trading API.
#[derive(Debug, Clone)]
pub struct PortfolioClient {
    client: Client,
    base_url: String,
}

impl PortfolioClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Url::parse(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Health & Search
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Looks up quotes for a ticker.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn search(&self, symbol: &str) -> Result<SearchResponse, Error> {
        let query = SearchQuery {
            symbol: symbol.to_string(),
        };
        let params = serde_urlencoded::to_string(&query)
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;
        let url = format!("{}/api?{}", self.base_url, params);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Portfolios
    // ========================================================================

    /// Lists all portfolios. Only answered when the server exposes listings.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_portfolios(&self) -> Result<Vec<Portfolio>, Error> {
        let url = format!("{}/portfolio", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Gets a portfolio by link.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_portfolio(&self, link: &str) -> Result<Portfolio, Error> {
        let url = format!("{}/portfolio/{}", self.base_url, link);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Creates a portfolio.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn create_portfolio(
        &self,
        request: &CreatePortfolioRequest,
    ) -> Result<Portfolio, Error> {
        let url = format!("{}/portfolio", self.base_url);
        let resp = self.client.post(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    /// Updates a portfolio.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn update_portfolio(
        &self,
        link: &str,
        request: &UpdatePortfolioRequest,
    ) -> Result<Portfolio, Error> {
        let url = format!("{}/portfolio/{}", self.base_url, link);
        let resp = self.client.put(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    /// Deletes a portfolio and its holdings.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn delete_portfolio(&self, link: &str) -> Result<(), Error> {
        let url = format!("{}/portfolio/{}", self.base_url, link);
        let resp = self.client.delete(&url).send().await?;
        self.handle_empty_response(resp).await
    }

    // ========================================================================
    // Securities
    // ========================================================================

    /// Lists all holdings. Only answered when the server exposes listings.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_securities(&self) -> Result<Vec<Security>, Error> {
        let url = format!("{}/security", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Gets the holdings of a portfolio. An unknown link yields an empty list.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_securities(&self, link: &str) -> Result<Vec<Security>, Error> {
        let url = format!("{}/security/{}", self.base_url, link);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Records a first purchase.
    ///
    /// # Errors
    /// Returns [`Error::Conflict`] if the portfolio already holds the symbol.
    pub async fn create_security(
        &self,
        request: &CreateSecurityRequest,
    ) -> Result<Security, Error> {
        let url = format!("{}/security", self.base_url);
        let resp = self.client.post(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    /// Applies a purchase or sale delta to a holding.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn update_security(
        &self,
        request: &UpdateSecurityRequest,
    ) -> Result<Security, Error> {
        let url = format!("{}/security", self.base_url);
        let resp = self.client.put(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    /// Removes a holding.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn delete_security(&self, link: &str, symbol: &str) -> Result<(), Error> {
        let url = format!("{}/security/{}", self.base_url, link);
        let body = DeleteSecurityRequest {
            symbol: symbol.to_string(),
        };
        let resp = self.client.delete(&url).json(&body).send().await?;
        self.handle_empty_response(resp).await
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(status_error(status.as_u16(), text))
        }
    }

    async fn handle_empty_response(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();

        if status.is_success() {
            Ok(())
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(status_error(status.as_u16(), text))
        }
    }
}

/// Maps a non-success status and its body to a client error.
pub(crate) fn status_error(status: u16, message: String) -> Error {
    match status {
        404 => Error::NotFound(message),
        409 => Error::Conflict(message),
        _ => Error::Api { status, message },
    }
}
