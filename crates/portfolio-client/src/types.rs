//! Request and response types for the portfolio API.

use serde::{Deserialize, Serialize};


// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

// ============================================================================
// Search
// ============================================================================

/// Query string of the search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    /// Ticker to look up.
    pub symbol: String,
}

/// A quote returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Instrument name.
    pub name: String,
    /// Last traded price.
    pub last_price: f64,
}

/// Search endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Matching quotes.
    pub results: Vec<Quote>,
}

// ============================================================================
// Portfolios
// ============================================================================

/// A portfolio document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    /// Record identifier.
    pub id: String,
    /// Opaque link.
    pub link: String,
    /// Display name.
    pub name: String,
    /// Aggregate value.
    pub value: f64,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last modification timestamp (RFC 3339).
    pub updated_at: String,
}

/// Request to create a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePortfolioRequest {
    /// Display name.
    pub name: String,
    /// Starting value.
    pub value: f64,
}

/// Request to update a portfolio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePortfolioRequest {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

// ============================================================================
// Securities
// ============================================================================

/// A holding document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    /// Record identifier.
    pub id: String,
    /// Link of the owning portfolio.
    pub link: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Price at acquisition.
    pub initial_price: f64,
    /// Latest known price.
    pub current_price: f64,
    /// Shares held.
    pub num_shares: i64,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last modification timestamp (RFC 3339).
    pub updated_at: String,
}

/// Request to record a first purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecurityRequest {
    /// Link of the owning portfolio.
    pub link: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Purchase price.
    pub initial_price: f64,
    /// Shares bought.
    pub num_shares: i64,
}

/// Request to apply a purchase (positive) or sale (negative) delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecurityRequest {
    /// Link of the owning portfolio.
    pub link: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Latest price.
    pub current_price: f64,
    /// Share delta.
    pub num_shares: i64,
}

/// Body of a security delete request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSecurityRequest {
    /// Ticker symbol.
    pub symbol: String,
}
