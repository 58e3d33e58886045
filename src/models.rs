//! Request and response models for the REST API.

use crate::validation::{FieldSpec, RequestSchema, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ============================================================================
// Documents
// ============================================================================

/// A named collection of holdings with an aggregate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    /// Record identifier.
    pub id: Uuid,
    /// Unique opaque link used to address the portfolio.
    pub link: String,
    /// Display name.
    pub name: String,
    /// Aggregate value in whole currency units.
    pub value: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A holding of one instrument within a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    /// Record identifier.
    pub id: Uuid,
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
    /// Number of shares held.
    pub num_shares: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Portfolio requests
// ============================================================================

/// Request to create a portfolio. The link is generated by the server.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreatePortfolioRequest {
    /// Display name.
    pub name: String,
    /// Starting value.
    pub value: f64,
}

impl RequestSchema for CreatePortfolioRequest {
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::string("name"), FieldSpec::number("value")];

    fn check(&self) -> Result<(), ValidationError> {
        check_amount("value", self.value)
    }
}

/// Request to update a portfolio. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdatePortfolioRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New value.
    #[serde(default)]
    pub value: Option<f64>,
}

impl RequestSchema for UpdatePortfolioRequest {
    const FIELDS: &'static [FieldSpec] = &[];
    const OPTIONAL: &'static [FieldSpec] =
        &[FieldSpec::string("name"), FieldSpec::number("value")];

    fn check(&self) -> Result<(), ValidationError> {
        match self.value {
            Some(value) => check_amount("value", value),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Security requests
// ============================================================================

/// Request to record a first purchase of a security.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecurityRequest {
    /// Link of the owning portfolio.
    pub link: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Purchase price; also seeds the current price.
    pub initial_price: f64,
    /// Number of shares bought.
    pub num_shares: i64,
}

impl RequestSchema for CreateSecurityRequest {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::string("link"),
        FieldSpec::string("symbol"),
        FieldSpec::string("name"),
        FieldSpec::number("initialPrice"),
        FieldSpec::integer("numShares"),
    ];

    fn check(&self) -> Result<(), ValidationError> {
        check_not_blank("link", &self.link)?;
        check_not_blank("symbol", &self.symbol)?;
        check_amount("initialPrice", self.initial_price)?;
        if self.num_shares < 0 {
            return Err(ValidationError::OutOfRange {
                field: "numShares".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Request to apply a purchase or sale to an existing holding.
///
/// `num_shares` is a signed delta added to the held count.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecurityRequest {
    /// Link of the owning portfolio.
    pub link: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Latest price; replaces the stored current price.
    pub current_price: f64,
    /// Shares bought (positive) or sold (negative).
    pub num_shares: i64,
}

impl RequestSchema for UpdateSecurityRequest {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::string("link"),
        FieldSpec::string("symbol"),
        FieldSpec::number("currentPrice"),
        FieldSpec::integer("numShares"),
    ];

    fn check(&self) -> Result<(), ValidationError> {
        check_amount("currentPrice", self.current_price)
    }
}

/// Body of a security delete request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DeleteSecurityRequest {
    /// Ticker symbol of the holding to remove.
    pub symbol: String,
}

impl RequestSchema for DeleteSecurityRequest {
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::string("symbol")];
}

fn check_amount(field: &str, amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            reason: "must be a non-negative amount".to_string(),
        });
    }
    Ok(())
}

fn check_not_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Search
// ============================================================================

/// Query string of the search endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Ticker to look up.
    pub symbol: Option<String>,
}

/// A quote returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
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
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    /// Matching quotes; the front end shows the first one.
    pub results: Vec<Quote>,
}

// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}
