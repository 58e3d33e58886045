//! Database row types.

use crate::models::{Portfolio, Security};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Column list shared by every `portfolios` query.
pub const PORTFOLIO_COLUMNS: &str = "id, link, name, value, created_at, updated_at";

/// Column list shared by every `securities` query.
pub const SECURITY_COLUMNS: &str =
    "id, link, symbol, name, initial_price, current_price, num_shares, created_at, updated_at";

/// Row of the `portfolios` table.
#[derive(Debug, Clone, FromRow)]
pub struct PortfolioRow {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique opaque link.
    pub link: String,
    /// Display name.
    pub name: String,
    /// Aggregate value.
    pub value: f64,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<PortfolioRow> for Portfolio {
    fn from(row: PortfolioRow) -> Self {
        Self {
            id: row.id,
            link: row.link,
            name: row.name,
            value: row.value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row of the `securities` table.
#[derive(Debug, Clone, FromRow)]
pub struct SecurityRow {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning portfolio link.
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
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<SecurityRow> for Security {
    fn from(row: SecurityRow) -> Self {
        Self {
            id: row.id,
            link: row.link,
            symbol: row.symbol,
            name: row.name,
            initial_price: row.initial_price,
            current_price: row.current_price,
            num_shares: row.num_shares,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
