//! Document storage for portfolios and securities.
//!
//! [`Store`] dispatches to PostgreSQL when a database is configured and to an
//! in-process map otherwise. Both backends apply share-count changes as a
//! single atomic operation, so concurrent trades on the same holding never
//! lose an update.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::models::{
    CreateSecurityRequest, Portfolio, Security, UpdatePortfolioRequest, UpdateSecurityRequest,
};

/// Storage error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with the same key already exists.
    #[error("already exists: {0}")]
    Conflict(String),

    /// No record matched.
    #[error("not found: {0}")]
    NotFound(String),

    /// A trade would leave a holding with fewer than zero shares.
    #[error("{symbol} has only {available} shares")]
    NegativeShares {
        /// Ticker symbol of the holding.
        symbol: String,
        /// Shares currently held.
        available: i64,
    },

    /// A trade would push a holding past the largest representable count.
    #[error("{symbol} share count out of range")]
    ShareOverflow {
        /// Ticker symbol of the holding.
        symbol: String,
    },

    /// The database rejected the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage backend.
#[derive(Clone)]
pub enum Store {
    /// In-process storage, lost on restart.
    Memory(MemoryStore),
    /// PostgreSQL storage.
    Postgres(PostgresStore),
}

impl Store {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn memory() -> Self {
        Store::Memory(MemoryStore::default())
    }

    /// Short backend name for logs.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Postgres(_) => "postgres",
        }
    }

    // ========================================================================
    // Portfolios
    // ========================================================================

    /// Returns every portfolio, oldest first.
    ///
    /// # Errors
    /// Returns [`StoreError::Database`] if the query fails.
    pub async fn list_portfolios(&self) -> Result<Vec<Portfolio>, StoreError> {
        match self {
            Store::Memory(store) => Ok(store.list_portfolios()),
            Store::Postgres(store) => store.list_portfolios().await,
        }
    }

    /// Looks up a portfolio by link.
    ///
    /// # Errors
    /// Returns [`StoreError::Database`] if the query fails.
    pub async fn find_portfolio(&self, link: &str) -> Result<Option<Portfolio>, StoreError> {
        match self {
            Store::Memory(store) => Ok(store.find_portfolio(link)),
            Store::Postgres(store) => store.find_portfolio(link).await,
        }
    }

    /// Creates a portfolio with a freshly generated link.
    ///
    /// # Errors
    /// Returns [`StoreError::Database`] if the insert fails.
    pub async fn create_portfolio(&self, name: &str, value: f64) -> Result<Portfolio, StoreError> {
        match self {
            Store::Memory(store) => store.create_portfolio(name, value),
            Store::Postgres(store) => store.create_portfolio(name, value).await,
        }
    }

    /// Applies the present fields of `changes` to the portfolio at `link`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no portfolio has that link.
    pub async fn update_portfolio(
        &self,
        link: &str,
        changes: &UpdatePortfolioRequest,
    ) -> Result<Portfolio, StoreError> {
        match self {
            Store::Memory(store) => store.update_portfolio(link, changes),
            Store::Postgres(store) => store.update_portfolio(link, changes).await,
        }
    }

    /// Deletes a portfolio and the holdings that share its link.
    ///
    /// Returns whether a portfolio was removed.
    ///
    /// # Errors
    /// Returns [`StoreError::Database`] if the delete fails.
    pub async fn delete_portfolio(&self, link: &str) -> Result<bool, StoreError> {
        match self {
            Store::Memory(store) => Ok(store.delete_portfolio(link)),
            Store::Postgres(store) => store.delete_portfolio(link).await,
        }
    }

    // ========================================================================
    // Securities
    // ========================================================================

    /// Returns every holding, oldest first.
    ///
    /// # Errors
    /// Returns [`StoreError::Database`] if the query fails.
    pub async fn list_securities(&self) -> Result<Vec<Security>, StoreError> {
        match self {
            Store::Memory(store) => Ok(store.list_securities()),
            Store::Postgres(store) => store.list_securities().await,
        }
    }

    /// Returns the holdings of the portfolio at `link`, oldest first.
    ///
    /// # Errors
    /// Returns [`StoreError::Database`] if the query fails.
    pub async fn find_securities(&self, link: &str) -> Result<Vec<Security>, StoreError> {
        match self {
            Store::Memory(store) => Ok(store.find_securities(link)),
            Store::Postgres(store) => store.find_securities(link).await,
        }
    }

    /// Records a first purchase. The current price starts at the initial price.
    ///
    /// # Errors
    /// Returns [`StoreError::Conflict`] if the portfolio already holds the symbol.
    pub async fn create_security(
        &self,
        request: &CreateSecurityRequest,
    ) -> Result<Security, StoreError> {
        match self {
            Store::Memory(store) => store.create_security(request),
            Store::Postgres(store) => store.create_security(request).await,
        }
    }

    /// Adds `trade.num_shares` to the holding and replaces its current price.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if there is no such holding and
    /// [`StoreError::NegativeShares`] if the result would drop below zero.
    pub async fn apply_trade(&self, trade: &UpdateSecurityRequest) -> Result<Security, StoreError> {
        match self {
            Store::Memory(store) => store.apply_trade(trade),
            Store::Postgres(store) => store.apply_trade(trade).await,
        }
    }

    /// Deletes the holding matching both `link` and `symbol`.
    ///
    /// Returns whether a record was removed.
    ///
    /// # Errors
    /// Returns [`StoreError::Database`] if the delete fails.
    pub async fn delete_security(&self, link: &str, symbol: &str) -> Result<bool, StoreError> {
        match self {
            Store::Memory(store) => Ok(store.delete_security(link, symbol)),
            Store::Postgres(store) => store.delete_security(link, symbol).await,
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::memory()
    }
}
