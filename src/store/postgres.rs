//! PostgreSQL storage.

use super::StoreError;
use crate::db::{
    DatabasePool, PORTFOLIO_COLUMNS, PortfolioRow, SECURITY_COLUMNS, SecurityRow,
};
use crate::link::generate_link;
use crate::models::{
    CreateSecurityRequest, Portfolio, Security, UpdatePortfolioRequest, UpdateSecurityRequest,
};
use tracing::debug;
use uuid::Uuid;

/// Store backed by the `portfolios` and `securities` tables.
#[derive(Clone)]
pub struct PostgresStore {
    db: DatabasePool,
}

impl PostgresStore {
    /// Wraps a connected pool.
    #[must_use]
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    pub(crate) async fn list_portfolios(&self) -> Result<Vec<Portfolio>, StoreError> {
        let rows: Vec<PortfolioRow> = sqlx::query_as(&format!(
            "SELECT {} FROM portfolios ORDER BY created_at, id",
            PORTFOLIO_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Portfolio::from).collect())
    }

    pub(crate) async fn find_portfolio(&self, link: &str) -> Result<Option<Portfolio>, StoreError> {
        let row: Option<PortfolioRow> = sqlx::query_as(&format!(
            "SELECT {} FROM portfolios WHERE link = $1",
            PORTFOLIO_COLUMNS
        ))
        .bind(link)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Portfolio::from))
    }

    pub(crate) async fn create_portfolio(
        &self,
        name: &str,
        value: f64,
    ) -> Result<Portfolio, StoreError> {
        let row: PortfolioRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO portfolios (id, link, name, value)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PORTFOLIO_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(generate_link())
        .bind(name)
        .bind(value)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| unique_violation_to_conflict(e, "portfolio link"))?;

        Ok(row.into())
    }

    pub(crate) async fn update_portfolio(
        &self,
        link: &str,
        changes: &UpdatePortfolioRequest,
    ) -> Result<Portfolio, StoreError> {
        let row: Option<PortfolioRow> = sqlx::query_as(&format!(
            r#"
            UPDATE portfolios
            SET name = COALESCE($2, name),
                value = COALESCE($3, value),
                updated_at = NOW()
            WHERE link = $1
            RETURNING {}
            "#,
            PORTFOLIO_COLUMNS
        ))
        .bind(link)
        .bind(changes.name.as_deref())
        .bind(changes.value)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(Portfolio::from)
            .ok_or_else(|| StoreError::NotFound(format!("portfolio {}", link)))
    }

    pub(crate) async fn delete_portfolio(&self, link: &str) -> Result<bool, StoreError> {
        let mut tx = self.db.pool().begin().await?;

        let holdings = sqlx::query("DELETE FROM securities WHERE link = $1")
            .bind(link)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let removed = sqlx::query("DELETE FROM portfolios WHERE link = $1")
            .bind(link)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        debug!(
            "Deleted portfolio {} ({} rows) with {} holdings",
            link, removed, holdings
        );
        Ok(removed > 0)
    }

    pub(crate) async fn list_securities(&self) -> Result<Vec<Security>, StoreError> {
        let rows: Vec<SecurityRow> = sqlx::query_as(&format!(
            "SELECT {} FROM securities ORDER BY created_at, id",
            SECURITY_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Security::from).collect())
    }

    pub(crate) async fn find_securities(&self, link: &str) -> Result<Vec<Security>, StoreError> {
        let rows: Vec<SecurityRow> = sqlx::query_as(&format!(
            "SELECT {} FROM securities WHERE link = $1 ORDER BY created_at, id",
            SECURITY_COLUMNS
        ))
        .bind(link)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Security::from).collect())
    }

    pub(crate) async fn create_security(
        &self,
        request: &CreateSecurityRequest,
    ) -> Result<Security, StoreError> {
        let row: SecurityRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO securities (id, link, symbol, name, initial_price, current_price, num_shares)
            VALUES ($1, $2, $3, $4, $5, $5, $6)
            RETURNING {}
            "#,
            SECURITY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&request.link)
        .bind(&request.symbol)
        .bind(&request.name)
        .bind(request.initial_price)
        .bind(request.num_shares)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| {
            unique_violation_to_conflict(
                e,
                &format!(
                    "{} already held in portfolio {}",
                    request.symbol, request.link
                ),
            )
        })?;

        Ok(row.into())
    }

    pub(crate) async fn apply_trade(
        &self,
        trade: &UpdateSecurityRequest,
    ) -> Result<Security, StoreError> {
        // Single conditional statement: the increment and the non-negative
        // check happen under the row lock Postgres takes for the UPDATE.
        let row: Option<SecurityRow> = sqlx::query_as(&format!(
            r#"
            UPDATE securities
            SET num_shares = num_shares + $3,
                current_price = $4,
                updated_at = NOW()
            WHERE link = $1 AND symbol = $2 AND num_shares + $3 >= 0
            RETURNING {}
            "#,
            SECURITY_COLUMNS
        ))
        .bind(&trade.link)
        .bind(&trade.symbol)
        .bind(trade.num_shares)
        .bind(trade.current_price)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| out_of_range_to_overflow(e, &trade.symbol))?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        // Nothing updated: tell a missing holding apart from an oversell.
        let held: Option<i64> =
            sqlx::query_scalar("SELECT num_shares FROM securities WHERE link = $1 AND symbol = $2")
                .bind(&trade.link)
                .bind(&trade.symbol)
                .fetch_optional(self.db.pool())
                .await?;

        Err(match held {
            Some(available) => StoreError::NegativeShares {
                symbol: trade.symbol.clone(),
                available,
            },
            None => StoreError::NotFound(format!("{} in portfolio {}", trade.symbol, trade.link)),
        })
    }

    pub(crate) async fn delete_security(&self, link: &str, symbol: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM securities WHERE link = $1 AND symbol = $2")
            .bind(link)
            .bind(symbol)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn unique_violation_to_conflict(err: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(what.to_string());
    }
    StoreError::Database(err)
}

/// SQLSTATE raised when `num_shares + delta` leaves the BIGINT range.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

fn out_of_range_to_overflow(err: sqlx::Error, symbol: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE)
    {
        return StoreError::ShareOverflow {
            symbol: symbol.to_string(),
        };
    }
    StoreError::Database(err)
}
