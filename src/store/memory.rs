//! In-process storage backed by concurrent maps.

use super::StoreError;
use crate::link::generate_link;
use crate::models::{
    CreateSecurityRequest, Portfolio, Security, UpdatePortfolioRequest, UpdateSecurityRequest,
};
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use uuid::Uuid;

/// Key of a holding: portfolio link and ticker symbol.
type HoldingKey = (String, String);

/// In-memory store. Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    portfolios: Arc<DashMap<String, Portfolio>>,
    securities: Arc<DashMap<HoldingKey, Security>>,
}

impl MemoryStore {
    pub(crate) fn list_portfolios(&self) -> Vec<Portfolio> {
        let mut portfolios: Vec<Portfolio> =
            self.portfolios.iter().map(|e| e.value().clone()).collect();
        portfolios.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        portfolios
    }

    pub(crate) fn find_portfolio(&self, link: &str) -> Option<Portfolio> {
        self.portfolios.get(link).map(|p| p.value().clone())
    }

    pub(crate) fn create_portfolio(&self, name: &str, value: f64) -> Result<Portfolio, StoreError> {
        let now = Utc::now();
        let portfolio = Portfolio {
            id: Uuid::new_v4(),
            link: generate_link(),
            name: name.to_string(),
            value,
            created_at: now,
            updated_at: now,
        };

        match self.portfolios.entry(portfolio.link.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "portfolio {}",
                portfolio.link
            ))),
            Entry::Vacant(slot) => {
                slot.insert(portfolio.clone());
                Ok(portfolio)
            }
        }
    }

    pub(crate) fn update_portfolio(
        &self,
        link: &str,
        changes: &UpdatePortfolioRequest,
    ) -> Result<Portfolio, StoreError> {
        let mut portfolio = self
            .portfolios
            .get_mut(link)
            .ok_or_else(|| StoreError::NotFound(format!("portfolio {}", link)))?;

        if let Some(name) = &changes.name {
            portfolio.name = name.clone();
        }
        if let Some(value) = changes.value {
            portfolio.value = value;
        }
        portfolio.updated_at = Utc::now();

        Ok(portfolio.clone())
    }

    pub(crate) fn delete_portfolio(&self, link: &str) -> bool {
        let removed = self.portfolios.remove(link).is_some();
        self.securities.retain(|(holding_link, _), _| holding_link != link);
        removed
    }

    pub(crate) fn list_securities(&self) -> Vec<Security> {
        let mut securities: Vec<Security> =
            self.securities.iter().map(|e| e.value().clone()).collect();
        sort_securities(&mut securities);
        securities
    }

    pub(crate) fn find_securities(&self, link: &str) -> Vec<Security> {
        let mut securities: Vec<Security> = self
            .securities
            .iter()
            .filter(|e| e.key().0 == link)
            .map(|e| e.value().clone())
            .collect();
        sort_securities(&mut securities);
        securities
    }

    pub(crate) fn create_security(
        &self,
        request: &CreateSecurityRequest,
    ) -> Result<Security, StoreError> {
        let key = (request.link.clone(), request.symbol.clone());

        match self.securities.entry(key) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "{} already held in portfolio {}",
                request.symbol, request.link
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let security = Security {
                    id: Uuid::new_v4(),
                    link: request.link.clone(),
                    symbol: request.symbol.clone(),
                    name: request.name.clone(),
                    initial_price: request.initial_price,
                    current_price: request.initial_price,
                    num_shares: request.num_shares,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(security.clone());
                Ok(security)
            }
        }
    }

    pub(crate) fn apply_trade(&self, trade: &UpdateSecurityRequest) -> Result<Security, StoreError> {
        let key = (trade.link.clone(), trade.symbol.clone());

        // The shard write lock is held until `security` drops, so the
        // read-check-write below cannot interleave with another trade.
        let mut security = self.securities.get_mut(&key).ok_or_else(|| {
            StoreError::NotFound(format!("{} in portfolio {}", trade.symbol, trade.link))
        })?;

        let num_shares = security
            .num_shares
            .checked_add(trade.num_shares)
            .ok_or_else(|| StoreError::ShareOverflow {
                symbol: trade.symbol.clone(),
            })?;
        if num_shares < 0 {
            return Err(StoreError::NegativeShares {
                symbol: trade.symbol.clone(),
                available: security.num_shares,
            });
        }

        security.num_shares = num_shares;
        security.current_price = trade.current_price;
        security.updated_at = Utc::now();

        Ok(security.clone())
    }

    pub(crate) fn delete_security(&self, link: &str, symbol: &str) -> bool {
        self.securities
            .remove(&(link.to_string(), symbol.to_string()))
            .is_some()
    }
}

fn sort_securities(securities: &mut [Security]) {
    securities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn purchase(link: &str, symbol: &str, shares: i64) -> CreateSecurityRequest {
        CreateSecurityRequest {
            link: link.to_string(),
            symbol: symbol.to_string(),
            name: format!("{} Inc", symbol),
            initial_price: 20.0,
            num_shares: shares,
        }
    }

    fn trade(link: &str, symbol: &str, delta: i64, price: f64) -> UpdateSecurityRequest {
        UpdateSecurityRequest {
            link: link.to_string(),
            symbol: symbol.to_string(),
            current_price: price,
            num_shares: delta,
        }
    }

    #[test]
    fn test_create_security_seeds_current_price() {
        let store = MemoryStore::default();
        let security = store.create_security(&purchase("abc123", "GME", 5)).unwrap();

        assert_eq!(security.current_price, 20.0);
        assert_eq!(security.num_shares, 5);
    }

    #[test]
    fn test_create_security_duplicate_conflicts() {
        let store = MemoryStore::default();
        store.create_security(&purchase("abc123", "GME", 5)).unwrap();

        let result = store.create_security(&purchase("abc123", "GME", 1));
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        // Same symbol in another portfolio is a separate holding
        assert!(store.create_security(&purchase("other", "GME", 1)).is_ok());
    }

    #[test]
    fn test_apply_trade_adds_delta_and_replaces_price() {
        let store = MemoryStore::default();
        store.create_security(&purchase("abc123", "GME", 10)).unwrap();

        let updated = store.apply_trade(&trade("abc123", "GME", 3, 25.0)).unwrap();
        assert_eq!(updated.num_shares, 13);
        assert_eq!(updated.current_price, 25.0);
        assert_eq!(updated.initial_price, 20.0);
    }

    #[test]
    fn test_apply_trade_rejects_negative_result() {
        let store = MemoryStore::default();
        store.create_security(&purchase("abc123", "GME", 2)).unwrap();

        let result = store.apply_trade(&trade("abc123", "GME", -3, 25.0));
        assert!(matches!(
            result,
            Err(StoreError::NegativeShares { available: 2, .. })
        ));
        assert_eq!(store.find_securities("abc123")[0].num_shares, 2);
    }

    #[test]
    fn test_apply_trade_rejects_overflow() {
        let store = MemoryStore::default();
        store.create_security(&purchase("abc123", "GME", 10)).unwrap();

        let result = store.apply_trade(&trade("abc123", "GME", i64::MAX, 25.0));
        assert!(matches!(result, Err(StoreError::ShareOverflow { .. })));
        assert_eq!(store.find_securities("abc123")[0].num_shares, 10);
    }

    #[test]
    fn test_apply_trade_missing_holding() {
        let store = MemoryStore::default();
        let result = store.apply_trade(&trade("abc123", "GME", 1, 25.0));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_concurrent_trades_are_not_lost() {
        let store = MemoryStore::default();
        store.create_security(&purchase("abc123", "GME", 10)).unwrap();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || store.apply_trade(&trade("abc123", "GME", 3, 21.0)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        assert_eq!(store.find_securities("abc123")[0].num_shares, 160);
    }

    #[test]
    fn test_delete_security_requires_both_keys() {
        let store = MemoryStore::default();
        store.create_security(&purchase("abc123", "GME", 1)).unwrap();
        store.create_security(&purchase("abc123", "AMC", 1)).unwrap();

        assert!(!store.delete_security("abc123", "TSLA"));
        assert!(store.delete_security("abc123", "GME"));

        let remaining = store.find_securities("abc123");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].symbol, "AMC");
    }

    #[test]
    fn test_find_securities_unknown_link_is_empty() {
        let store = MemoryStore::default();
        assert!(store.find_securities("does-not-exist").is_empty());
    }

    #[test]
    fn test_portfolio_lifecycle() {
        let store = MemoryStore::default();
        let portfolio = store.create_portfolio("Ada Lovelace", 100_000.0).unwrap();
        assert_eq!(portfolio.link.len(), 32);

        let updated = store
            .update_portfolio(
                &portfolio.link,
                &UpdatePortfolioRequest {
                    name: None,
                    value: Some(90_000.0),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.value, 90_000.0);

        store
            .create_security(&purchase(&portfolio.link, "GME", 5))
            .unwrap();
        assert!(store.delete_portfolio(&portfolio.link));
        assert!(store.find_portfolio(&portfolio.link).is_none());
        assert!(store.find_securities(&portfolio.link).is_empty());
    }

    #[test]
    fn test_update_unknown_portfolio() {
        let store = MemoryStore::default();
        let result = store.update_portfolio("nope", &UpdatePortfolioRequest::default());
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
