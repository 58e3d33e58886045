//! Application state management.

use crate::config::Config;
use crate::db::DatabasePool;
use crate::search::{SearchError, SearchProvider};
use crate::store::{PostgresStore, Store};
use tracing::info;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Portfolio and security storage.
    pub store: Store,
    /// Quote source for the search endpoint.
    pub search: SearchProvider,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new application state with an in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Store::memory(),
            search: SearchProvider::default(),
            config: Config::default(),
        }
    }

    /// Creates a new application state from configuration.
    ///
    /// # Errors
    /// Returns error if the search provider cannot be built.
    pub fn from_config(config: Config, db: Option<DatabasePool>) -> Result<Self, SearchError> {
        let store = match db {
            Some(db) => Store::Postgres(PostgresStore::new(db)),
            None => Store::memory(),
        };
        let search = SearchProvider::from_config(&config.search)?;

        info!(
            "Using {} store, listing routes {}",
            store.backend_name(),
            if config.server.expose_listing {
                "enabled"
            } else {
                "disabled"
            }
        );

        Ok(Self {
            store,
            search,
            config,
        })
    }

    /// Replaces the search provider.
    #[must_use]
    pub fn with_search(mut self, search: SearchProvider) -> Self {
        self.search = search;
        self
    }

    /// Enables or disables the list-everything routes.
    #[must_use]
    pub fn with_listing(mut self, enabled: bool) -> Self {
        self.config.server.expose_listing = enabled;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
