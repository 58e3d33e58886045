//! Integration tests for the portfolio trading API.
//!
//! By default every test starts its own server in-process on an ephemeral
//! port, backed by the in-memory store and a static quote table. Set
//! `API_BASE_URL` to run the same tests against an external server instead
//! (listing tests then need `expose_listing` enabled there).

use portfolio_client::{ClientConfig, PortfolioClient};
use portfolio_trader_backend::api::create_router;
use portfolio_trader_backend::models::Quote;
use portfolio_trader_backend::search::SearchProvider;
use portfolio_trader_backend::state::AppState;
use std::sync::Arc;
use std::time::Duration;

/// Boxed error returned by the test helpers.
pub type TestError = Box<dyn std::error::Error + Send + Sync>;

/// Quotes served by the in-process server.
#[must_use]
pub fn test_quotes() -> Vec<Quote> {
    vec![
        Quote {
            symbol: "GME".to_string(),
            name: "GameStop Corp.".to_string(),
            last_price: 20.0,
        },
        Quote {
            symbol: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            last_price: 182.52,
        },
    ]
}

/// Starts a server on an ephemeral local port and returns its base URL.
///
/// The server runs on the current tokio runtime and stops with it.
///
/// # Errors
/// Returns error if the listener cannot be bound.
pub async fn spawn_server() -> Result<String, TestError> {
    let state = AppState::new()
        .with_listing(true)
        .with_search(SearchProvider::Static(test_quotes()));
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{}", addr))
}

/// Gets the API base URL from the environment, or spawns a local server.
///
/// # Errors
/// Returns error if a local server cannot be started.
pub async fn get_api_url() -> Result<String, TestError> {
    match std::env::var("API_BASE_URL") {
        Ok(url) => Ok(url),
        Err(_) => spawn_server().await,
    }
}

/// Creates a test client configured for the API.
///
/// # Errors
/// Returns error if the server cannot be reached or the client cannot be built.
pub async fn create_test_client() -> Result<PortfolioClient, TestError> {
    let client = PortfolioClient::new(ClientConfig {
        base_url: get_api_url().await?,
        timeout: Duration::from_secs(10),
    })?;
    Ok(client)
}

/// Generates a unique test symbol to avoid conflicts between tests.
#[must_use]
pub fn unique_symbol(prefix: &str) -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{}{}{}", prefix, ts, counter)
}
