//! Portfolio Trader Backend Server
//!
//! REST API server for the portfolio trading demo.

use portfolio_trader_backend::api::create_router;
use portfolio_trader_backend::config::Config;
use portfolio_trader_backend::db::DatabasePool;
use portfolio_trader_backend::state::AppState;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use portfolio_trader_backend::models::{
    CreatePortfolioRequest, CreateSecurityRequest, DeleteSecurityRequest, HealthResponse,
    Portfolio, Quote, SearchResponse, Security, UpdatePortfolioRequest, UpdateSecurityRequest,
};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        portfolio_trader_backend::api::handlers::health_check,
        portfolio_trader_backend::api::handlers::search_securities,
        portfolio_trader_backend::api::portfolio::list_portfolios,
        portfolio_trader_backend::api::portfolio::get_portfolio,
        portfolio_trader_backend::api::portfolio::create_portfolio,
        portfolio_trader_backend::api::portfolio::update_portfolio,
        portfolio_trader_backend::api::portfolio::delete_portfolio,
        portfolio_trader_backend::api::security::list_securities,
        portfolio_trader_backend::api::security::get_securities,
        portfolio_trader_backend::api::security::create_security,
        portfolio_trader_backend::api::security::update_security,
        portfolio_trader_backend::api::security::delete_security,
    ),
    components(
        schemas(
            HealthResponse,
            SearchResponse,
            Quote,
            Portfolio,
            CreatePortfolioRequest,
            UpdatePortfolioRequest,
            Security,
            CreateSecurityRequest,
            UpdateSecurityRequest,
            DeleteSecurityRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Search", description = "Security search"),
        (name = "Portfolios", description = "Portfolio management"),
        (name = "Securities", description = "Holdings and simulated trades"),
    ),
    info(
        title = "Portfolio Trader API",
        version = "0.1.0",
        description = "REST API for portfolios and simulated security trades",
        license(name = "MIT"),
        contact(name = "Joaquin Bejar", email = "jb@taunais.com")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration, falling back to defaults when no file exists
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = if Path::new(&config_path).exists() {
        info!("Loading configuration from {}", config_path);
        Config::load(&config_path)?
    } else {
        warn!("Config file {} not found, using defaults", config_path);
        Config::default()
    };
    config.apply_env()?;

    // Connect to the database if one is configured
    let db = match config.database.url.as_deref() {
        Some(url) => {
            let db = DatabasePool::new(url, config.database.max_connections).await?;
            if config.database.run_migrations {
                db.run_migrations().await?;
            }
            Some(db)
        }
        None => {
            warn!("No database configured, holdings are kept in memory");
            None
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::from_config(config, db)?);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start the server
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
