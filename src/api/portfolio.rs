//! Portfolio handlers.

use crate::api::extract::JsonBody;
use crate::error::ApiError;
use crate::models::{CreatePortfolioRequest, Portfolio, UpdatePortfolioRequest};
use crate::state::AppState;
use crate::validation::RequestSchema;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{error, info};


/// List every portfolio. Development surface, disabled unless
/// `server.expose_listing` is set.
#[utoipa::path(
    get,
    path = "/portfolio",
    responses(
        (status = 200, description = "All portfolios", body = Vec<Portfolio>),
        (status = 404, description = "Listing disabled")
    ),
    tag = "Portfolios"
)]
pub async fn list_portfolios(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Portfolio>>, ApiError> {
    if !state.config.server.expose_listing {
        return Err(ApiError::NotFound("portfolio listing is disabled".into()));
    }

    let portfolios = state.store.list_portfolios().await?;
    Ok(Json(portfolios))
}

/// Get a portfolio by link.
#[utoipa::path(
    get,
    path = "/portfolio/{link}",
    params(
        ("link" = String, Path, description = "Portfolio link")
    ),
    responses(
        (status = 200, description = "Portfolio", body = Portfolio),
        (status = 404, description = "Unknown link or lookup failed")
    ),
    tag = "Portfolios"
)]
pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Path(link): Path<String>,
) -> Result<Json<Portfolio>, ApiError> {
    let found = state.store.find_portfolio(&link).await.map_err(|e| {
        error!("lookup of portfolio {} failed: {}", link, e);
        ApiError::NotFound(format!("portfolio {}", link))
    })?;

    found
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("portfolio {}", link)))
}

/// Create a portfolio. The link is generated by the server.
#[utoipa::path(
    post,
    path = "/portfolio",
    request_body = CreatePortfolioRequest,
    responses(
        (status = 200, description = "Portfolio created", body = Portfolio),
        (status = 400, description = "Missing or invalid field"),
        (status = 500, description = "Write failed")
    ),
    tag = "Portfolios"
)]
pub async fn create_portfolio(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> Result<Json<Portfolio>, ApiError> {
    let request = CreatePortfolioRequest::parse(body)?;
    let portfolio = state
        .store
        .create_portfolio(&request.name, request.value)
        .await?;

    info!("Created portfolio {} ({})", portfolio.link, portfolio.name);
    Ok(Json(portfolio))
}

/// Update a portfolio's name and/or value.
#[utoipa::path(
    put,
    path = "/portfolio/{link}",
    params(
        ("link" = String, Path, description = "Portfolio link")
    ),
    request_body = UpdatePortfolioRequest,
    responses(
        (status = 200, description = "Portfolio updated", body = Portfolio),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Unknown link")
    ),
    tag = "Portfolios"
)]
pub async fn update_portfolio(
    State(state): State<Arc<AppState>>,
    Path(link): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<Portfolio>, ApiError> {
    let changes = UpdatePortfolioRequest::parse(body)?;
    let portfolio = state.store.update_portfolio(&link, &changes).await?;
    Ok(Json(portfolio))
}

/// Delete a portfolio together with its holdings.
#[utoipa::path(
    delete,
    path = "/portfolio/{link}",
    params(
        ("link" = String, Path, description = "Portfolio link")
    ),
    responses(
        (status = 204, description = "Portfolio removed"),
        (status = 500, description = "Delete failed")
    ),
    tag = "Portfolios"
)]
pub async fn delete_portfolio(
    State(state): State<Arc<AppState>>,
    Path(link): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_portfolio(&link).await? {
        info!("Deleted portfolio {}", link);
    }
    Ok(StatusCode::NO_CONTENT)
}
