//! Security (holding) handlers.

use crate::api::extract::JsonBody;
use crate::error::ApiError;
use crate::models::{
    CreateSecurityRequest, DeleteSecurityRequest, Security, UpdateSecurityRequest,
};
use crate::state::AppState;
use crate::validation::RequestSchema;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{error, info};


/// List every holding. Development surface, disabled unless
/// `server.expose_listing` is set.
#[utoipa::path(
    get,
    path = "/security",
    responses(
        (status = 200, description = "All holdings", body = Vec<Security>),
        (status = 404, description = "Listing disabled")
    ),
    tag = "Securities"
)]
pub async fn list_securities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Security>>, ApiError> {
    if !state.config.server.expose_listing {
        return Err(ApiError::NotFound("security listing is disabled".into()));
    }

    let securities = state.store.list_securities().await?;
    Ok(Json(securities))
}

/// Get the holdings of a portfolio.
///
/// An unknown link yields an empty list; only a failed lookup is a 404.
#[utoipa::path(
    get,
    path = "/security/{link}",
    params(
        ("link" = String, Path, description = "Portfolio link")
    ),
    responses(
        (status = 200, description = "Holdings of the portfolio", body = Vec<Security>),
        (status = 404, description = "Lookup failed")
    ),
    tag = "Securities"
)]
pub async fn get_securities(
    State(state): State<Arc<AppState>>,
    Path(link): Path<String>,
) -> Result<Json<Vec<Security>>, ApiError> {
    match state.store.find_securities(&link).await {
        Ok(securities) => Ok(Json(securities)),
        Err(e) => {
            error!("lookup of securities for {} failed: {}", link, e);
            Err(ApiError::NotFound(format!("securities for {}", link)))
        }
    }
}

/// Record the first purchase of a security.
#[utoipa::path(
    post,
    path = "/security",
    request_body = CreateSecurityRequest,
    responses(
        (status = 200, description = "Holding created", body = Security),
        (status = 400, description = "Missing or invalid field"),
        (status = 409, description = "Portfolio already holds the symbol"),
        (status = 500, description = "Write failed")
    ),
    tag = "Securities"
)]
pub async fn create_security(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> Result<Json<Security>, ApiError> {
    let request = CreateSecurityRequest::parse(body)?;
    let security = state.store.create_security(&request).await?;

    info!(
        "Created holding {} x{} in portfolio {}",
        security.symbol, security.num_shares, security.link
    );
    Ok(Json(security))
}

/// Apply a purchase or sale to a holding.
///
/// `numShares` is a signed delta; `currentPrice` replaces the stored price.
#[utoipa::path(
    put,
    path = "/security",
    request_body = UpdateSecurityRequest,
    responses(
        (status = 200, description = "Holding updated", body = Security),
        (status = 400, description = "Invalid field or share count would go negative"),
        (status = 404, description = "No such holding"),
        (status = 500, description = "Write failed")
    ),
    tag = "Securities"
)]
pub async fn update_security(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> Result<Json<Security>, ApiError> {
    let trade = UpdateSecurityRequest::parse(body)?;
    let security = state.store.apply_trade(&trade).await?;

    info!(
        "Applied {:+} shares of {} in portfolio {}, now {}",
        trade.num_shares, security.symbol, security.link, security.num_shares
    );
    Ok(Json(security))
}

/// Delete the holding matching the path link and the body symbol.
///
/// Responds 204 whether or not a holding existed.
#[utoipa::path(
    delete,
    path = "/security/{link}",
    params(
        ("link" = String, Path, description = "Portfolio link")
    ),
    request_body = DeleteSecurityRequest,
    responses(
        (status = 204, description = "Holding removed"),
        (status = 400, description = "Missing symbol"),
        (status = 500, description = "Delete failed")
    ),
    tag = "Securities"
)]
pub async fn delete_security(
    State(state): State<Arc<AppState>>,
    Path(link): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<StatusCode, ApiError> {
    let request = DeleteSecurityRequest::parse(body)?;
    let removed = state.store.delete_security(&link, &request.symbol).await?;

    info!(
        "Delete of {} in portfolio {}: {}",
        request.symbol,
        link,
        if removed { "removed" } else { "no such holding" }
    );
    Ok(StatusCode::NO_CONTENT)
}
