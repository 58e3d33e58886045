//! Unit tests for error module.

use super::*;
use axum::body::to_bytes;

// ============================================================================
// ErrorResponse Tests
// ============================================================================

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse {
        error: "Something went wrong".to_string(),
        code: "INTERNAL_ERROR".to_string(),
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"error\":\"Something went wrong\""));
    assert!(json.contains("\"code\":\"INTERNAL_ERROR\""));
}

// ============================================================================
// ApiError Display Tests
// ============================================================================

#[test]
fn test_api_error_validation_display() {
    let error = ApiError::from(ValidationError::Missing {
        field: "numShares".to_string(),
    });
    assert_eq!(format!("{}", error), "Invalid field: numShares is required");
}

#[test]
fn test_api_error_not_found_display() {
    let error = ApiError::NotFound("portfolio abc".to_string());
    assert_eq!(format!("{}", error), "Not found: portfolio abc");
}

#[test]
fn test_api_error_conflict_display() {
    let error = ApiError::Conflict("GME already held".to_string());
    assert_eq!(format!("{}", error), "Conflict: GME already held");
}

// ============================================================================
// Status Mapping Tests
// ============================================================================

#[test]
fn test_status_codes() {
    let cases = [
        (
            ApiError::Validation(ValidationError::Missing {
                field: "link".to_string(),
            }),
            StatusCode::BAD_REQUEST,
            "INVALID_FIELD",
        ),
        (
            ApiError::InvalidRequest("x".to_string()),
            StatusCode::BAD_REQUEST,
            "INVALID_REQUEST",
        ),
        (
            ApiError::NotFound("x".to_string()),
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
        ),
        (
            ApiError::Conflict("x".to_string()),
            StatusCode::CONFLICT,
            "CONFLICT",
        ),
        (
            ApiError::Database("x".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATABASE_ERROR",
        ),
        (
            ApiError::Upstream("x".to_string()),
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_ERROR",
        ),
        (
            ApiError::Internal("x".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
        ),
    ];

    for (error, status, code) in cases {
        assert_eq!(error.status_and_code(), (status, code));
    }
}

#[test]
fn test_store_error_conversion() {
    let error = ApiError::from(StoreError::NegativeShares {
        symbol: "GME".to_string(),
        available: 2,
    });
    assert!(matches!(error, ApiError::InvalidRequest(_)));

    let error = ApiError::from(StoreError::ShareOverflow {
        symbol: "GME".to_string(),
    });
    assert_eq!(error.status_and_code().0, StatusCode::BAD_REQUEST);

    let error = ApiError::from(StoreError::Conflict("GME".to_string()));
    assert!(matches!(error, ApiError::Conflict(_)));

    let error = ApiError::from(StoreError::Database(sqlx::Error::RowNotFound));
    assert!(matches!(error, ApiError::Database(_)));
}

// ============================================================================
// IntoResponse Tests
// ============================================================================

#[tokio::test]
async fn test_database_error_detail_not_leaked() {
    let response =
        ApiError::Database("password authentication failed for user".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Database error");
    assert_eq!(body["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn test_validation_error_names_field() {
    let response = ApiError::Validation(ValidationError::WrongType {
        field: "initialPrice".to_string(),
        expected: "number".to_string(),
    })
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body["error"],
        "Invalid field: initialPrice must be of type number"
    );
}
