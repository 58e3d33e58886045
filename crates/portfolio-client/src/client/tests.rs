//! Unit tests for client module.

use super::*;

// ============================================================================
// ClientConfig Tests
// ============================================================================

#[test]
fn test_client_config_default() {
    let config = ClientConfig::default();

    assert_eq!(config.base_url, "http://localhost:8080");
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
fn test_client_config_custom() {
    let config = ClientConfig {
        base_url: "http://api.example.com:9000".to_string(),
        timeout: Duration::from_secs(60),
    };

    assert_eq!(config.base_url, "http://api.example.com:9000");
    assert_eq!(config.timeout, Duration::from_secs(60));
}

// ============================================================================
// PortfolioClient Creation Tests
// ============================================================================

#[test]
fn test_portfolio_client_new() {
    let client = PortfolioClient::new(ClientConfig::default());
    assert!(client.is_ok());
}

#[test]
fn test_portfolio_client_with_base_url() {
    let client = PortfolioClient::with_base_url("http://localhost:3000");
    assert!(client.is_ok());
}

#[test]
fn test_portfolio_client_base_url_trimmed() {
    let client = PortfolioClient::with_base_url("http://localhost:8080/").unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[test]
fn test_portfolio_client_rejects_invalid_url() {
    let result = PortfolioClient::with_base_url("localhost without scheme");
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

// ============================================================================
// Status Mapping Tests
// ============================================================================

#[test]
fn test_status_error_not_found() {
    let error = status_error(404, "missing".to_string());
    assert!(matches!(error, Error::NotFound(ref m) if m == "missing"));
}

#[test]
fn test_status_error_conflict() {
    let error = status_error(409, "already held".to_string());
    assert!(matches!(error, Error::Conflict(_)));
}

#[test]
fn test_status_error_other() {
    let error = status_error(400, "numShares must be of type integer".to_string());
    match error {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("numShares"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
