//! Security endpoint tests.

use futures_util::future::join_all;
use portfolio_client::{
    CreatePortfolioRequest, CreateSecurityRequest, Error, PortfolioClient, UpdateSecurityRequest,
};
use portfolio_tests::{create_test_client, get_api_url, unique_symbol};
use serde_json::json;

async fn new_link(client: &PortfolioClient) -> String {
    client
        .create_portfolio(&CreatePortfolioRequest {
            name: "Holdings Test".to_string(),
            value: 100000.0,
        })
        .await
        .expect("Failed to create portfolio")
        .link
}

fn purchase(link: &str, symbol: &str, shares: i64) -> CreateSecurityRequest {
    CreateSecurityRequest {
        link: link.to_string(),
        symbol: symbol.to_string(),
        name: format!("{} Inc.", symbol),
        initial_price: 20.0,
        num_shares: shares,
    }
}

fn trade(link: &str, symbol: &str, delta: i64) -> UpdateSecurityRequest {
    UpdateSecurityRequest {
        link: link.to_string(),
        symbol: symbol.to_string(),
        current_price: 21.0,
        num_shares: delta,
    }
}

#[tokio::test]
async fn test_first_purchase_is_returned_by_link() {
    let client = create_test_client().await.expect("Failed to create client");
    let link = new_link(&client).await;

    let created = client
        .create_security(&purchase(&link, "GME", 5))
        .await
        .expect("Failed to create security");

    assert_eq!(created.num_shares, 5);
    assert_eq!(created.current_price, created.initial_price);

    let holdings = client.get_securities(&link).await.unwrap();
    assert_eq!(holdings, vec![created]);
}

#[tokio::test]
async fn test_unknown_link_has_no_holdings() {
    let client = create_test_client().await.expect("Failed to create client");

    let holdings = client
        .get_securities("doesnotexist")
        .await
        .expect("Lookup should succeed");

    assert!(holdings.is_empty());
}

#[tokio::test]
async fn test_duplicate_purchase_conflicts() {
    let client = create_test_client().await.expect("Failed to create client");
    let link = new_link(&client).await;
    client.create_security(&purchase(&link, "GME", 5)).await.unwrap();

    let result = client.create_security(&purchase(&link, "GME", 1)).await;

    assert!(matches!(result, Err(Error::Conflict(_))));
    let holdings = client.get_securities(&link).await.unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].num_shares, 5);
}

#[tokio::test]
async fn test_missing_field_persists_nothing() {
    let base_url = get_api_url().await.expect("Failed to start server");
    let client = PortfolioClient::with_base_url(&base_url).unwrap();
    let link = new_link(&client).await;
    let http = reqwest::Client::new();

    let resp = http
        .post(format!("{}/security", base_url))
        .json(&json!({
            "link": link,
            "symbol": "GME",
            "name": "GameStop Corp.",
            "initialPrice": 20.0
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_FIELD");
    assert!(body["error"].as_str().unwrap().contains("numShares"));
    assert!(client.get_securities(&link).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_purchase_and_sale_deltas() {
    let client = create_test_client().await.expect("Failed to create client");
    let link = new_link(&client).await;
    client.create_security(&purchase(&link, "GME", 10)).await.unwrap();

    let bought = client.update_security(&trade(&link, "GME", 3)).await.unwrap();
    assert_eq!(bought.num_shares, 13);
    assert_eq!(bought.current_price, 21.0);

    let sold = client.update_security(&trade(&link, "GME", -13)).await.unwrap();
    assert_eq!(sold.num_shares, 0);
}

#[tokio::test]
async fn test_oversell_is_rejected() {
    let client = create_test_client().await.expect("Failed to create client");
    let link = new_link(&client).await;
    client.create_security(&purchase(&link, "GME", 2)).await.unwrap();

    let result = client.update_security(&trade(&link, "GME", -3)).await;

    assert!(matches!(result, Err(Error::Api { status: 400, .. })));
    let holdings = client.get_securities(&link).await.unwrap();
    assert_eq!(holdings[0].num_shares, 2);
}

#[tokio::test]
async fn test_update_unknown_holding() {
    let client = create_test_client().await.expect("Failed to create client");

    let result = client
        .update_security(&trade(&unique_symbol("missing"), "GME", 1))
        .await;

    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_concurrent_purchases_are_not_lost() {
    let client = create_test_client().await.expect("Failed to create client");
    let link = new_link(&client).await;
    client.create_security(&purchase(&link, "GME", 10)).await.unwrap();

    let requests: Vec<UpdateSecurityRequest> =
        (0..2).map(|_| trade(&link, "GME", 3)).collect();
    let results = join_all(requests.iter().map(|r| client.update_security(r))).await;

    assert!(results.iter().all(Result::is_ok));
    let holdings = client.get_securities(&link).await.unwrap();
    assert_eq!(holdings[0].num_shares, 16);
}

#[tokio::test]
async fn test_delete_holding() {
    let client = create_test_client().await.expect("Failed to create client");
    let link = new_link(&client).await;
    client.create_security(&purchase(&link, "GME", 5)).await.unwrap();
    client.create_security(&purchase(&link, "AAPL", 1)).await.unwrap();

    client
        .delete_security(&link, "GME")
        .await
        .expect("Failed to delete security");

    let holdings = client.get_securities(&link).await.unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].symbol, "AAPL");

    client
        .delete_security(&link, "GME")
        .await
        .expect("Deleting a missing holding should succeed");
}

#[tokio::test]
async fn test_list_securities_includes_created() {
    let client = create_test_client().await.expect("Failed to create client");
    let link = new_link(&client).await;
    client.create_security(&purchase(&link, "GME", 5)).await.unwrap();

    let all = client.list_securities().await.expect("Failed to list");

    assert!(all.iter().any(|s| s.link == link && s.symbol == "GME"));
}

#[tokio::test]
async fn test_delete_without_body_reports_missing_symbol() {
    let base_url = get_api_url().await.expect("Failed to start server");
    let client = PortfolioClient::with_base_url(&base_url).unwrap();
    let link = new_link(&client).await;
    client.create_security(&purchase(&link, "GME", 5)).await.unwrap();
    let http = reqwest::Client::new();

    let resp = http
        .delete(format!("{}/security/{}", base_url, link))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_FIELD");
    assert_eq!(body["error"], "Invalid field: symbol is required");
    assert_eq!(client.get_securities(&link).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let base_url = get_api_url().await.expect("Failed to start server");
    let http = reqwest::Client::new();

    let resp = http
        .post(format!("{}/security", base_url))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_REQUEST");
    assert!(body["error"].as_str().unwrap().contains("not valid JSON"));
}
