use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;
use tradejournal::api::{self, AppState};
use tradejournal::db::init_db;
use tradejournal::domain::Decimal;
use tradejournal::{RateBook, Repository};

async fn setup_test_app() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));
    let rates = Arc::new(RateBook::new(Decimal::from_i64(16000)));

    (api::create_router(AppState::new(repo, rates)), temp_dir)
}

async fn send(
    app: axum::Router,
    uri: &str,
    content_type: &str,
    body: String,
) -> (StatusCode, Value) {
    let request = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(axum::body::Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, uri, "application/json", body.to_string()).await
}

#[tokio::test]
async fn test_evaluate_long_position() {
    let (app, _temp) = setup_test_app().await;
    let (status, json) = post_json(
        app,
        "/v1/futures/evaluate",
        json!({
            "direction": "LONG",
            "entryPrice": "100",
            "exitPrice": "110",
            "size": "1000",
            "leverage": "10",
            "feePercent": "0.05",
            "stopLoss": "95",
            "takeProfit": "115"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["grossPnl"], "1000");
    assert_eq!(json["feeAmount"], "1");
    assert_eq!(json["netPnl"], "999");
    assert_eq!(json["pnlPercent"], "100");
    assert_eq!(json["riskReward"], "3");
    assert_eq!(json["classification"], "WIN");
}

#[tokio::test]
async fn test_evaluate_short_loss_without_levels() {
    let (app, _temp) = setup_test_app().await;
    let (status, json) = post_json(
        app,
        "/v1/futures/evaluate",
        json!({
            "direction": "short",
            "entryPrice": "100",
            "exitPrice": "110",
            "size": "1000"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["grossPnl"], "-100");
    assert_eq!(json["netPnl"], "-100");
    assert_eq!(json["riskReward"], Value::Null);
    assert_eq!(json["classification"], "LOSS");
}

#[tokio::test]
async fn test_evaluate_rejects_bad_input() {
    let (app, _temp) = setup_test_app().await;
    let (status, json) = post_json(
        app.clone(),
        "/v1/futures/evaluate",
        json!({
            "direction": "LONG",
            "entryPrice": "100",
            "exitPrice": "110",
            "size": "1000",
            "leverage": "0.5"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "leverage must be at least 1");

    let (status, json) = post_json(
        app,
        "/v1/futures/evaluate",
        json!({
            "direction": "LONG",
            "entryPrice": "abc",
            "exitPrice": "110",
            "size": "1000"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid entryPrice");
}

#[tokio::test]
async fn test_extreme_inputs_return_zero_instead_of_failing() {
    let (app, _temp) = setup_test_app().await;
    let (status, json) = post_json(
        app.clone(),
        "/v1/futures/evaluate",
        json!({
            "direction": "LONG",
            "entryPrice": "0.0000000000000000000000000001",
            "exitPrice": "1000000",
            "size": "79228162514264337593543950335",
            "leverage": "100",
            "feePercent": "100"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["grossPnl"], "0");
    assert_eq!(json["pnlPercent"], "0");
    assert_eq!(json["classification"], "BE");

    let (status, json) = post_json(
        app.clone(),
        "/v1/futures/position-size",
        json!({ "riskAmount": "79228162514264337593543950335", "stopLossPercent": "0.5" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["size"], "0");

    let (status, json) = post_json(
        app,
        "/v1/spot/cost-basis",
        json!({
            "entries": [
                { "type": "BUY", "quantity": "79228162514264337593543950335", "price": "2" }
            ],
            "marketPrice": "3"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalCost"], "0");
    assert_eq!(json["unrealizedPnl"], "0");
}

#[tokio::test]
async fn test_position_size() {
    let (app, _temp) = setup_test_app().await;
    let (status, json) = post_json(
        app.clone(),
        "/v1/futures/position-size",
        json!({ "riskAmount": "100", "stopLossPercent": "2" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["size"], "5000");

    let (_, json) = post_json(
        app,
        "/v1/futures/position-size",
        json!({ "riskAmount": "100", "stopLossPercent": "0" }),
    )
    .await;
    assert_eq!(json["size"], "0");
}

#[tokio::test]
async fn test_cost_basis_with_market_price() {
    let (app, _temp) = setup_test_app().await;
    let (status, json) = post_json(
        app,
        "/v1/spot/cost-basis",
        json!({
            "entries": [
                { "type": "BUY", "quantity": "1", "price": "40000" },
                { "type": "BUY", "quantity": "1", "price": "60000" },
                { "type": "SELL", "quantity": "0.5", "price": "70000" }
            ],
            "marketPrice": "70000"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["avgPrice"], "50000");
    assert_eq!(json["totalQuantity"], "1.5");
    assert_eq!(json["totalCost"], "100000");
    assert_eq!(json["unrealizedPnl"], "30000");
    assert_eq!(json["entryCount"], 3);
}

#[tokio::test]
async fn test_cost_basis_rejects_unknown_type() {
    let (app, _temp) = setup_test_app().await;
    let (status, json) = post_json(
        app,
        "/v1/spot/cost-basis",
        json!({ "entries": [{ "type": "HOLD", "quantity": "1", "price": "1" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "entries[0].type must be BUY or SELL");
}

#[tokio::test]
async fn test_csv_import_keeps_identical_fills() {
    let (app, _temp) = setup_test_app().await;
    let csv = "type,quantity,price,time_ms\n\
               buy,1,40000,1000\n\
               buy,1,40000,1000\n\
               buy,2,60000,2000\n";
    let (status, json) = send(app, "/v1/spot/import", "text/csv", csv.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["entryCount"], 3);
    assert_eq!(json["totalQuantity"], "4");
    assert_eq!(json["totalCost"], "200000");
    assert_eq!(json["avgPrice"], "50000");
    assert_eq!(json["duplicateRows"], json!([2]));
    assert!(json.get("unrealizedPnl").is_none());
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries[0]["type"], "BUY");
    assert_eq!(entries[2]["price"], "60000");
    assert_eq!(entries[2]["timeMs"], 2000);
}

#[tokio::test]
async fn test_csv_import_reports_bad_row() {
    let (app, _temp) = setup_test_app().await;
    let csv = "type,quantity,price,time_ms\nbuy,-1,40000,1000\n";
    let (status, json) = send(app, "/v1/spot/import", "text/csv", csv.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "row 1: invalid quantity: -1");
}

#[tokio::test]
async fn test_journal_stats() {
    let (app, _temp) = setup_test_app().await;
    let (status, json) = post_json(
        app,
        "/v1/journal/stats",
        json!({
            "positions": [
                { "direction": "LONG", "entryPrice": "100", "exitPrice": "110", "size": "1000" },
                { "direction": "LONG", "entryPrice": "100", "exitPrice": "95", "size": "1000" },
                { "direction": "SHORT", "entryPrice": "100", "exitPrice": "100", "size": "1000" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"].as_array().unwrap().len(), 3);
    assert_eq!(json["totalTrades"], 3);
    assert_eq!(json["wins"], 1);
    assert_eq!(json["losses"], 1);
    assert_eq!(json["breakevens"], 1);
    assert_eq!(json["winRate"], "33.33");
    assert_eq!(json["netPnl"], "50");
    assert_eq!(json["profitFactor"], "2");
    assert_eq!(json["averageRrr"], Value::Null);
}
