//! Product stat events, rollups, and anomaly signals.

use integration_tests::fixtures::{MEMBER_PHONE, SHARER_PHONE};
use integration_tests::setup::{call, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_product_stats_rollup() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getProductStats", json!({})).await;

    assert_eq!(body["success"], true, "{}", body);
    let groups = body["data"].as_array().unwrap();
    assert_eq!(groups.len(), 2);

    assert_eq!(groups[0]["productId"], "1");
    assert_eq!(groups[0]["productName"], "Rose Serum");
    assert_eq!(groups[0]["views"], 2);
    assert_eq!(groups[0]["clicks"], 1);
    assert_eq!(groups[0]["purchases"], 1);
    assert_eq!(groups[0]["timeline"].as_array().map(Vec::len), Some(4));

    assert_eq!(groups[1]["productId"], "3");
    assert_eq!(groups[1]["views"], 1);
}

#[tokio::test]
async fn test_product_stats_date_filter() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "getProductStats",
        json!({ "productId": "1", "startDate": "2024-03-02", "endDate": "2024-03-31" }),
    )
    .await;

    let groups = body["data"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["views"], 0);
    assert_eq!(groups[0]["purchases"], 1);
}

#[tokio::test]
async fn test_product_stats_rejects_bad_date() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getProductStats", json!({ "startDate": "yesterday-ish" })).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALID_001");
}

#[tokio::test]
async fn test_record_product_stat_is_counted() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "recordProductStat",
        json!({
            "productId": "3",
            "statType": "share",
            "whatsapp": SHARER_PHONE,
            "deviceId": "dev-z",
            "additionalData": { "channel": "whatsapp" }
        }),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["message"], "Stat recorded");

    let body = call(&server, "recordProductView", json!({ "productId": "3" })).await;
    assert_eq!(body["success"], true);

    let body = call(&server, "getProductStats", json!({ "productId": "3" })).await;
    let group = &body["data"][0];
    assert_eq!(group["views"], 2);
    assert_eq!(group["shares"], 1);

    let grid = ctx.store.grid("ProductStats");
    let share = &grid[grid.len() - 2];
    assert_eq!(share[2], "share");
    assert_eq!(share[3], "dev-z");
    assert_eq!(share[5], r#"{"channel":"whatsapp"}"#);
}

#[tokio::test]
async fn test_record_product_stat_rejects_unknown_type() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "recordProductStat",
        json!({ "productId": "1", "statType": "wishlist" }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid statType: wishlist"));
    assert_eq!(ctx.store.write_count(), 0);
}

/// Fresh events fall inside the default 7 day window; the 2024 fixture
/// events do not.
#[tokio::test]
async fn test_stats_summary_window() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for stat in ["view", "view", "click"] {
        call(
            &server,
            "recordProductStat",
            json!({ "productId": "1", "statType": stat }),
        )
        .await;
    }

    let body = call(&server, "getStatsSummary", json!({ "range": "7d" })).await;
    assert_eq!(body["success"], true, "{}", body);

    let data = &body["data"];
    assert_eq!(data["range"], "7d");
    assert_eq!(data["totals"]["views"], 2);
    assert_eq!(data["totals"]["clicks"], 1);
    assert_eq!(data["conversionRates"]["clickToViewRate"], 50.0);
    assert_eq!(data["productCount"], 1);
    assert_eq!(data["dailyStats"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["topProducts"][0]["productId"], "1");
}

#[tokio::test]
async fn test_product_detail_stats_for_quiet_product() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "getProductDetailStats",
        json!({ "productId": "3", "range": "30d" }),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["data"]["range"], "30d");
    assert_eq!(body["data"]["stats"]["productName"], "Travel Kit");
    assert_eq!(body["data"]["stats"]["views"], 0);

    let body = call(&server, "getProductDetailStats", json!({})).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "productId is required");
}

#[tokio::test]
async fn test_detect_and_record_anomalies() {
    let ctx = TestContext::new();
    let server = ctx.server();

    // dev-b already reported MEMBER_PHONE; a second number makes it shared.
    call(
        &server,
        "recordProductStat",
        json!({
            "productId": "1",
            "statType": "click",
            "deviceId": "dev-b",
            "whatsapp": SHARER_PHONE
        }),
    )
    .await;

    let body = call(&server, "detectAnomalies", json!({})).await;
    assert_eq!(body["success"], true, "{}", body);
    let devices = body["data"]["deviceAnomalies"].as_array().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["deviceId"], "dev-b");
    assert_eq!(
        devices[0]["whatsappNumbers"],
        json!([SHARER_PHONE, MEMBER_PHONE])
    );
    assert_eq!(body["data"]["logs"], json!([]));

    let body = call(
        &server,
        "recordAnomaly",
        json!({ "anomalyType": "shared_device", "deviceId": "dev-b", "details": "2 numbers" }),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["message"], "Anomaly recorded");
    assert_eq!(body["data"]["Status"], "pending");

    let body = call(&server, "detectAnomalies", json!({})).await;
    let logs = body["data"]["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["AnomalyType"], "shared_device");
    assert_eq!(logs[0]["DeviceID"], "dev-b");
}

#[tokio::test]
async fn test_export_users_csv_omits_secrets() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "exportData", json!({ "type": "users" })).await;
    assert_eq!(body["success"], true, "{}", body);

    let data = &body["data"];
    assert_eq!(data["contentType"], "text/csv");
    assert_eq!(data["rows"], 3);
    assert!(data["filename"].as_str().unwrap().starts_with("users_"));

    let content = data["content"].as_str().unwrap();
    let header = content.lines().next().unwrap();
    assert_eq!(header, "ID,Phone,ReferralCode,Referrer,Role,HasCommission,CreatedAt");
    assert!(!content.contains("s3cret"));
}

#[tokio::test]
async fn test_export_products_quotes_cells() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "exportData", json!({ "type": "products" })).await;
    let content = body["data"]["content"].as_str().unwrap();

    assert!(content.contains(r#""Hydrating, 30ml""#), "{}", content);
    assert!(content.contains(r#""Say ""hi""""#), "{}", content);
}

#[tokio::test]
async fn test_export_unknown_type() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "exportData", json!({ "type": "orders" })).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALID_001");
}
