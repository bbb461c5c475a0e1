//! Catalog actions through the HTTP surface.

use axum::http::StatusCode;
use gateway_core::Table;
use integration_tests::setup::{call, TestContext};
use serde_json::json;

/// Hidden products and blank rows never reach the storefront
#[tokio::test]
async fn test_get_products_returns_visible_only() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getProducts", json!({})).await;

    assert_eq!(body["success"], true);
    let products = body["data"].as_array().expect("data should be an array");
    let ids: Vec<i64> = products.iter().filter_map(|p| p["ID"].as_i64()).collect();
    assert_eq!(ids, vec![1, 3], "product 2 is hidden");

    // Typed cells
    assert_eq!(products[0]["MemberPrice"], 69.9);
    assert_eq!(products[0]["IsHotSale"], true);
    assert_eq!(products[0]["Description"], "Hydrating, 30ml");
}

/// GET with query parameters answers the same as POST
#[tokio::test]
async fn test_get_request_with_query_action() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/api")
        .add_query_param("action", "getCategories")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"][1]["Name"], "Travel");
}

/// The legacy function path is routed to the same dispatcher
#[tokio::test]
async fn test_legacy_path_is_served() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/.netlify/functions/api")
        .json(&json!({ "action": "getCategories" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_get_product_hides_invisible() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getProduct", json!({ "id": "1" })).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["Name"], "Rose Serum");

    let body = call(&server, "getProduct", json!({ "productId": 2 })).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Product not found");
    assert_eq!(body["code"], "NOT_FOUND_001");
}

/// Repeated reads inside the TTL hit the cache
#[tokio::test]
async fn test_reads_are_cached() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for _ in 0..5 {
        let body = call(&server, "getProducts", json!({})).await;
        assert_eq!(body["success"], true);
    }
    assert_eq!(ctx.store.read_count(), 1);
}

/// Concurrent cold reads of one table share a single fetch
#[tokio::test]
async fn test_concurrent_reads_share_one_fetch() {
    let ctx = TestContext::new();
    ctx.store
        .set_delay(Some(std::time::Duration::from_millis(50)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let tables = ctx.tables.clone();
            tokio::spawn(async move { tables.snapshot(Table::Products).await })
        })
        .collect();

    for handle in handles {
        let snapshot = handle.await.expect("task panicked").expect("read should succeed");
        assert_eq!(snapshot.records.len(), 3);
    }
    assert_eq!(ctx.store.read_count(), 1);
}

#[tokio::test]
async fn test_add_product_assigns_next_id_and_is_readable() {
    let ctx = TestContext::new();
    let server = ctx.server();

    // Warm the cache so the write has something to invalidate.
    call(&server, "getProducts", json!({})).await;

    let body = call(
        &server,
        "addProduct",
        json!({
            "product": {
                "name": "Lip Balm",
                "categoryId": 1,
                "originalPrice": "15.00",
                "commission": 2
            }
        }),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["message"], "Product added");
    assert_eq!(body["data"]["ID"], 4);

    let body = call(&server, "getProducts", json!({})).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["Name"].as_str())
        .collect();
    assert!(names.contains(&"Lip Balm"), "write should be visible: {:?}", names);

    // Cells land in the sheet's own column order
    let grid = ctx.store.grid("Products");
    let last = grid.last().unwrap();
    assert_eq!(last[0], "4");
    assert_eq!(last[2], "Lip Balm");
    assert_eq!(last[10], "TRUE");
}

#[tokio::test]
async fn test_add_product_requires_name() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "addProduct", json!({ "product": { "originalPrice": 5 } })).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALID_001");
    assert_eq!(ctx.store.write_count(), 0);
}

#[tokio::test]
async fn test_add_category_to_empty_sheet_writes_header() {
    let ctx = TestContext::with_store(sheets_store::MemoryStore::new());
    let server = ctx.server();

    let body = call(&server, "addCategory", json!({ "name": "Gifts" })).await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["data"]["ID"], 1);

    let grid = ctx.store.grid("Categories");
    assert_eq!(grid[0], vec!["ID".to_string(), "Name".to_string()]);
    assert_eq!(grid[1], vec!["1".to_string(), "Gifts".to_string()]);
}

#[tokio::test]
async fn test_update_product_changes_only_named_fields() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "updateProduct",
        json!({ "productId": "2", "fields": { "IsVisible": true, "StockCount": 7 } }),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["message"], "Product updated");

    let body = call(&server, "getProduct", json!({ "id": 2 })).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["StockCount"], 7);
    assert_eq!(body["data"]["Name"], "Night Cream");
}

#[tokio::test]
async fn test_update_unknown_product_is_not_found() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "updateProduct",
        json!({ "productId": "99", "fields": { "StockCount": 1 } }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND_001");
}

#[tokio::test]
async fn test_delete_product_is_not_supported() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api")
        .json(&json!({ "action": "deleteProduct", "productId": "1" }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNSUPPORTED_001");
    assert_eq!(ctx.store.write_count(), 0);
}

#[tokio::test]
async fn test_import_products_appends_after_max_id() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "importProducts",
        json!({ "products": [
            { "name": "Mask", "originalPrice": 10 },
            { "name": "Toner", "originalPrice": 20, "isVisible": false }
        ]}),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["data"]["imported"], 2);

    let grid = ctx.store.grid("Products");
    let ids: Vec<&str> = grid.iter().skip(1).filter_map(|r| r.first()).map(String::as_str).collect();
    assert!(ids.ends_with(&["4", "5"]), "{:?}", ids);
}

#[tokio::test]
async fn test_import_products_replace() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "importProducts",
        json!({ "replace": true, "products": [{ "name": "Only One" }] }),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["data"]["replaced"], true);

    let body = call(&server, "getProducts", json!({})).await;
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["ID"], 1);
    assert_eq!(products[0]["Name"], "Only One");
}

#[tokio::test]
async fn test_import_reports_bad_item() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "importProducts",
        json!({ "products": [{ "name": "Fine" }, { "originalPrice": 3 }] }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(
        body["message"].as_str().unwrap().starts_with("Product 2:"),
        "{}",
        body
    );
    assert_eq!(ctx.store.write_count(), 0);
}
