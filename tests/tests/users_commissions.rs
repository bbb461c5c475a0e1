//! User, login, and commission actions.

use api::AdminConfig;
use integration_tests::fixtures::{ADMIN_PHONE, MEMBER_PHONE, SHARER_PHONE};
use integration_tests::setup::{call, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_get_or_create_returns_existing_user() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getOrCreateUser", json!({ "whatsapp": "+60 123-456-789" })).await;

    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["data"]["ID"], 1);
    assert_eq!(body["data"]["ReferralCode"], "SHARE001");
    assert!(body["data"].get("Password").is_none(), "password must not leak");
    assert!(body["data"]["Token"].is_null(), "token must not leak");
    assert_eq!(ctx.store.write_count(), 0);
}

#[tokio::test]
async fn test_get_or_create_registers_new_user_once() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "getOrCreateUser",
        json!({ "whatsapp": "60155550000", "referrer": "SHARE001" }),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["message"], "User created");
    // Header plus three users
    assert_eq!(body["data"]["ID"], 4);
    assert_eq!(body["data"]["Role"], "user");
    assert_eq!(body["data"]["Referrer"], "SHARE001");
    assert_eq!(body["data"]["HasCommission"], false);
    assert_eq!(body["data"]["ReferralCode"].as_str().map(str::len), Some(8));
    assert!(body["data"]["Token"].as_str().is_some_and(|t| !t.is_empty()));

    let again = call(&server, "getOrCreateUser", json!({ "whatsapp": "60155550000" })).await;
    assert_eq!(again["success"], true);
    assert_eq!(again["data"]["ID"], 4);
    assert!(again.get("message").is_none());
    assert!(again["data"]["Token"].is_null());

    assert_eq!(ctx.store.grid("Users").len(), 5);
}

#[tokio::test]
async fn test_get_or_create_rejects_bad_number() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getOrCreateUser", json!({ "whatsapp": "call me" })).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALID_001");

    let body = call(&server, "getOrCreateUser", json!({})).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "whatsapp is required");
}

#[tokio::test]
async fn test_verify_login() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "verifyLogin",
        json!({ "whatsapp": SHARER_PHONE, "password": "s3cret" }),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["ID"], 1);
    assert_eq!(body["data"]["Token"], "tok-1");
    assert!(body["data"].get("Password").is_none());

    let body = call(
        &server,
        "verifyLogin",
        json!({ "whatsapp": SHARER_PHONE, "password": "wrong" }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid password");
    assert_eq!(body["code"], "AUTH_001");

    let body = call(
        &server,
        "verifyLogin",
        json!({ "whatsapp": "60100000000", "password": "x" }),
    )
    .await;
    assert_eq!(body["message"], "User not found");
}

/// Users without commission access cannot log in to the dashboard
#[tokio::test]
async fn test_verify_login_requires_commission_access() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "verifyLogin",
        json!({ "whatsapp": MEMBER_PHONE, "password": "pw" }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "AUTH_001");
}

#[tokio::test]
async fn test_get_user_by_phone() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getUserByPhone", json!({ "phone": MEMBER_PHONE })).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["ReferralCode"], "MEMB0001");
    assert!(body["data"]["Token"].is_null());
    assert!(body["data"]["Password"].is_null());

    let body = call(&server, "getUserByPhone", json!({ "phone": "60100000000" })).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND_001");
}

#[tokio::test]
async fn test_create_anonymous_user_writes_nothing() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "createAnonymousUser", json!({})).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["id"].as_str().unwrap().starts_with("guest_"));
    assert_eq!(body["data"]["role"], "guest");
    assert_eq!(ctx.store.write_count(), 0);
}

/// Pending 10 plus paid 5 over two records
#[tokio::test]
async fn test_user_commission_rollup() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getUserCommissions", json!({ "userId": 1 })).await;

    assert_eq!(body["success"], true, "{}", body);
    let data = &body["data"];
    assert_eq!(data["totalCommission"], 15.0);
    assert_eq!(data["pendingCommission"], 10.0);
    assert_eq!(data["paidCommission"], 5.0);
    assert_eq!(data["referralCount"], 2);
    assert_eq!(data["orders"].as_array().map(Vec::len), Some(1));
}

/// Unknown statuses count toward the total but no named bucket
#[tokio::test]
async fn test_unknown_status_is_excluded_from_buckets() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getUserCommissions", json!({ "whatsapp": MEMBER_PHONE })).await;

    let data = &body["data"];
    assert_eq!(data["totalCommission"], 10.0);
    assert_eq!(data["paidCommission"], 8.0);
    assert_eq!(data["pendingCommission"], 0.0);
    assert_eq!(data["referralCount"], 2);
}

#[tokio::test]
async fn test_commission_lookup_errors() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getUserCommissions", json!({ "userId": 42 })).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND_001");

    let body = call(&server, "getUserCommissions", json!({})).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "userId or whatsapp is required");
}

/// A phone with no Users row still rolls up as an empty summary
#[tokio::test]
async fn test_commissions_by_unknown_phone() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getCommissionsByPhone", json!({ "phone": "60100000000" })).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalCommission"], 0.0);
    assert_eq!(body["data"]["referralCount"], 0);
}

#[tokio::test]
async fn test_record_sharer_whatsapp_attributes_order() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let before = call(&server, "getUserCommissions", json!({ "userId": 1 })).await;
    assert_eq!(before["data"]["orders"].as_array().map(Vec::len), Some(1));

    let body = call(
        &server,
        "recordSharerWhatsApp",
        json!({ "orderId": "101", "sharerWhatsApp": SHARER_PHONE }),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["message"], "Sharer WhatsApp recorded");

    let after = call(&server, "getUserCommissions", json!({ "userId": 1 })).await;
    assert_eq!(after["data"]["orders"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_admin_stats() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(&server, "getAdminStats", json!({})).await;

    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["totalRevenue"], 108.9);
    assert_eq!(data["totalCommission"], 25.0);
    assert_eq!(data["pendingCommission"], 10.0);
    assert_eq!(data["userCount"], 3);
    assert_eq!(data["orderCount"], 2);
    assert_eq!(data["productCount"], 3);
}

#[tokio::test]
async fn test_admin_login_against_users_table() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = call(
        &server,
        "adminLogin",
        json!({ "username": ADMIN_PHONE, "password": "adminpass" }),
    )
    .await;
    assert_eq!(body["success"], true, "{}", body);
    assert_eq!(body["data"]["role"], "admin");

    // Right password, but not an admin
    let body = call(
        &server,
        "adminLogin",
        json!({ "username": SHARER_PHONE, "password": "s3cret" }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid admin credentials");
}

#[tokio::test]
async fn test_admin_login_with_configured_password() {
    let ctx = TestContext::with_admin(AdminConfig {
        username: "owner".to_string(),
        password: Some("letmein".to_string()),
    });
    let server = ctx.server();

    let body = call(
        &server,
        "adminLogin",
        json!({ "username": "owner", "password": "letmein" }),
    )
    .await;
    assert_eq!(body["success"], true);

    // Sheet admins are ignored once a password is configured
    let body = call(
        &server,
        "adminLogin",
        json!({ "username": ADMIN_PHONE, "password": "adminpass" }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "AUTH_001");
}
