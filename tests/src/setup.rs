//! Common test setup functions.

use api::{router, AdminConfig, AppState};
use axum::Router;
use axum_test::{TestResponse, TestServer};
use gateway_core::aggregate::CommissionConfig;
use serde_json::Value;
use sheets_store::{CacheConfig, MemoryStore, TableCache, TableStore, Tables};
use std::sync::Arc;

use crate::fixtures::shop_store;
use crate::mocks::MockStore;

/// Test context around the real router.
///
/// The router, dispatcher, cache, and repository are the production ones;
/// only the sheet is replaced by a [`MockStore`].
pub struct TestContext {
    pub store: MockStore,
    pub tables: Tables,
    pub router: Router,
}

impl TestContext {
    /// A context over the standard shop sheet.
    pub fn new() -> Self {
        Self::with_store(shop_store())
    }

    /// A context over the given tables, with default settings.
    pub fn with_store(inner: MemoryStore) -> Self {
        Self::build(inner, CacheConfig::default(), AdminConfig::default())
    }

    /// A context with an explicit admin password configured.
    pub fn with_admin(admin: AdminConfig) -> Self {
        Self::build(shop_store(), CacheConfig::default(), admin)
    }

    /// A context with custom cache settings.
    pub fn with_cache(cache: CacheConfig) -> Self {
        Self::build(shop_store(), cache, AdminConfig::default())
    }

    fn build(inner: MemoryStore, cache: CacheConfig, admin: AdminConfig) -> Self {
        telemetry::init_test_tracing();

        let store = MockStore::new(inner);
        let cache = Arc::new(TableCache::new(
            Arc::new(store.clone()) as Arc<dyn TableStore>,
            &cache,
        ));
        let tables = Tables::new(cache);
        let state = AppState::new(tables.clone())
            .with_commission(CommissionConfig::default())
            .with_admin(admin);

        Self {
            store,
            tables,
            router: router(state),
        }
    }

    /// A test server over this context's router.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("Failed to create test server")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// POST an action to `/api` and return the response.
pub async fn post_action(server: &TestServer, action: &str, params: Value) -> TestResponse {
    let mut body = match params {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    body.insert("action".to_string(), Value::String(action.to_string()));
    server.post("/api").json(&Value::Object(body)).await
}

/// POST an action and return the decoded envelope, asserting HTTP 200.
pub async fn call(server: &TestServer, action: &str, params: Value) -> Value {
    let response = post_action(server, action, params).await;
    response.assert_status_ok();
    response.json()
}
