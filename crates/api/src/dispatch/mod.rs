//! Action dispatch: maps an action name and its parameters to a table
//! operation and shapes the envelope.

mod catalog;
mod commissions;
mod export;
mod logs;
mod stats;
mod users;

use gateway_core::{Record, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, info_span, warn, Instrument};

use crate::params::Params;
use crate::response::{ApiError, Envelope};
use crate::state::AppState;

/// Every action the gateway answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetProducts,
    GetCategories,
    GetProduct,
    GetOrCreateUser,
    VerifyLogin,
    GetUserByPhone,
    GetUserCommissions,
    GetCommissionsByPhone,
    GetAdminStats,
    RecordProductStat,
    RecordProductView,
    GetProductStats,
    GetStatsSummary,
    GetProductDetailStats,
    AddProduct,
    AddCategory,
    UpdateProduct,
    DeleteProduct,
    ImportProducts,
    RecordSharerWhatsApp,
    DetectAnomalies,
    RecordAnomaly,
    CreateAnonymousUser,
    AdminLogin,
    ExportData,
}

impl Action {
    pub const ALL: [Action; 25] = [
        Action::GetProducts,
        Action::GetCategories,
        Action::GetProduct,
        Action::GetOrCreateUser,
        Action::VerifyLogin,
        Action::GetUserByPhone,
        Action::GetUserCommissions,
        Action::GetCommissionsByPhone,
        Action::GetAdminStats,
        Action::RecordProductStat,
        Action::RecordProductView,
        Action::GetProductStats,
        Action::GetStatsSummary,
        Action::GetProductDetailStats,
        Action::AddProduct,
        Action::AddCategory,
        Action::UpdateProduct,
        Action::DeleteProduct,
        Action::ImportProducts,
        Action::RecordSharerWhatsApp,
        Action::DetectAnomalies,
        Action::RecordAnomaly,
        Action::CreateAnonymousUser,
        Action::AdminLogin,
        Action::ExportData,
    ];

    /// Wire name, as sent by the storefront.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetProducts => "getProducts",
            Self::GetCategories => "getCategories",
            Self::GetProduct => "getProduct",
            Self::GetOrCreateUser => "getOrCreateUser",
            Self::VerifyLogin => "verifyLogin",
            Self::GetUserByPhone => "getUserByPhone",
            Self::GetUserCommissions => "getUserCommissions",
            Self::GetCommissionsByPhone => "getCommissionsByPhone",
            Self::GetAdminStats => "getAdminStats",
            Self::RecordProductStat => "recordProductStat",
            Self::RecordProductView => "recordProductView",
            Self::GetProductStats => "getProductStats",
            Self::GetStatsSummary => "getStatsSummary",
            Self::GetProductDetailStats => "getProductDetailStats",
            Self::AddProduct => "addProduct",
            Self::AddCategory => "addCategory",
            Self::UpdateProduct => "updateProduct",
            Self::DeleteProduct => "deleteProduct",
            Self::ImportProducts => "importProducts",
            Self::RecordSharerWhatsApp => "recordSharerWhatsApp",
            Self::DetectAnomalies => "detectAnomalies",
            Self::RecordAnomaly => "recordAnomaly",
            Self::CreateAnonymousUser => "createAnonymousUser",
            Self::AdminLogin => "adminLogin",
            Self::ExportData => "exportData",
        }
    }

    /// True for actions that write to a table.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::GetOrCreateUser
                | Self::RecordProductStat
                | Self::RecordProductView
                | Self::AddProduct
                | Self::AddCategory
                | Self::UpdateProduct
                | Self::ImportProducts
                | Self::RecordSharerWhatsApp
                | Self::RecordAnomaly
        )
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs an action by name.
///
/// A missing or unknown action is a business outcome, not a fault. Errors
/// from the action itself go through [`ApiError`]'s mapping.
pub async fn dispatch(
    state: &AppState,
    action: Option<&str>,
    params: &Params,
) -> std::result::Result<Envelope, ApiError> {
    let Some(name) = action else {
        return Ok(Envelope::fail("Invalid action"));
    };
    let action = match name.parse::<Action>() {
        Ok(action) => action,
        Err(unknown) => {
            metrics().unknown_actions.inc();
            debug!(action = %unknown, "Unknown action");
            return Ok(Envelope::fail(format!("Unknown action: {}", unknown)));
        }
    };

    let start = Instant::now();
    metrics().actions_dispatched.inc();

    let span = info_span!("action", action = %action, write = action.is_write());
    let result = run(state, action, params).instrument(span).await;

    metrics()
        .action_latency_ms
        .observe(start.elapsed().as_millis() as u64);

    result.map_err(|e| {
        metrics().actions_failed.inc();
        warn!(action = %action, code = e.code().code(), error = %e, "Action failed");
        ApiError::from(e)
    })
}

async fn run(state: &AppState, action: Action, params: &Params) -> Result<Envelope> {
    match action {
        Action::GetProducts => catalog::get_products(state).await,
        Action::GetCategories => catalog::get_categories(state).await,
        Action::GetProduct => catalog::get_product(state, params).await,
        Action::AddProduct => catalog::add_product(state, params).await,
        Action::AddCategory => catalog::add_category(state, params).await,
        Action::UpdateProduct => catalog::update_product(state, params).await,
        Action::DeleteProduct => catalog::delete_product(),
        Action::ImportProducts => catalog::import_products(state, params).await,

        Action::GetOrCreateUser => users::get_or_create_user(state, params).await,
        Action::VerifyLogin => users::verify_login(state, params).await,
        Action::GetUserByPhone => users::get_user_by_phone(state, params).await,
        Action::CreateAnonymousUser => users::create_anonymous_user(),
        Action::AdminLogin => users::admin_login(state, params).await,

        Action::GetUserCommissions => commissions::get_user_commissions(state, params).await,
        Action::GetCommissionsByPhone => commissions::get_commissions_by_phone(state, params).await,
        Action::GetAdminStats => commissions::get_admin_stats(state).await,
        Action::RecordSharerWhatsApp => commissions::record_sharer_whatsapp(state, params).await,

        Action::RecordProductStat => stats::record_product_stat(state, params).await,
        Action::RecordProductView => stats::record_product_view(state, params).await,
        Action::GetProductStats => stats::get_product_stats(state, params).await,
        Action::GetStatsSummary => stats::get_stats_summary(state, params).await,
        Action::GetProductDetailStats => stats::get_product_detail_stats(state, params).await,

        Action::DetectAnomalies => logs::detect_anomalies(state).await,
        Action::RecordAnomaly => logs::record_anomaly(state, params).await,

        Action::ExportData => export::export_data(state, params).await,
    }
}

/// Records as a JSON array.
fn records_json(records: &[Record]) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(records)?)
}

/// Current time as written to timestamp cells.
fn now_cell() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
