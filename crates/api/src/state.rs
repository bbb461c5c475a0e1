//! Application state shared across handlers.

use gateway_core::aggregate::CommissionConfig;
use sheets_store::Tables;

use crate::config::AdminConfig;

/// Shared application state.
///
/// Owns the table repository and, through it, the snapshot cache created
/// at startup.
#[derive(Clone)]
pub struct AppState {
    pub tables: Tables,
    pub commission: CommissionConfig,
    pub admin: AdminConfig,
}

impl AppState {
    pub fn new(tables: Tables) -> Self {
        Self {
            tables,
            commission: CommissionConfig::default(),
            admin: AdminConfig::default(),
        }
    }

    pub fn with_commission(mut self, commission: CommissionConfig) -> Self {
        self.commission = commission;
        self
    }

    pub fn with_admin(mut self, admin: AdminConfig) -> Self {
        self.admin = admin;
        self
    }
}
