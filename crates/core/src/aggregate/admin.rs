//! Sitewide totals for the admin dashboard.

use serde::{Deserialize, Serialize};

use crate::entities::CommissionStatus;
use crate::record::Record;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_revenue: f64,
    pub total_commission: f64,
    pub pending_commission: f64,
    pub user_count: usize,
    pub order_count: usize,
    pub product_count: usize,
}

/// Full scan over every table involved; there is no pagination.
pub fn admin_stats(
    users: &[Record],
    orders: &[Record],
    commissions: &[Record],
    products: &[Record],
) -> AdminStats {
    let total_revenue = orders.iter().map(|o| o.number("Amount")).sum();
    let total_commission = commissions.iter().map(|c| c.number("Commission")).sum();
    let pending_commission = commissions
        .iter()
        .filter(|c| CommissionStatus::parse(&c.text("Status")) == CommissionStatus::Pending)
        .map(|c| c.number("Commission"))
        .sum();

    AdminStats {
        total_revenue,
        total_commission,
        pending_commission,
        user_count: users.len(),
        order_count: orders.len(),
        product_count: products.len(),
    }
}
