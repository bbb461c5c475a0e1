//! Per-user commission rollup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::{find_by_key, find_user_by_phone, CommissionStatus};
use crate::record::{phone_key, Record};

/// How the `Commission` column of a commission record is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionMode {
    /// The column is the amount earned.
    #[default]
    Flat,
    /// The column is a percentage of the joined order's `Amount`.
    Percentage,
}

/// Commission semantics. Older sheets mark settled commissions `verified`,
/// newer ones `paid`; both count as completed unless configured otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionConfig {
    #[serde(default)]
    pub mode: CommissionMode,
    #[serde(default = "default_completed_statuses")]
    pub completed_statuses: Vec<String>,
}

fn default_completed_statuses() -> Vec<String> {
    vec!["verified".to_string(), "paid".to_string()]
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            mode: CommissionMode::default(),
            completed_statuses: default_completed_statuses(),
        }
    }
}

impl CommissionConfig {
    fn is_completed(&self, status: &CommissionStatus) -> bool {
        self.completed_statuses
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case(status.as_str()))
    }
}

/// How the caller identified the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Id(String),
    Phone(String),
}

impl UserLookup {
    pub fn resolve<'a>(&self, users: &'a [Record]) -> Option<&'a Record> {
        match self {
            Self::Id(id) => find_by_key(users, "ID", id),
            Self::Phone(phone) => find_user_by_phone(users, phone),
        }
    }
}

/// Commission totals for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSummary {
    pub user_id: String,
    pub phone: String,
    /// Every matched commission, whatever its status.
    pub total_commission: f64,
    pub pending_commission: f64,
    pub verified_commission: f64,
    pub paid_commission: f64,
    /// Sum of statuses configured as completed.
    pub completed_commission: f64,
    /// Number of matched commission records.
    pub referral_count: usize,
    /// Orders attributed to the user through `SharerWhatsApp`.
    pub orders: Vec<Record>,
}

/// Rolls up commissions for a resolved user.
///
/// A commission belongs to the user when its `UserID` is the user's `ID`, or
/// when its `OrderID` names an order shared by the user's phone.
pub fn summarize_user_commissions(
    user: &Record,
    orders: &[Record],
    commissions: &[Record],
    config: &CommissionConfig,
) -> CommissionSummary {
    let user_id = user.key("ID");
    let phone = user.text("Phone");
    let user_phone = phone_key(&phone);

    let orders_by_id: HashMap<String, &Record> = orders
        .iter()
        .map(|o| (o.key("ID"), o))
        .filter(|(id, _)| !id.is_empty())
        .collect();

    let shared_by_user = |order: &Record| {
        !user_phone.is_empty() && phone_key(&order.text("SharerWhatsApp")) == user_phone
    };

    let mut summary = CommissionSummary {
        user_id: user_id.clone(),
        phone: phone.clone(),
        orders: orders.iter().filter(|o| shared_by_user(o)).cloned().collect(),
        ..Default::default()
    };

    for commission in commissions {
        let order = orders_by_id.get(&commission.key("OrderID")).copied();

        let by_user = !user_id.is_empty() && commission.key("UserID") == user_id;
        let by_order = order.is_some_and(|o| shared_by_user(o));
        if !by_user && !by_order {
            continue;
        }

        let amount = match config.mode {
            CommissionMode::Flat => commission.number("Commission"),
            CommissionMode::Percentage => order
                .map(|o| o.number("Amount") * commission.number("Commission") / 100.0)
                .unwrap_or(0.0),
        };

        let status = CommissionStatus::parse(&commission.text("Status"));
        summary.referral_count += 1;
        summary.total_commission += amount;
        match status {
            CommissionStatus::Pending => summary.pending_commission += amount,
            CommissionStatus::Verified => summary.verified_commission += amount,
            CommissionStatus::Paid => summary.paid_commission += amount,
            CommissionStatus::Other(_) => {}
        }
        if config.is_completed(&status) {
            summary.completed_commission += amount;
        }
    }

    summary
}
