//! Logical tables and their default column layouts.
//!
//! The default header is only used when a table has no header row yet; once
//! a header exists in the sheet, its column order wins.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    Products,
    Categories,
    Users,
    Orders,
    Commissions,
    ProductStats,
    Logs,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::Products,
        Table::Categories,
        Table::Users,
        Table::Orders,
        Table::Commissions,
        Table::ProductStats,
        Table::Logs,
    ];

    /// Sheet (tab) name in the spreadsheet.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Categories => "Categories",
            Self::Users => "Users",
            Self::Orders => "Orders",
            Self::Commissions => "Commissions",
            Self::ProductStats => "ProductStats",
            Self::Logs => "Logs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Column layout written when the sheet is empty.
    pub fn default_header(&self) -> &'static [&'static str] {
        match self {
            Self::Products => &[
                "ID",
                "CategoryID",
                "Name",
                "Description",
                "ImageURL",
                "OriginalPrice",
                "MemberPrice",
                "Commission",
                "StockCount",
                "PurchasedCount",
                "IsVisible",
                "IsHotSale",
                "IsMemberExclusive",
            ],
            Self::Categories => &["ID", "Name"],
            Self::Users => &[
                "ID",
                "Phone",
                "ReferralCode",
                "Referrer",
                "Role",
                "Password",
                "HasCommission",
                "Token",
                "CreatedAt",
            ],
            Self::Orders => &["ID", "ProductID", "SharerWhatsApp", "Amount", "CreatedAt"],
            Self::Commissions => &["ID", "OrderID", "UserID", "Commission", "Status", "CreatedAt"],
            Self::ProductStats => &[
                "Timestamp",
                "ProductID",
                "StatType",
                "DeviceID",
                "WhatsApp",
                "AdditionalData",
            ],
            Self::Logs => &[
                "LogID",
                "DeviceID",
                "UseID",
                "AnomalyType",
                "Details",
                "DetectedTime",
                "Status",
            ],
        }
    }

    pub fn default_header_owned(&self) -> Vec<String> {
        self.default_header().iter().map(|c| c.to_string()).collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
