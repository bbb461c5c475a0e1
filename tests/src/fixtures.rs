//! Sheet contents used across the integration tests.

use gateway_core::{Grid, Table};
use sheets_store::MemoryStore;

pub const ADMIN_PHONE: &str = "60111111111";
pub const SHARER_PHONE: &str = "60123456789";
pub const MEMBER_PHONE: &str = "60198765432";

/// Build a grid from string slices.
pub fn grid(rows: &[&[&str]]) -> Grid {
    rows.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// A table holding only its default header.
pub fn empty_table(table: Table) -> Grid {
    vec![table.default_header_owned()]
}

pub fn products() -> Grid {
    grid(&[
        &[
            "ID", "CategoryID", "Name", "Description", "ImageURL", "OriginalPrice",
            "MemberPrice", "Commission", "StockCount", "PurchasedCount", "IsVisible",
            "IsHotSale", "IsMemberExclusive",
        ],
        &["1", "1", "Rose Serum", "Hydrating, 30ml", "", "89.90", "69.90", "10", "40", "3", "TRUE", "TRUE", "FALSE"],
        &["2", "1", "Night Cream", "", "", "120", "99", "12", "15", "0", "FALSE", "FALSE", "FALSE"],
        &["3", "2", "Travel Kit", "Say \"hi\"", "", "45", "39", "5", "8", "1", "", "FALSE", "TRUE"],
        &[],
    ])
}

pub fn categories() -> Grid {
    grid(&[&["ID", "Name"], &["1", "Skincare"], &["2", "Travel"]])
}

pub fn users() -> Grid {
    grid(&[
        &["ID", "Phone", "ReferralCode", "Referrer", "Role", "Password", "HasCommission", "Token", "CreatedAt"],
        &["1", SHARER_PHONE, "SHARE001", "", "user", "s3cret", "TRUE", "tok-1", "2024-01-01 10:00:00"],
        &["2", ADMIN_PHONE, "ADMIN001", "", "admin", "adminpass", "TRUE", "tok-2", "2024-01-01 10:00:00"],
        &["3", MEMBER_PHONE, "MEMB0001", "SHARE001", "user", "pw", "FALSE", "tok-3", "2024-01-02 10:00:00"],
    ])
}

pub fn orders() -> Grid {
    grid(&[
        &["ID", "ProductID", "SharerWhatsApp", "Amount", "CreatedAt"],
        &["100", "1", SHARER_PHONE, "69.90", "2024-02-01 12:00:00"],
        &["101", "3", "", "39", "2024-02-02 12:00:00"],
    ])
}

pub fn commissions() -> Grid {
    grid(&[
        &["ID", "OrderID", "UserID", "Commission", "Status", "CreatedAt"],
        &["1", "", "1", "10", "pending", "2024-02-01"],
        &["2", "", "1", "5", "paid", "2024-02-01"],
        &["3", "", "3", "8", "paid", "2024-02-02"],
        &["4", "", "3", "2", "disputed", "2024-02-03"],
    ])
}

pub fn product_stats() -> Grid {
    grid(&[
        &["Timestamp", "ProductID", "StatType", "DeviceID", "WhatsApp", "AdditionalData"],
        &["2024-03-01T10:00:00.000Z", "1", "view", "dev-a", "", ""],
        &["2024-03-01T10:05:00.000Z", "1", "view", "dev-b", "", ""],
        &["2024-03-01T10:06:00.000Z", "1", "click", "dev-b", "", ""],
        &["2024-03-02T09:00:00.000Z", "1", "purchase", "dev-b", MEMBER_PHONE, ""],
        &["2024-03-05T09:00:00.000Z", "3", "view", "dev-c", "", ""],
    ])
}

/// The full shop sheet.
pub fn shop_store() -> MemoryStore {
    MemoryStore::new()
        .with_table(Table::Products.name(), products())
        .with_table(Table::Categories.name(), categories())
        .with_table(Table::Users.name(), users())
        .with_table(Table::Orders.name(), orders())
        .with_table(Table::Commissions.name(), commissions())
        .with_table(Table::ProductStats.name(), product_stats())
        .with_table(Table::Logs.name(), empty_table(Table::Logs))
}
