//! Limits and fixed conventions for the referral gateway.
//!
//! The spreadsheet is read as `A:Z`, so every table is capped at 26 columns.
//! Tables are expected to stay small (hundreds to low thousands of rows):
//! every aggregation is a full scan of the cached snapshot.

// === Sheet Layout ===

/// Last column read from every table.
pub const LAST_COLUMN: &str = "Z";

/// Maximum number of columns a table may use.
pub const MAX_COLUMNS: usize = 26;

// === Cache ===

/// Default snapshot time-to-live (5 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default bound on a single store call.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Default per-request HTTP timeout to the sheet; kept under the store bound
/// so a hung request surfaces as a read failure first.
pub const DEFAULT_SHEETS_HTTP_TIMEOUT_SECS: u64 = 8;

// === Input Limits ===

/// WhatsApp numbers after stripping spaces, dashes, and parentheses.
pub const WHATSAPP_PATTERN: &str = r"^\+?[0-9]{6,20}$";

/// Product and category name max length.
pub const MAX_NAME_LEN: usize = 200;

/// Free-form text (descriptions, anomaly details) max length.
pub const MAX_TEXT_LEN: usize = 4000;

/// Maximum products accepted by one import.
pub const MAX_IMPORT_ROWS: usize = 500;

// === Stats ===

/// Number of products listed in a stats summary.
pub const TOP_PRODUCTS: usize = 10;
