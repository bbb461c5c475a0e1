//! Cross-table rollups.
//!
//! Every function here is a pure scan over decoded snapshots: inputs are
//! never mutated, and dangling references (an order pointing at a missing
//! user, a stat for a deleted product) contribute nothing instead of failing.
//! All rollups are full-table scans with no pagination, which caps the
//! practical table size at what fits comfortably in one cached snapshot.

pub mod admin;
pub mod anomalies;
pub mod commission;
pub mod product_stats;

pub use admin::*;
pub use anomalies::*;
pub use commission::*;
pub use product_stats::*;
