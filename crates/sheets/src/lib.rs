//! Spreadsheet-backed table store for the referral gateway.
//!
//! Layers, leaf to root:
//! - [`TableStore`]: raw grid reads and cell writes (remote sheet, memory, fallback)
//! - [`TableCache`]: decoded snapshots with a TTL and single-flight fills
//! - [`Tables`]: the repository every request goes through; writes invalidate

pub mod cache;
pub mod client;
pub mod config;
pub mod fallback;
pub mod fixtures;
pub mod health;
pub mod memory;
pub mod repository;
pub mod store;

pub use cache::*;
pub use client::*;
pub use config::*;
pub use fallback::*;
pub use memory::*;
pub use repository::*;
pub use store::*;
