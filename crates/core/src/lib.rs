//! Core records, decoding, aggregation, and validation for the referral gateway.

pub mod address;
pub mod aggregate;
pub mod decode;
pub mod entities;
pub mod error;
pub mod export;
pub mod input;
pub mod limits;
pub mod record;
pub mod tables;

pub use decode::*;
pub use entities::*;
pub use error::{Error, ErrorCode, Result};
pub use record::*;
pub use tables::*;
