//! Spreadsheet store and cache configuration.

use gateway_core::limits::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_SHEETS_HTTP_TIMEOUT_SECS, DEFAULT_STORE_TIMEOUT_SECS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Google Sheets connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Sheets REST base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Spreadsheet id (from the sheet URL)
    #[serde(default)]
    pub spreadsheet_id: String,
    /// API key; enough for reads of a shared sheet
    pub api_key: Option<String>,
    /// OAuth access token; required for writes
    pub access_token: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_SHEETS_HTTP_TIMEOUT_SECS
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            spreadsheet_id: String::new(),
            api_key: None,
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SheetsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Snapshot cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Snapshot time-to-live in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Upper bound on a single store call, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_store_timeout_ms() -> u64 {
    DEFAULT_STORE_TIMEOUT_SECS * 1000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Deadline for a primary read behind the fixture fallback: the HTTP
    /// timeout, capped at four fifths of the store bound so the fallback
    /// answers before the cache gives up.
    pub fn fallback_read_limit(&self, http_timeout: Duration) -> Duration {
        http_timeout.min(self.store_timeout() * 4 / 5)
    }
}
