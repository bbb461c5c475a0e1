//! Google Sheets v4 REST store.

use async_trait::async_trait;
use gateway_core::{address, Error, Grid, Result};
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use telemetry::{health, metrics};
use tracing::{debug, info, warn};

use crate::config::SheetsConfig;
use crate::store::{RowPosition, TableStore};

/// `values.get` response body.
#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Store backed by a Google spreadsheet, one tab per table.
#[derive(Clone)]
pub struct SheetsStore {
    http: reqwest::Client,
    config: SheetsConfig,
}

impl SheetsStore {
    /// Creates a new store. Missing credentials are reported per operation,
    /// not here, so the service can still start and serve fixtures.
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            spreadsheet_configured = !config.spreadsheet_id.is_empty(),
            "Created Sheets store"
        );

        Ok(Self { http, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    fn values_url(&self, range: &str, suffix: &str) -> Result<String> {
        if self.config.spreadsheet_id.trim().is_empty() {
            return Err(Error::config("Missing spreadsheet id"));
        }
        Ok(format!(
            "{}/spreadsheets/{}/values/{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.spreadsheet_id,
            urlencoding::encode(range),
            suffix
        ))
    }

    /// Builds an authorized request. API keys only grant reads.
    fn request(&self, method: Method, url: String, write: bool) -> Result<RequestBuilder> {
        let builder = self.http.request(method, url);
        if let Some(ref token) = self.config.access_token {
            return Ok(builder.bearer_auth(token));
        }
        match self.config.api_key {
            Some(ref key) if !write => Ok(builder.query(&[("key", key.as_str())])),
            Some(_) => Err(Error::config("Writes require an access token")),
            None => Err(Error::config("Missing Sheets credentials")),
        }
    }

    async fn send(&self, table: &str, request: RequestBuilder) -> Result<serde_json::Value> {
        let start = Instant::now();

        let response = request.send().await.map_err(|e| {
            health().sheets.set_unhealthy(e.to_string());
            warn!(table = %table, error = %e, "Sheets request failed");
            if e.is_timeout() {
                Error::store_timeout(table, self.config.timeout())
            } else {
                Error::store(table, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.is_server_error() || status == reqwest::StatusCode::FORBIDDEN {
                health().sheets.set_unhealthy(format!("HTTP {}", status));
            }
            warn!(table = %table, status = %status, body = %body, "Sheets returned error");
            return Err(Error::store(table, format!("HTTP {}: {}", status, body)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::store(table, format!("invalid response: {}", e)))?;

        health().sheets.set_healthy();
        metrics()
            .store_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        Ok(body)
    }

    async fn write_values(&self, table: &str, range: &str, rows: Vec<Vec<String>>) -> Result<()> {
        let url = self.values_url(range, "")?;
        let request = self
            .request(Method::PUT, url, true)?
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "range": range, "values": rows }));

        self.send(table, request).await?;
        Ok(())
    }
}

/// Renders one JSON cell the way the sheet displays it.
fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(true) => "TRUE".to_string(),
        serde_json::Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TableStore for SheetsStore {
    async fn read_range(&self, table: &str) -> Result<Grid> {
        let range = address::table_range(table);
        let url = self.values_url(&range, "")?;
        let request = self
            .request(Method::GET, url, false)?
            .query(&[("valueRenderOption", "FORMATTED_VALUE")]);

        let body = self.send(table, request).await?;
        let parsed: ValueRange = serde_json::from_value(body)
            .map_err(|e| Error::store(table, format!("invalid value range: {}", e)))?;

        let grid: Grid = parsed
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        debug!(table = %table, rows = grid.len(), "Read table from Sheets");
        Ok(grid)
    }

    /// Appends by reading the current row count and writing just below it.
    ///
    /// Not safe under concurrent writers: two processes that read the same
    /// length will both write the same row and the later write wins. The
    /// gateway assumes a single writer per spreadsheet.
    async fn append_row(&self, table: &str, row: Vec<String>) -> Result<RowPosition> {
        let current = self.read_range(table).await?;
        let position = RowPosition {
            row: current.len() + 1,
        };

        let range = address::row_anchor(table, position.row);
        self.write_values(table, &range, vec![row]).await?;

        debug!(table = %table, row = position.row, "Appended row to Sheets");
        Ok(position)
    }

    async fn update_cell(&self, table: &str, address: &str, value: String) -> Result<()> {
        self.write_values(table, address, vec![vec![value]]).await?;
        debug!(table = %table, address = %address, "Updated cell in Sheets");
        Ok(())
    }

    async fn clear_range(&self, table: &str, range: &str) -> Result<()> {
        let url = self.values_url(range, ":clear")?;
        let request = self.request(Method::POST, url, true)?.json(&json!({}));

        self.send(table, request).await?;
        debug!(table = %table, range = %range, "Cleared range in Sheets");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sheets"
    }
}
