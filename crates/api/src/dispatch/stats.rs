//! Product interaction events and their rollups.

use chrono::Utc;
use gateway_core::aggregate::{
    parse_date_bound, product_detail_stats, rollup_product_stats, summarize_stats, StatsFilter,
    StatsRange,
};
use gateway_core::input::normalize_whatsapp;
use gateway_core::{Error, Record, Result, StatType, Table};
use tracing::debug;

use super::now_cell;
use crate::params::Params;
use crate::response::Envelope;
use crate::state::AppState;

async fn append_stat(state: &AppState, params: &Params, stat: StatType) -> Result<Envelope> {
    let product_id = params.require("productId")?;
    let whatsapp = match params.text("whatsapp") {
        Some(raw) => normalize_whatsapp(&raw)?,
        None => String::new(),
    };

    let event = Record::new()
        .with("Timestamp", now_cell())
        .with("ProductID", product_id.as_str())
        .with("StatType", stat.as_str())
        .with("DeviceID", params.text_of(&["deviceId", "userId"]).unwrap_or_default())
        .with("WhatsApp", whatsapp)
        .with("AdditionalData", params.cell_text("additionalData"));

    state
        .tables
        .append_record(Table::ProductStats, event)
        .await?;

    debug!(product_id = %product_id, stat = stat.as_str(), "Recorded product stat");
    Ok(Envelope::done("Stat recorded"))
}

pub(super) async fn record_product_stat(state: &AppState, params: &Params) -> Result<Envelope> {
    let raw = params.require("statType")?;
    let stat: StatType = raw.parse().map_err(|_| {
        Error::validation(format!(
            "Invalid statType: {} (expected view, click, share, like, or purchase)",
            raw
        ))
    })?;
    append_stat(state, params, stat).await
}

pub(super) async fn record_product_view(state: &AppState, params: &Params) -> Result<Envelope> {
    append_stat(state, params, StatType::View).await
}

pub(super) async fn get_product_stats(state: &AppState, params: &Params) -> Result<Envelope> {
    let filter = StatsFilter {
        product_id: params.text("productId"),
        start: params
            .text("startDate")
            .map(|raw| parse_date_bound(&raw, false))
            .transpose()?,
        end: params
            .text("endDate")
            .map(|raw| parse_date_bound(&raw, true))
            .transpose()?,
    };

    let (stats, products) = tokio::try_join!(
        state.tables.snapshot(Table::ProductStats),
        state.tables.snapshot(Table::Products),
    )?;

    let groups = rollup_product_stats(&stats.records, &products.records, &filter);
    Envelope::data(&groups)
}

pub(super) async fn get_stats_summary(state: &AppState, params: &Params) -> Result<Envelope> {
    let range = StatsRange::parse(params.text("range").as_deref());

    let (stats, products) = tokio::try_join!(
        state.tables.snapshot(Table::ProductStats),
        state.tables.snapshot(Table::Products),
    )?;

    let summary = summarize_stats(&stats.records, &products.records, range, Utc::now());
    Envelope::data(&summary)
}

pub(super) async fn get_product_detail_stats(state: &AppState, params: &Params) -> Result<Envelope> {
    let product_id = params.require("productId")?;
    let range = StatsRange::parse(params.text("range").as_deref());

    let (stats, products) = tokio::try_join!(
        state.tables.snapshot(Table::ProductStats),
        state.tables.snapshot(Table::Products),
    )?;

    let detail = product_detail_stats(
        &stats.records,
        &products.records,
        &product_id,
        range,
        Utc::now(),
    );
    Envelope::data(&detail)
}
