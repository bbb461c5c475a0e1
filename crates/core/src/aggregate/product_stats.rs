//! Product interaction rollups: per-product counters, range summaries,
//! conversion rates, and daily series.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::entities::{find_by_key, parse_timestamp, StatType};
use crate::error::{Error, Result};
use crate::limits::TOP_PRODUCTS;
use crate::record::Record;

/// Interaction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCounters {
    pub views: u64,
    pub clicks: u64,
    pub shares: u64,
    pub likes: u64,
    pub purchases: u64,
}

impl StatCounters {
    pub fn record(&mut self, stat: StatType) {
        match stat {
            StatType::View => self.views += 1,
            StatType::Click => self.clicks += 1,
            StatType::Share => self.shares += 1,
            StatType::Like => self.likes += 1,
            StatType::Purchase => self.purchases += 1,
        }
    }

    pub fn add(&mut self, other: &StatCounters) {
        self.views += other.views;
        self.clicks += other.clicks;
        self.shares += other.shares;
        self.likes += other.likes;
        self.purchases += other.purchases;
    }
}

/// Funnel conversion percentages, rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRates {
    pub click_to_view_rate: f64,
    pub share_to_click_rate: f64,
    pub purchase_to_share_rate: f64,
}

impl ConversionRates {
    pub fn from_counters(counters: &StatCounters) -> Self {
        Self {
            click_to_view_rate: percentage(counters.clicks, counters.views),
            share_to_click_rate: percentage(counters.shares, counters.clicks),
            purchase_to_share_rate: percentage(counters.purchases, counters.shares),
        }
    }
}

/// `numerator / denominator` as a percentage with two decimals; 0 when the
/// denominator is 0.
pub fn percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let pct = numerator as f64 / denominator as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// One raw interaction, as kept in a product's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatEvent {
    pub timestamp: String,
    pub stat_type: String,
    pub device_id: String,
    pub whatsapp: String,
    pub additional_data: String,
    #[serde(skip)]
    pub at: Option<DateTime<Utc>>,
}

impl StatEvent {
    pub fn from_record(record: &Record) -> Self {
        let timestamp = record.text("Timestamp");
        Self {
            at: parse_timestamp(&timestamp),
            timestamp,
            stat_type: record.text("StatType"),
            device_id: record.text("DeviceID"),
            whatsapp: record.text("WhatsApp"),
            additional_data: record.text("AdditionalData"),
        }
    }

    pub fn kind(&self) -> Option<StatType> {
        StatType::from_str(&self.stat_type).ok()
    }
}

/// Optional filters for the per-product rollup.
#[derive(Debug, Clone, Default)]
pub struct StatsFilter {
    pub product_id: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl StatsFilter {
    pub fn product(product_id: impl Into<String>) -> Self {
        Self {
            product_id: Some(product_id.into()),
            ..Default::default()
        }
    }

    pub fn window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    fn has_dates(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    fn accepts(&self, product_key: &str, event: &StatEvent) -> bool {
        if let Some(ref wanted) = self.product_id {
            if crate::record::Value::text(wanted.as_str()).key() != product_key {
                return false;
            }
        }
        if !self.has_dates() {
            return true;
        }
        let Some(at) = event.at else {
            return false;
        };
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at <= e)
    }
}

/// Parses a filter bound. Bare dates cover the whole day: a start date
/// begins at midnight, an end date runs through 23:59:59.999.
pub fn parse_date_bound(raw: &str, is_end: bool) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = if is_end {
            date.and_hms_milli_opt(23, 59, 59, 999)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        return time
            .map(|t| t.and_utc())
            .ok_or_else(|| Error::validation(format!("invalid date: {}", raw)));
    }
    parse_timestamp(raw).ok_or_else(|| Error::validation(format!("invalid date: {}", raw)))
}

/// Rollup for a single product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStatsGroup {
    pub product_id: String,
    pub product_name: Option<String>,
    pub category_id: Option<String>,
    pub price: Option<f64>,
    pub commission: Option<f64>,
    #[serde(flatten)]
    pub counters: StatCounters,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub timeline: Vec<StatEvent>,
}

impl ProductStatsGroup {
    fn new(product_id: String, product: Option<&Record>) -> Self {
        let mut group = Self {
            product_id,
            ..Default::default()
        };
        if let Some(p) = product {
            group.product_name = Some(p.text("Name"));
            group.category_id = Some(p.text("CategoryID"));
            let member = p.number("MemberPrice");
            group.price = Some(if member > 0.0 { member } else { p.number("OriginalPrice") });
            group.commission = Some(p.number("Commission"));
        }
        group
    }
}

/// Groups stat events by product, counting each stat type and keeping the
/// raw events ordered by time. Groups come back sorted by product id.
pub fn rollup_product_stats(
    stats: &[Record],
    products: &[Record],
    filter: &StatsFilter,
) -> Vec<ProductStatsGroup> {
    let mut groups: BTreeMap<String, ProductStatsGroup> = BTreeMap::new();

    for record in stats {
        let product_key = record.key("ProductID");
        if product_key.is_empty() {
            continue;
        }
        let event = StatEvent::from_record(record);
        if !filter.accepts(&product_key, &event) {
            continue;
        }

        let group = groups.entry(product_key.clone()).or_insert_with(|| {
            ProductStatsGroup::new(product_key.clone(), find_by_key(products, "ID", &product_key))
        });
        if let Some(kind) = event.kind() {
            group.counters.record(kind);
        }
        group.timeline.push(event);
    }

    let mut groups: Vec<ProductStatsGroup> = groups.into_values().collect();
    for group in &mut groups {
        group.timeline.sort_by_key(|e| e.at);
    }
    groups
}

/// Counters for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: String,
    #[serde(flatten)]
    pub counters: StatCounters,
}

/// Buckets events by the UTC date of their timestamp, ascending.
/// Events without a parseable timestamp are left out.
pub fn daily_series<'a>(events: impl IntoIterator<Item = &'a StatEvent>) -> Vec<DailyStat> {
    let mut days: BTreeMap<String, StatCounters> = BTreeMap::new();
    for event in events {
        let Some(at) = event.at else {
            continue;
        };
        let counters = days.entry(at.format("%Y-%m-%d").to_string()).or_default();
        if let Some(kind) = event.kind() {
            counters.record(kind);
        }
    }
    days.into_iter()
        .map(|(date, counters)| DailyStat { date, counters })
        .collect()
}

/// Symbolic summary window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsRange {
    #[serde(rename = "1d")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl StatsRange {
    /// Parses `1d`/`7d`/`30d`; anything else falls back to `7d`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("1d") => Self::Day,
            Some("30d") => Self::Month,
            _ => Self::Week,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::Day => Duration::days(1),
            Self::Week => Duration::days(7),
            Self::Month => Duration::days(30),
        }
    }

    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (now - self.duration(), now)
    }
}

/// Sitewide interaction summary for a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub range: StatsRange,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub totals: StatCounters,
    pub conversion_rates: ConversionRates,
    pub daily_stats: Vec<DailyStat>,
    pub product_count: usize,
    /// Most viewed products, without their timelines.
    pub top_products: Vec<ProductStatsGroup>,
}

pub fn summarize_stats(
    stats: &[Record],
    products: &[Record],
    range: StatsRange,
    now: DateTime<Utc>,
) -> StatsSummary {
    let (start, end) = range.window(now);
    let groups = rollup_product_stats(stats, products, &StatsFilter::default().window(start, end));

    let mut totals = StatCounters::default();
    for group in &groups {
        totals.add(&group.counters);
    }

    let daily_stats = daily_series(groups.iter().flat_map(|g| g.timeline.iter()));

    let mut top_products: Vec<ProductStatsGroup> = groups
        .iter()
        .map(|g| ProductStatsGroup {
            timeline: Vec::new(),
            ..g.clone()
        })
        .collect();
    top_products.sort_by(|a, b| b.counters.views.cmp(&a.counters.views));
    top_products.truncate(TOP_PRODUCTS);

    StatsSummary {
        range,
        start_date: start,
        end_date: end,
        totals,
        conversion_rates: ConversionRates::from_counters(&totals),
        daily_stats,
        product_count: groups.len(),
        top_products,
    }
}

/// Detail view for one product over a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailStats {
    pub range: StatsRange,
    pub stats: ProductStatsGroup,
    pub conversion_rates: ConversionRates,
    pub daily_stats: Vec<DailyStat>,
}

/// Rollup for one product. A product with no events still gets a zeroed
/// group carrying its metadata.
pub fn product_detail_stats(
    stats: &[Record],
    products: &[Record],
    product_id: &str,
    range: StatsRange,
    now: DateTime<Utc>,
) -> ProductDetailStats {
    let (start, end) = range.window(now);
    let filter = StatsFilter::product(product_id).window(start, end);

    let group = rollup_product_stats(stats, products, &filter)
        .into_iter()
        .next()
        .unwrap_or_else(|| {
            let key = crate::record::Value::text(product_id).key();
            ProductStatsGroup::new(key, find_by_key(products, "ID", product_id))
        });

    ProductDetailStats {
        range,
        conversion_rates: ConversionRates::from_counters(&group.counters),
        daily_stats: daily_series(group.timeline.iter()),
        stats: group,
    }
}
