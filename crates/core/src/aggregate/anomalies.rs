//! Devices shared between several WhatsApp numbers.
//!
//! One device reporting interactions for many numbers usually means someone
//! is farming referral commissions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::record::{phone_key, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAnomaly {
    pub device_id: String,
    pub whatsapp_numbers: Vec<String>,
    pub event_count: usize,
}

/// Reports devices linked to more than one distinct WhatsApp number,
/// most numbers first.
pub fn detect_device_anomalies(stats: &[Record]) -> Vec<DeviceAnomaly> {
    let mut devices: BTreeMap<String, (BTreeSet<String>, usize)> = BTreeMap::new();

    for record in stats {
        let device = record.text("DeviceID").trim().to_string();
        if device.is_empty() {
            continue;
        }
        let entry = devices.entry(device).or_default();
        entry.1 += 1;
        let number = phone_key(&record.text("WhatsApp"));
        if !number.is_empty() {
            entry.0.insert(number);
        }
    }

    let mut anomalies: Vec<DeviceAnomaly> = devices
        .into_iter()
        .filter(|(_, (numbers, _))| numbers.len() > 1)
        .map(|(device_id, (numbers, event_count))| DeviceAnomaly {
            device_id,
            whatsapp_numbers: numbers.into_iter().collect(),
            event_count,
        })
        .collect();
    anomalies.sort_by(|a, b| b.whatsapp_numbers.len().cmp(&a.whatsapp_numbers.len()));
    anomalies
}
