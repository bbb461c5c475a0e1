//! Service health: the sheet's reachability and whether fixture fallback
//! keeps reads answering while it is down.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Health status for the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// The sheet is unreachable but reads are served from fixture data.
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    pub fn is_serving(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

#[derive(Debug, Default)]
struct ComponentState {
    healthy: bool,
    message: Option<String>,
    /// When `healthy` last flipped; `None` until first reported.
    since: Option<DateTime<Utc>>,
    consecutive_failures: u64,
}

/// Last reported state of one dependency.
#[derive(Debug)]
pub struct ComponentHealth {
    name: &'static str,
    state: RwLock<ComponentState>,
}

impl ComponentHealth {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RwLock::new(ComponentState {
                healthy: false,
                message: None,
                since: None,
                consecutive_failures: 0,
            }),
        }
    }

    pub fn set_healthy(&self) {
        let mut state = self.state.write();
        if !state.healthy || state.since.is_none() {
            state.since = Some(Utc::now());
        }
        state.healthy = true;
        state.message = None;
        state.consecutive_failures = 0;
    }

    pub fn set_unhealthy(&self, msg: impl Into<String>) {
        let mut state = self.state.write();
        if state.healthy || state.since.is_none() {
            state.since = Some(Utc::now());
        }
        state.healthy = false;
        state.message = Some(msg.into());
        state.consecutive_failures += 1;
    }

    pub fn is_healthy(&self) -> bool {
        self.state.read().healthy
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> Option<String> {
        self.state.read().message.clone()
    }

    fn report(&self) -> ComponentHealthReport {
        let state = self.state.read();
        ComponentHealthReport {
            name: self.name.to_string(),
            healthy: state.healthy,
            message: state.message.clone(),
            since: state.since,
            consecutive_failures: state.consecutive_failures,
        }
    }
}

/// Aggregated health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub fixtures_enabled: bool,
    pub components: Vec<ComponentHealthReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealthReport {
    pub name: String,
    pub healthy: bool,
    pub message: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub consecutive_failures: u64,
}

/// Global health registry.
pub struct HealthRegistry {
    pub sheets: ComponentHealth,
    fixtures_enabled: AtomicBool,
}

impl HealthRegistry {
    pub const fn new() -> Self {
        Self {
            sheets: ComponentHealth::new("sheets"),
            fixtures_enabled: AtomicBool::new(false),
        }
    }

    /// Records whether failed reads fall back to fixture data.
    pub fn set_fixtures_enabled(&self, enabled: bool) {
        self.fixtures_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn fixtures_enabled(&self) -> bool {
        self.fixtures_enabled.load(Ordering::Relaxed)
    }

    pub fn status(&self) -> HealthStatus {
        match (self.sheets.is_healthy(), self.fixtures_enabled()) {
            (true, _) => HealthStatus::Healthy,
            (false, true) => HealthStatus::Degraded,
            (false, false) => HealthStatus::Unhealthy,
        }
    }

    pub fn report(&self) -> HealthReport {
        HealthReport {
            status: self.status(),
            fixtures_enabled: self.fixtures_enabled(),
            components: vec![self.sheets.report()],
        }
    }

    /// Whether requests can be answered, from the sheet or from fixtures.
    pub fn is_ready(&self) -> bool {
        self.status().is_serving()
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global health registry.
pub static HEALTH: std::sync::LazyLock<HealthRegistry> =
    std::sync::LazyLock::new(HealthRegistry::new);

/// Get the global health registry.
pub fn health() -> &'static HealthRegistry {
    &HEALTH
}
