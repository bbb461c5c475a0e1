//! Dispatcher settings.

use serde::{Deserialize, Serialize};

/// Admin login settings.
///
/// When `password` is set, `adminLogin` checks against it. Otherwise the
/// credentials must match a Users row with role `admin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_username")]
    pub username: String,
    pub password: Option<String>,
}

fn default_username() -> String {
    "admin".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: None,
        }
    }
}

impl AdminConfig {
    /// Returns the configured password, treating blank as unset.
    pub fn configured_password(&self) -> Option<&str> {
        self.password
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
