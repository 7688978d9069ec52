use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_STORE_URL_ENV: &str = "PPPSYNC_DATABASE_URL";
pub const DEFAULT_ROUTER_PASSWORD_ENV: &str = "PPPSYNC_ROUTER_PASSWORD";

/// Typed view over the merged config. Unknown keys are rejected so typos
/// fail loudly instead of silently falling back to a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub store: StoreSettings,
    pub router: RouterSettings,
    pub update: UpdateSettings,
}

impl Settings {
    pub fn from_config_json(config_json: &Value) -> Result<Self> {
        serde_json::from_value(config_json.clone()).context("CONFIG_INVALID: settings")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    /// Env var holding the MySQL connection URL.
    pub url_env: String,
    pub max_connections: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url_env: DEFAULT_STORE_URL_ENV.to_string(),
            max_connections: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterSettings {
    /// `host:port` of the router's SSH service.
    pub address: String,
    pub login: String,
    /// Env var holding the router password.
    pub password_env: String,
    pub connect_timeout_secs: u64,
    /// 0 disables the per-operation timeout after login.
    pub command_timeout_secs: u64,
    /// Hex SHA-256 host key pin; absent accepts any host key.
    pub host_key_sha256: Option<String>,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:22".to_string(),
            login: "admin".to_string(),
            password_env: DEFAULT_ROUTER_PASSWORD_ENV.to_string(),
            connect_timeout_secs: 5,
            command_timeout_secs: 0,
            host_key_sha256: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateSettings {
    /// Devices reconciled when the CLI is given none.
    pub device_ids: Vec<i64>,
}
