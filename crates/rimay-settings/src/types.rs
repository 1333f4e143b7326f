//! Settings type definitions.
//!
//! Field names are camelCase in JSON. Every section is `#[serde(default)]`
//! so a settings file only needs the keys it changes.

use std::collections::BTreeMap;

use rimay_core::Language;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "api": { "baseUrl": "http://192.168.1.20:5000" },
///   "logging": { "level": "debug" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RimaySettings {
    /// Backend connection.
    pub api: ApiSettings,
    /// Translation defaults.
    pub translation: TranslationSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl RimaySettings {
    /// Reject values no client can work with.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(SettingsError::InvalidValue("api.baseUrl is empty".into()));
        }
        if self.api.connect_timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "api.connectTimeoutMs must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Root URL of the translation backend.
    pub base_url: String,
    pub connect_timeout_ms: u64,
    /// Overall per-request deadline. `None` waits indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout_ms: 10_000,
            request_timeout_ms: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationSettings {
    /// Source language used when a command does not specify one.
    pub default_source: Language,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            default_source: Language::Es,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    /// Per-target level overrides, e.g. `{"rimay_client": "debug"}`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub module_levels: BTreeMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            module_levels: BTreeMap::new(),
        }
    }
}
