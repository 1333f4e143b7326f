//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`RimaySettings::default()`]
//! 2. If `~/.rimay/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)

use std::path::{Path, PathBuf};

use rimay_core::Language;
use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::RimaySettings;

/// Resolve the path to the settings file (`~/.rimay/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".rimay").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<RimaySettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<RimaySettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Defaults merged with the file at `path`, without env overrides.
pub fn load_file_layer(path: &Path) -> Result<RimaySettings> {
    let defaults = serde_json::to_value(RimaySettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `RIMAY_*` environment variable overrides.
pub fn apply_env_overrides(settings: &mut RimaySettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`. Invalid values are ignored with a
/// warning and leave the file/default value in place.
pub fn apply_overrides(settings: &mut RimaySettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read("RIMAY_API_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = read("RIMAY_CONNECT_TIMEOUT_MS") {
        match parse_u64_range(&v, 100, 600_000) {
            Some(ms) => settings.api.connect_timeout_ms = ms,
            None => warn_invalid("RIMAY_CONNECT_TIMEOUT_MS", &v),
        }
    }
    if let Some(v) = read("RIMAY_REQUEST_TIMEOUT_MS") {
        match parse_u64_range(&v, 100, 3_600_000) {
            Some(ms) => settings.api.request_timeout_ms = Some(ms),
            None => warn_invalid("RIMAY_REQUEST_TIMEOUT_MS", &v),
        }
    }
    if let Some(v) = read("RIMAY_DEFAULT_SOURCE") {
        match v.parse::<Language>() {
            Ok(lang) => settings.translation.default_source = lang,
            Err(_) => warn_invalid("RIMAY_DEFAULT_SOURCE", &v),
        }
    }
    if let Some(v) = read("RIMAY_LOG_LEVEL") {
        settings.logging.level = v.to_lowercase();
    }
    if let Some(v) = read("RIMAY_LOG_JSON") {
        match parse_bool(&v) {
            Some(b) => settings.logging.json = b,
            None => warn_invalid("RIMAY_LOG_JSON", &v),
        }
    }
}

fn warn_invalid(key: &str, value: &str) {
    tracing::warn!(key, value, "invalid env var, ignoring");
}

// ── Pure parsing functions ─────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}
