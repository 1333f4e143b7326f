use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Configuration for the telemetry subsystem.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// Default log level. Overridden by RUST_LOG env var.
    pub log_level: Level,
    /// Per-module level overrides (e.g. "rimay_client" => DEBUG).
    pub module_levels: Vec<(String, Level)>,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Level::WARN,
            module_levels: Vec::new(),
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Filter directives, e.g. `info,rimay_client=debug`.
    pub fn filter_directives(&self) -> String {
        let mut filter = self.log_level.to_string().to_lowercase();
        for (module, level) in &self.module_levels {
            filter.push_str(&format!(",{}={}", module, level.to_string().to_lowercase()));
        }
        filter
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Parse a level name such as `info` or `DEBUG`.
pub fn parse_level(value: &str) -> Option<Level> {
    value.trim().parse().ok()
}

/// Initialize the global tracing subscriber. Call once at startup.
///
/// Output goes to stderr so command output on stdout stays clean.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

    let json_layer = config.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, Level::WARN);
        assert!(!config.json);
        assert_eq!(config.filter_directives(), "warn");
    }

    #[test]
    fn module_overrides_in_directives() {
        let config = TelemetryConfig {
            log_level: Level::INFO,
            module_levels: vec![
                ("rimay_client".into(), Level::DEBUG),
                ("rimay_engine".into(), Level::TRACE),
            ],
            json: true,
        };
        assert_eq!(
            config.filter_directives(),
            "info,rimay_client=debug,rimay_engine=trace"
        );
    }

    #[test]
    fn level_parsing() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level(" WARN "), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn second_init_is_an_error() {
        let config = TelemetryConfig::default();
        let _ = init_telemetry(&config);
        let err = init_telemetry(&config).unwrap_err();
        assert!(err.to_string().contains("tracing subscriber"));
    }
}
