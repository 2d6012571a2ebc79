//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP listener settings
//! - `simulation`: random seed, acceptable failure rate, incident windows
//!
//! Logging settings live with the telemetry module.
//!
//! Sources are layered: serde defaults, then an optional TOML file
//! (`config.toml` or the path in `SYNTHETIC_CONFIG`), then `SYNTHETIC_*`
//! environment variables using `__` for nesting, e.g.
//! `SYNTHETIC_SERVER__PORT=9090` or
//! `SYNTHETIC_SIMULATION__ERROR_INCIDENT__TRIGGER_MINUTES=10,40`.

mod server;
mod simulation;

use std::path::Path;

use application::{ApplicationError, EngineSettings};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::telemetry::TelemetryConfig;

pub use server::ServerConfig;
pub use simulation::{DEFAULT_FIXED_DURATION_MINUTES, IncidentConfig, SimulationConfig};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "SYNTHETIC_CONFIG";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "SYNTHETIC";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// `SYNTHETIC_*` variables, `__` between sections, comma-separated lists
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("simulation.latency_incident.trigger_minutes")
        .with_list_parse_key("simulation.error_incident.trigger_minutes")
        .try_parsing(true)
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Simulation configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    pub fn load() -> Result<Self, config::ConfigError> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_layered(explicit.as_deref().map(Path::new), Some(environment()))
    }

    /// Load configuration from a specific file, ignoring the environment
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::load_layered(Some(path), None)
    }

    fn load_layered(
        path: Option<&Path>,
        env: Option<config::Environment>,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            // An explicitly named file must exist
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let mut builder = config::Config::builder().add_source(file);
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(source = ?path, "Configuration sources merged");
        Ok(config)
    }

    /// Check the whole configuration and derive the engine settings
    pub fn validate(&self) -> Result<EngineSettings, ApplicationError> {
        if self.server.host.trim().is_empty() {
            return Err(ApplicationError::Configuration(
                "server.host must not be empty".to_string(),
            ));
        }
        self.simulation.engine_settings()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use application::IncidentPlan;
    use domain::IncidentWindow;

    use super::*;
    use crate::telemetry::LogFormat;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_all_sections_from_toml() {
        let file = write_config(
            r#"
[server]
host = "127.0.0.1"
port = 9191

[telemetry]
log_format = "json"

[simulation]
seed = 1234
acceptable_failure_percent = 2

[simulation.latency_incident]
enabled = false

[simulation.error_incident]
trigger_minutes = [5, 35]
duration_minutes = 4
"#,
        );

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.bind_address(), "127.0.0.1:9191");
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(config.simulation.seed, Some(1234));

        let settings = config.validate().unwrap();
        assert_eq!(settings.acceptable_failure_percent, 2);
        assert_eq!(settings.latency_incident, IncidentPlan::Disabled);
        assert_eq!(
            settings.error_incident,
            IncidentPlan::Fixed(IncidentWindow::new(vec![5, 35], 4).unwrap())
        );
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = write_config("");
        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load_from(Path::new("/nonexistent/synthetic.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let file = write_config(
            r"
[simulation]
acceptable_failure_percent = 150
",
        );
        let config = AppConfig::load_from(file.path()).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ApplicationError::Configuration(_))
        ));
    }

    fn load_with_env(vars: &[(&str, &str)]) -> Result<AppConfig, config::ConfigError> {
        let mut map = config::Map::new();
        for (key, value) in vars {
            map.insert((*key).to_string(), (*value).to_string());
        }
        AppConfig::load_layered(None, Some(environment().source(Some(map))))
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = load_with_env(&[
            ("SYNTHETIC_SERVER__PORT", "9090"),
            ("SYNTHETIC_TELEMETRY__LOG_FORMAT", "json"),
            ("SYNTHETIC_SIMULATION__ACCEPTABLE_FAILURE_PERCENT", "2"),
            ("SYNTHETIC_SIMULATION__ERROR_INCIDENT__TRIGGER_MINUTES", "10,40"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(config.simulation.acceptable_failure_percent, 2);
        assert_eq!(
            config.simulation.error_incident.trigger_minutes,
            Some(vec![10, 40])
        );
    }

    #[test]
    fn environment_accepts_a_single_trigger_minute() {
        let config = load_with_env(&[
            ("SYNTHETIC_SIMULATION__LATENCY_INCIDENT__TRIGGER_MINUTES", "7"),
            ("SYNTHETIC_SIMULATION__LATENCY_INCIDENT__DURATION_MINUTES", "3"),
        ])
        .unwrap();

        let settings = config.validate().unwrap();
        assert_eq!(
            settings.latency_incident,
            IncidentPlan::Fixed(IncidentWindow::new(vec![7], 3).unwrap())
        );
    }

    #[test]
    fn environment_can_disable_an_incident() {
        let config = load_with_env(&[("SYNTHETIC_SIMULATION__ERROR_INCIDENT__ENABLED", "false")])
            .unwrap();
        assert_eq!(
            config.validate().unwrap().error_incident,
            IncidentPlan::Disabled
        );
    }

    #[test]
    fn empty_host_fails_validation() {
        let mut config = AppConfig::default();
        config.server.host = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
