//! Watcher configuration, read from a RON file with env-var overrides.
//!
//! ```ron
//! (
//!     endpoint: "http://127.0.0.1:8080/status",
//!     interval_ms: 3000,
//!     html_output: Some("./public/jobs.html"),
//!     log: Both,
//! )
//! ```
//!
//! Every field is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fmt, fs, io};

use jobwatch_core::PollSettings;
use jobwatch_engine::{FetchSettings, DEFAULT_POLL_INTERVAL, DEFAULT_STATUS_ENDPOINT};
use jobwatch_logging::LogDestination;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "JOBWATCH_CONFIG";
pub const ENDPOINT_VAR: &str = "JOBWATCH_ENDPOINT";
const DEFAULT_CONFIG_PATH: &str = "./jobwatch.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum LogTarget {
    #[default]
    Terminal,
    File,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    pub endpoint: String,
    pub interval_ms: u64,
    pub request_timeout_ms: u64,
    pub skip_when_in_flight: bool,
    pub report_http_status: bool,
    /// Print the table to stdout after every render.
    pub print_table: bool,
    pub html_output: Option<PathBuf>,
    pub log: LogTarget,
    pub log_file: PathBuf,
    pub log_level: String,
    /// Stop after this many completed poll cycles. `None` polls forever.
    pub max_polls: Option<u64>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            endpoint: DEFAULT_STATUS_ENDPOINT.to_string(),
            interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            skip_when_in_flight: false,
            report_http_status: false,
            print_table: true,
            html_output: None,
            log: LogTarget::Terminal,
            log_file: PathBuf::from("./jobwatch.log"),
            log_level: "info".to_string(),
            max_polls: None,
        }
    }
}

impl WatchConfig {
    pub fn from_ron(path: &Path, text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup(ENDPOINT_VAR).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint is empty".into()));
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::Invalid("interval_ms must be positive".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be positive".into(),
            ));
        }
        if self.max_polls == Some(0) {
            return Err(ConfigError::Invalid("max_polls must be positive".into()));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            endpoint: self.endpoint.clone(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            ..FetchSettings::default()
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            skip_when_in_flight: self.skip_when_in_flight,
            report_http_status: self.report_http_status,
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown log_level {:?}", self.log_level)))
    }
}

pub fn config_path_from_env() -> PathBuf {
    std::env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Where the loaded config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at this path; every field is a default.
    Defaults(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "Loaded config from {:?}", path),
            ConfigSource::Defaults(path) => write!(f, "No config at {:?}, using defaults", path),
        }
    }
}

/// Load the config at `path`; a missing file yields the defaults.
pub fn load(path: &Path) -> Result<(WatchConfig, ConfigSource), ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok((
            WatchConfig::from_ron(path, &text)?,
            ConfigSource::File(path.to_path_buf()),
        )),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok((
            WatchConfig::default(),
            ConfigSource::Defaults(path.to_path_buf()),
        )),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.ron");
        let (config, source) = load(&path).unwrap();
        assert_eq!(source, ConfigSource::Defaults(path.clone()));
        assert_eq!(
            source.to_string(),
            format!("No config at {:?}, using defaults", path)
        );
        assert_eq!(config, WatchConfig::default());
        assert_eq!(config.interval(), Duration::from_millis(3000));
        assert_eq!(config.endpoint, "http://127.0.0.1:8080/status");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jobwatch.ron");
        fs::write(
            &path,
            r#"(
                endpoint: "http://jobs.internal/status",
                interval_ms: 500,
                html_output: Some("out/jobs.html"),
                log: Both,
                max_polls: Some(3),
            )"#,
        )
        .unwrap();

        let (config, source) = load(&path).unwrap();
        assert_eq!(source.to_string(), format!("Loaded config from {:?}", path));
        assert_eq!(source, ConfigSource::File(path));
        assert_eq!(config.endpoint, "http://jobs.internal/status");
        assert_eq!(config.interval_ms, 500);
        assert_eq!(config.html_output, Some(PathBuf::from("out/jobs.html")));
        assert_eq!(config.max_polls, Some(3));
        assert_eq!(
            config.log_destination(),
            LogDestination::Both(PathBuf::from("./jobwatch.log"))
        );
        assert!(!config.report_http_status);
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = WatchConfig::from_ron(Path::new("x.ron"), "(intervall_ms: 5)").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn endpoint_env_var_wins() {
        let config = WatchConfig::default().with_env_overrides(|key| {
            (key == ENDPOINT_VAR).then(|| " http://other:9000/status ".to_string())
        });
        assert_eq!(config.endpoint, "http://other:9000/status");
        assert_eq!(config.fetch_settings().endpoint, "http://other:9000/status");
    }

    #[test]
    fn validation_rejects_zero_interval_and_bad_level() {
        let zero = WatchConfig {
            interval_ms: 0,
            ..WatchConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid(_))));

        let level = WatchConfig {
            log_level: "chatty".to_string(),
            ..WatchConfig::default()
        };
        assert!(matches!(level.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn poll_settings_follow_flags() {
        let config = WatchConfig {
            skip_when_in_flight: true,
            report_http_status: true,
            ..WatchConfig::default()
        };
        assert_eq!(
            config.poll_settings(),
            PollSettings {
                skip_when_in_flight: true,
                report_http_status: true,
            }
        );
    }
}
