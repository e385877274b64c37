use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::analytics::{ScoreWeights, ScoringError, SelectionMode};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub polling: PollingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var::<u16>("APP_PORT", 3000).map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = parse_var("APP_LOG_ANSI", environment == AppEnvironment::Development)?;

        let defaults = ScoreWeights::default();
        let weights = ScoreWeights::new(
            parse_var("APP_SCORING_POSTS_WEIGHT", defaults.posts_weight)?,
            parse_var("APP_SCORING_TOTAL_WEIGHT", defaults.total_weight)?,
            parse_var("APP_SCORING_HALF_LIFE_DAYS", defaults.half_life_days)?,
        )
        .map_err(ConfigError::Scoring)?;

        let recipient_top_n = parse_var::<usize>("APP_RECIPIENT_TOP_N", 10)?;
        if recipient_top_n == 0 {
            return Err(ConfigError::InvalidValue {
                key: "APP_RECIPIENT_TOP_N",
            });
        }

        let refresh_secs = parse_var::<u64>("APP_REFRESH_INTERVAL_SECS", 10)?;
        if refresh_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "APP_REFRESH_INTERVAL_SECS",
            });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            scoring: ScoringConfig {
                weights,
                recipient_top_n,
            },
            polling: PollingConfig {
                refresh_interval: Duration::from_secs(refresh_secs),
            },
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key }),
        _ => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing output controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Weights and recipient defaults used by the ranking endpoints and refresh job.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub recipient_top_n: usize,
}

impl ScoringConfig {
    pub fn refresh_mode(&self) -> SelectionMode {
        SelectionMode::TopN {
            n: self.recipient_top_n,
        }
    }
}

/// Cadence of the background recipient refresh.
#[derive(Debug, Clone, Copy)]
pub struct PollingConfig {
    pub refresh_interval: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { key: &'static str },
    Scoring(ScoringError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key } => {
                write!(f, "{key} has a value that cannot be used")
            }
            ConfigError::Scoring(err) => write!(f, "scoring weights rejected: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Scoring(err) => Some(err),
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const KEYS: [&str; 10] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_LOG_ANSI",
        "APP_SCORING_POSTS_WEIGHT",
        "APP_SCORING_TOTAL_WEIGHT",
        "APP_SCORING_HALF_LIFE_DAYS",
        "APP_RECIPIENT_TOP_N",
        "APP_REFRESH_INTERVAL_SECS",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.telemetry.ansi);
        assert_eq!(config.scoring.weights, ScoreWeights::default());
        assert_eq!(
            config.scoring.refresh_mode(),
            SelectionMode::TopN { n: 10 }
        );
        assert_eq!(config.polling.refresh_interval, Duration::from_secs(10));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn scoring_overrides_are_validated() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SCORING_HALF_LIFE_DAYS", "7");
        env::set_var("APP_ENV", "production");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.scoring.weights.half_life_days, 7.0);
        assert!(!config.telemetry.ansi);

        env::set_var("APP_SCORING_HALF_LIFE_DAYS", "0");
        assert!(matches!(AppConfig::load(), Err(ConfigError::Scoring(_))));

        env::set_var("APP_SCORING_HALF_LIFE_DAYS", "soon");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidValue {
                key: "APP_SCORING_HALF_LIFE_DAYS"
            })
        ));
        reset_env();
    }

    #[test]
    fn zero_top_n_and_refresh_interval_are_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_RECIPIENT_TOP_N", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidValue {
                key: "APP_RECIPIENT_TOP_N"
            })
        ));

        reset_env();
        env::set_var("APP_REFRESH_INTERVAL_SECS", "0");
        assert!(AppConfig::load().is_err());
        reset_env();
    }
}
