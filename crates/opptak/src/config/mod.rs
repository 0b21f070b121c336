use chrono::{Duration, NaiveTime};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::recruitment::temporal::AccessPolicy;

const TIME_FORMAT: &str = "%H:%M";

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
    pub scheduling: SchedulingConfig,
    pub access: AccessConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let day_start = time_var("OPPTAK_DAY_START", "08:00")?;
        let day_end = time_var("OPPTAK_DAY_END", "18:00")?;
        let interview_minutes = number_var("OPPTAK_INTERVIEW_MINUTES", 30)?;
        if interview_minutes == 0 {
            return Err(ConfigError::InvalidNumber {
                var: "OPPTAK_INTERVIEW_MINUTES",
            });
        }
        let grace_days = number_var("OPPTAK_ACCESS_GRACE_DAYS", 14)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scheduling: SchedulingConfig {
                day_start,
                day_end,
                interview_minutes,
            },
            access: AccessConfig { grace_days },
        })
    }
}

fn time_var(var: &'static str, default: &str) -> Result<NaiveTime, ConfigError> {
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).map_err(|_| ConfigError::InvalidTime { var })
}

fn number_var(var: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidNumber { var }),
        Err(_) => Ok(default),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Working-day window and interview length used to lay out slot columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingConfig {
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub interview_minutes: u32,
}

impl SchedulingConfig {
    pub fn interview_length(&self) -> Duration {
        Duration::minutes(i64::from(self.interview_minutes))
    }
}

/// How long committees keep applicant access after interviews close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessConfig {
    pub grace_days: u32,
}

impl AccessConfig {
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy::new(Duration::days(i64::from(self.grace_days)))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTime { var: &'static str },
    InvalidNumber { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTime { var } => write!(f, "{var} must be a HH:MM time of day"),
            ConfigError::InvalidNumber { var } => {
                write!(f, "{var} must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTime { .. }
            | ConfigError::InvalidNumber { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "OPPTAK_DAY_START",
            "OPPTAK_DAY_END",
            "OPPTAK_INTERVIEW_MINUTES",
            "OPPTAK_ACCESS_GRACE_DAYS",
        ] {
            env::remove_var(var);
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
        assert_eq!(
            config.scheduling.day_start,
            NaiveTime::from_hms_opt(8, 0, 0).expect("valid time")
        );
        assert_eq!(config.scheduling.interview_length(), Duration::minutes(30));
        assert_eq!(config.access.policy().grace(), Duration::days(14));
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
    fn grace_window_is_overridable() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("OPPTAK_ACCESS_GRACE_DAYS", "30");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.access.policy().grace(), Duration::days(30));
        reset_env();
    }

    #[test]
    fn rejects_zero_interview_length_and_bad_times() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("OPPTAK_INTERVIEW_MINUTES", "0");
        match AppConfig::load() {
            Err(ConfigError::InvalidNumber { var }) => assert_eq!(var, "OPPTAK_INTERVIEW_MINUTES"),
            other => panic!("expected invalid number, got {other:?}"),
        }

        reset_env();
        env::set_var("OPPTAK_DAY_END", "six pm");
        match AppConfig::load() {
            Err(ConfigError::InvalidTime { var }) => assert_eq!(var, "OPPTAK_DAY_END"),
            other => panic!("expected invalid time, got {other:?}"),
        }
        reset_env();
    }
}
