use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::reminders::ReminderSchedule;
use crate::workflows::screening::CategoryBucketing;

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
    pub screening: ScreeningConfig,
    pub reminders: ReminderSchedule,
    pub links: LinkConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let include_targets = env::var("APP_LOG_TARGETS")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let bucketing = match env::var("SCREENING_BUCKETING") {
            Ok(raw) => CategoryBucketing::parse(&raw)
                .ok_or(ConfigError::InvalidBucketing { value: raw })?,
            Err(_) => CategoryBucketing::default(),
        };

        let defaults = ReminderSchedule::default();
        let reminders = ReminderSchedule {
            cadence_minutes: minutes_var("REMINDER_CADENCE_MINUTES", defaults.cadence_minutes)?,
            reminder_delay_minutes: minutes_var(
                "REMINDER_DELAY_MINUTES",
                defaults.reminder_delay_minutes,
            )?,
            missed_after_minutes: minutes_var(
                "REMINDER_MISSED_AFTER_MINUTES",
                defaults.missed_after_minutes,
            )?,
            weather_hour: hour_var("WEATHER_NOTIFY_HOUR", defaults.weather_hour)?,
        };
        if reminders.cadence_minutes == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "REMINDER_CADENCE_MINUTES",
            });
        }

        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                include_targets,
            },
            screening: ScreeningConfig { bucketing },
            reminders,
            links: LinkConfig { frontend_url },
        })
    }
}

fn minutes_var(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

fn hour_var(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    let hour = minutes_var(key, default)?;
    if hour > 23 {
        return Err(ConfigError::InvalidNumber { key });
    }
    Ok(hour)
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
    pub include_targets: bool,
}

/// Screening engine knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreeningConfig {
    pub bucketing: CategoryBucketing,
}

/// Base URL used when building invite and doctor links.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub frontend_url: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBucketing { value: String },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBucketing { value } => write!(
                f,
                "SCREENING_BUCKETING must be 'catalog' or 'id_range' (found '{value}')"
            ),
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer in range")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidBucketing { .. }
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
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_TARGETS",
            "SCREENING_BUCKETING",
            "FRONTEND_URL",
            "REMINDER_CADENCE_MINUTES",
            "REMINDER_DELAY_MINUTES",
            "REMINDER_MISSED_AFTER_MINUTES",
            "WEATHER_NOTIFY_HOUR",
        ] {
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
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.telemetry.include_targets);
        assert_eq!(config.screening.bucketing, CategoryBucketing::Catalog);
        assert_eq!(config.reminders, ReminderSchedule::default());
        assert_eq!(config.links.frontend_url, "http://localhost:5173");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 5000));
        reset_env();
    }

    #[test]
    fn reads_screening_and_reminder_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCREENING_BUCKETING", "id_range");
        env::set_var("REMINDER_CADENCE_MINUTES", "5");
        env::set_var("WEATHER_NOTIFY_HOUR", "7");
        env::set_var("FRONTEND_URL", "https://medlife.example/");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.screening.bucketing, CategoryBucketing::IdRange);
        assert_eq!(config.reminders.cadence_minutes, 5);
        assert_eq!(config.reminders.weather_hour, 7);
        assert_eq!(config.links.frontend_url, "https://medlife.example");
        reset_env();
    }

    #[test]
    fn rejects_unknown_bucketing_and_bad_hours() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCREENING_BUCKETING", "alphabetical");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidBucketing { .. })
        ));

        reset_env();
        env::set_var("WEATHER_NOTIFY_HOUR", "24");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber {
                key: "WEATHER_NOTIFY_HOUR"
            })
        ));
        reset_env();
    }
}
