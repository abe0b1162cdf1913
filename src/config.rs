use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub app: AppConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Slot length when an availability query names no service.
    pub default_slot_minutes: i64,
    /// Cross-validate specialist/service/business relationships on create.
    /// The loose variant exists for simplified deployments.
    pub strict_relationship_checks: bool,
    /// Reminders target reservations starting this many hours out.
    pub reminder_lead_hours: i64,
    pub notify_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?),
            Err(_) => Some(10),
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?),
            Err(_) => Some(1),
        };

        let environment = match env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Reserva".to_string());

        let default_slot_minutes = match env::var("BOOKING_DEFAULT_SLOT_MINUTES") {
            Ok(val) => val.parse().context("Failed to parse BOOKING_DEFAULT_SLOT_MINUTES")?,
            Err(_) => 60,
        };
        let strict_relationship_checks = match env::var("BOOKING_STRICT_RELATIONSHIP_CHECKS") {
            Ok(val) => val
                .parse()
                .context("Failed to parse BOOKING_STRICT_RELATIONSHIP_CHECKS")?,
            Err(_) => true,
        };
        let reminder_lead_hours = match env::var("BOOKING_REMINDER_LEAD_HOURS") {
            Ok(val) => val.parse().context("Failed to parse BOOKING_REMINDER_LEAD_HOURS")?,
            Err(_) => 24,
        };
        let notify_timeout_secs = match env::var("NOTIFY_TIMEOUT_SECS") {
            Ok(val) => val.parse().context("Failed to parse NOTIFY_TIMEOUT_SECS")?,
            Err(_) => 5,
        };

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            app: AppConfig {
                name: app_name,
                environment,
            },
            booking: BookingConfig {
                default_slot_minutes,
                strict_relationship_checks,
                reminder_lead_hours,
                notify_timeout_secs,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    #[allow(unused)]
    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}

// Global config instance, initialized once at startup.
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}
