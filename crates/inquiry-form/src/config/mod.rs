use lazy_static::lazy_static;
use regex::Regex;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

lazy_static! {
    /// Table prefixes are spliced into DDL, so only identifier characters are allowed.
    static ref TABLE_PREFIX_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_]*$").unwrap();
}

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
    pub storage: StorageConfig,
    pub mail: MailConfig,
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

        let database_path = env::var("APP_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("inquiry-form.db"));
        let table_prefix = env::var("APP_TABLE_PREFIX").unwrap_or_else(|_| "wp_".to_string());
        if !TABLE_PREFIX_REGEX.is_match(&table_prefix) {
            return Err(ConfigError::InvalidTablePrefix(table_prefix));
        }

        let from_address =
            env::var("APP_MAIL_FROM").unwrap_or_else(|_| "no-reply@localhost".to_string());
        let spool_dir = env::var("APP_MAIL_SPOOL_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig {
                database_path,
                table_prefix,
            },
            mail: MailConfig {
                from_address,
                spool_dir,
            },
        })
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

/// Where submissions live.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub table_prefix: String,
}

impl StorageConfig {
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

/// Confirmation mail settings. Without a spool directory messages are only logged.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from_address: String,
    pub spool_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTablePrefix(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTablePrefix(prefix) => write!(
                f,
                "APP_TABLE_PREFIX '{prefix}' may only contain letters, digits, and underscores"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTablePrefix(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
