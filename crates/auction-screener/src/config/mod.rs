use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::screening::filter::{KeywordCatalog, KeywordSet};

pub const RISK_KEYWORDS_VAR: &str = "SCREENER_RISK_KEYWORDS";
pub const SPECIAL_KEYWORDS_VAR: &str = "SCREENER_SPECIAL_KEYWORDS";

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

/// Top-level configuration for the screener.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub screening: ScreeningSettings,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            screening: ScreeningSettings::from_env()?,
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

/// Keyword sets used by the rights-safety and special-property stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningSettings {
    pub keywords: KeywordCatalog,
}

impl ScreeningSettings {
    /// Screening settings alone, for commands that never bind a server.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    fn from_env() -> Result<Self, ConfigError> {
        let mut keywords = KeywordCatalog::standard();
        if let Some(risk) = keyword_override(RISK_KEYWORDS_VAR)? {
            keywords.risk = risk;
        }
        if let Some(special) = keyword_override(SPECIAL_KEYWORDS_VAR)? {
            keywords.special = special;
        }
        Ok(Self { keywords })
    }
}

impl Default for ScreeningSettings {
    fn default() -> Self {
        Self {
            keywords: KeywordCatalog::standard(),
        }
    }
}

fn keyword_override(variable: &'static str) -> Result<Option<KeywordSet>, ConfigError> {
    let Ok(raw) = env::var(variable) else {
        return Ok(None);
    };
    let set = KeywordSet::parse_list(&raw);
    if set.is_empty() {
        return Err(ConfigError::EmptyKeywordList { variable });
    }
    Ok(Some(set))
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyKeywordList { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyKeywordList { variable } => {
                write!(f, "{variable} must list at least one keyword")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::EmptyKeywordList { .. } => None,
        }
    }
}
