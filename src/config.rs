//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "sqlite://data/simtrack.sqlite?mode=rwc";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_DATA_DIR: &str = "./data";
    pub const DEV_MAX_UPLOAD_SIZE: usize = 52_428_800; // 50MB per uploaded artifact
    pub const DEV_SESSION_TTL_HOURS: u64 = 24;
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL (SQLite connection string)
    pub database_url: String,
    /// Directory for the database file and uploaded job artifacts
    pub data_dir: PathBuf,
    /// Directory for static frontend assets (production only)
    pub static_dir: Option<PathBuf>,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
    /// Session lifetime in hours (default: 24)
    pub session_ttl_hours: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development):
    /// - All variables have sensible defaults
    /// - Only RUST_ENV is required
    ///
    /// In production mode (RUST_ENV=production):
    /// - DATABASE_URL is required and must not match the development default
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `FEA_HOST`: Server host (default: 127.0.0.1)
    /// - `FEA_PORT`: Server port (default: 8080)
    /// - `DATABASE_URL`: SQLite connection string
    /// - `FEA_DATA_DIR`: Data directory for database and uploads (default: ./data)
    /// - `FEA_STATIC_DIR`: Static assets directory for production
    /// - `FEA_MAX_UPLOAD_SIZE`: Max upload size in bytes (default: 50MB)
    /// - `FEA_SESSION_TTL_HOURS`: Session lifetime in hours (default: 24)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Parse environment - required
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        // Load values with defaults
        let host = env::var("FEA_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("FEA_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("FEA_PORT must be a valid port number"))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string());

        let data_dir = env::var("FEA_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(defaults::DEV_DATA_DIR));

        let static_dir = env::var("FEA_STATIC_DIR").ok().map(PathBuf::from);

        let max_upload_size = env::var("FEA_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("FEA_MAX_UPLOAD_SIZE must be a valid number"))?;

        let session_ttl_hours = env::var("FEA_SESSION_TTL_HOURS")
            .unwrap_or_else(|_| defaults::DEV_SESSION_TTL_HOURS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("FEA_SESSION_TTL_HOURS must be a valid number")
            })?;

        let config = Config {
            environment,
            host,
            port,
            database_url,
            data_dir,
            static_dir,
            max_upload_size,
            session_ttl_hours,
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "DATABASE_URL is using development default '{}'. Set a production database path.",
                defaults::DEV_DATABASE_URL
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Directory for uploaded job artifacts (one subdirectory per job).
    pub fn files_dir(&self) -> PathBuf {
        self.data_dir.join("files")
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
