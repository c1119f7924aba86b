//! Admin service configuration.

use std::env;

use common::{ConfigError, DatabaseConfig, JwtConfig};
use domain::DEFAULT_JWT_EXPIRATION_HOURS;

const DEV_JWT_SECRET: &str = "development-only-secret-change-me-in-production";

/// Admin service configuration.
#[derive(Debug, Clone)]
pub struct AdminServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Token signing settings
    pub jwt: JwtConfig,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl AdminServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// `ADMIN_SERVICE_*` variables take precedence over the shared ones.
    /// Release builds refuse to start without a JWT secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var("ADMIN_SERVICE_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .ok();
        let jwt = JwtConfig {
            secret: resolve_jwt_secret(secret, cfg!(debug_assertions))?,
            expiration_hours: parse_var("JWT_EXPIRATION_HOURS").unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
        };

        Ok(Self {
            database: database_from_env(),
            jwt,
            host: env::var("ADMIN_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("ADMIN_SERVICE_PORT").unwrap_or(3000),
        })
    }

    /// Check values that would make the service unsafe or unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.jwt.validate()
    }
}

/// Database settings alone, for commands that never issue tokens.
pub fn database_from_env() -> DatabaseConfig {
    let defaults = DatabaseConfig::default();
    DatabaseConfig {
        url: env::var("ADMIN_SERVICE_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or(defaults.url),
        max_connections: parse_var("DATABASE_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
        min_connections: parse_var("DATABASE_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
    }
}

/// The development secret is only accepted when `allow_dev_secret` is set,
/// whether it comes from the fallback or was configured explicitly.
fn resolve_jwt_secret(
    configured: Option<String>,
    allow_dev_secret: bool,
) -> Result<String, ConfigError> {
    match configured {
        Some(secret) if secret != DEV_JWT_SECRET || allow_dev_secret => Ok(secret),
        Some(_) => Err(ConfigError::MissingJwtSecret),
        None if allow_dev_secret => {
            tracing::warn!("JWT_SECRET not set, using insecure default for development");
            Ok(DEV_JWT_SECRET.to_string())
        }
        None => Err(ConfigError::MissingJwtSecret),
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
