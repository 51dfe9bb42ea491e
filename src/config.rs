/// Configuration management for Chirpy
use crate::error::{ChirpError, ChirpResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Platform tag that unlocks destructive admin operations
pub const DEV_PLATFORM: &str = "dev";

/// Log filter used when RUST_LOG is unset or unparseable
pub const DEFAULT_LOG_FILTER: &str = "chirpy=debug,tower_http=debug";

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub authentication: AuthConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    /// Deployment tag, e.g. "dev" or "prod"
    pub platform: String,
    /// Directory served under /app/
    pub filepath_root: PathBuf,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_url: String,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    pub jwt_secret: String,
    /// Shared key presented by the Polka billing webhook
    pub polka_key: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    /// Filter for the tracing subscriber
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|e| {
            eprintln!("Invalid log filter {:?} ({}), using {}", self.level, e, DEFAULT_LOG_FILTER);
            EnvFilter::new(DEFAULT_LOG_FILTER)
        })
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ChirpResult<Self> {
        dotenv::dotenv().ok();

        let database_url = required("DB_URL")?;
        let platform = required("PLATFORM")?;
        let jwt_secret = required("SECRET")?;
        let polka_key = required("POLKA_KEY")?;

        let hostname = env::var("CHIRPY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("CHIRPY_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ChirpError::Validation("Invalid port number".to_string()))?;
        let filepath_root: PathBuf = env::var("CHIRPY_FILEPATH_ROOT")
            .unwrap_or_else(|_| ".".to_string())
            .into();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                platform,
                filepath_root,
            },
            storage: StorageConfig { database_url },
            authentication: AuthConfig {
                jwt_secret,
                polka_key,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ChirpResult<()> {
        if self.storage.database_url.is_empty() {
            return Err(ChirpError::Validation("DB_URL must be set".to_string()));
        }

        if self.authentication.jwt_secret.is_empty() {
            return Err(ChirpError::Validation("SECRET cannot be empty".to_string()));
        }

        if self.authentication.polka_key.is_empty() {
            return Err(ChirpError::Validation("POLKA_KEY cannot be empty".to_string()));
        }

        if self.authentication.jwt_secret.len() < 32 {
            tracing::warn!("SECRET is shorter than 32 bytes; access tokens are weakly protected");
        }

        Ok(())
    }
}

fn required(name: &str) -> ChirpResult<String> {
    env::var(name).map_err(|_| ChirpError::Validation(format!("{} must be set", name)))
}

#[cfg(test)]
pub(crate) fn test_config(platform: &str) -> ServerConfig {
    ServerConfig {
        service: ServiceConfig {
            hostname: "127.0.0.1".to_string(),
            port: 0,
            platform: platform.to_string(),
            filepath_root: PathBuf::from("."),
        },
        storage: StorageConfig {
            database_url: "sqlite::memory:".to_string(),
        },
        authentication: AuthConfig {
            jwt_secret: "test-secret-that-is-at-least-32-bytes-long".to_string(),
            polka_key: "f271c81ff7084ee5b99a5091b42d486e".to_string(),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_secret() {
        let mut config = test_config("dev");
        config.authentication.jwt_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_polka_key() {
        let mut config = test_config("dev");
        config.authentication.polka_key = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_filter_from_config() {
        let mut config = test_config("dev");
        config.logging.level = "chirpy=trace".to_string();
        assert!(config.logging.env_filter().to_string().contains("chirpy=trace"));
    }

    #[test]
    fn test_bad_log_filter_falls_back() {
        let mut config = test_config("dev");
        config.logging.level = "chirpy=loudest".to_string();
        let filter = config.logging.env_filter().to_string();
        assert!(filter.contains("chirpy=debug"));
        assert!(filter.contains("tower_http=debug"));
    }

    #[test]
    fn test_short_secret_is_accepted() {
        let mut config = test_config("dev");
        config.authentication.jwt_secret = "short".to_string();
        assert!(config.validate().is_ok());
    }
}
