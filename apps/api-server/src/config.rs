//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use agora_infra::{DatabaseConfig, JwtConfig};

#[cfg(feature = "rate-limit")]
use agora_infra::RateLimitConfig;

/// Page size bounds for listing endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 50,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub pagination: PaginationConfig,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            config.max_connections = parsed("DB_MAX_CONNECTIONS", config.max_connections);
            config.min_connections = parsed("DB_MIN_CONNECTIONS", config.min_connections);
            config
        });

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_limit: parsed("PAGE_DEFAULT_LIMIT", defaults.default_limit),
            max_limit: parsed("PAGE_MAX_LIMIT", defaults.max_limit),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            jwt: JwtConfig::from_env(),
            pagination,
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}
