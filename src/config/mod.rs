use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub search: SearchConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_rate_limiting: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub session_secret: String,
    pub session_expiry_hours: u64,
}

/// Secrets that must never reach a deployed environment. Matching is
/// case-insensitive against the trimmed value.
const PLACEHOLDER_SECRETS: &[&str] = &["secret", "changeme", "change-me", "dev-secret", "insecure"];

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Search overrides
        if let Ok(v) = env::var("SEARCH_DEFAULT_LIMIT") {
            self.search.default_limit = v.parse().unwrap_or(self.search.default_limit);
        }
        if let Ok(v) = env::var("SEARCH_MAX_LIMIT") {
            self.search.max_limit = v.parse().unwrap_or(self.search.max_limit);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_RATE_LIMITING") {
            self.api.enable_rate_limiting = v.parse().unwrap_or(self.api.enable_rate_limiting);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_REQUESTS") {
            self.api.rate_limit_requests = v.parse().unwrap_or(self.api.rate_limit_requests);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_WINDOW_SECS") {
            self.api.rate_limit_window_secs = v.parse().unwrap_or(self.api.rate_limit_window_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SESSION_EXPIRY_HOURS") {
            self.security.session_expiry_hours = v.parse().unwrap_or(self.security.session_expiry_hours);
        }

        self
    }

    /// Startup check: a deployment must provide its own signing secret.
    /// Outside Development an empty or well-known placeholder secret is a
    /// configuration error, not something to accept silently.
    pub fn validate(&self) -> Result<(), String> {
        if self.environment == Environment::Development {
            return Ok(());
        }

        let secret = self.security.session_secret.trim();
        if secret.is_empty() {
            return Err("SESSION_SECRET is not set".to_string());
        }
        if PLACEHOLDER_SECRETS.iter().any(|p| secret.eq_ignore_ascii_case(p)) {
            return Err(format!(
                "SESSION_SECRET is a placeholder value ('{}'); set a real secret for {:?}",
                secret, self.environment
            ));
        }
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            search: SearchConfig {
                default_limit: 50,
                max_limit: 1000,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                enable_rate_limiting: false,
                rate_limit_requests: 1000,
                rate_limit_window_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                session_secret: "dev-secret".to_string(),
                session_expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            search: SearchConfig {
                default_limit: 50,
                max_limit: 500,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 100,
                rate_limit_window_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                session_secret: String::new(),
                session_expiry_hours: 24,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            search: SearchConfig {
                default_limit: 50,
                max_limit: 100,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 60,
                rate_limit_window_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                session_secret: String::new(),
                session_expiry_hours: 12,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
