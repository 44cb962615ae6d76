use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
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
pub struct DatabaseConfig {
    /// Connection string from DATABASE_URL
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub enable_query_logging: bool,
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL the frontend and CLI use to reach this API
    pub public_url: String,
    /// Directory holding the built frontend served for non-API paths
    pub static_dir: String,
    pub enable_debug_endpoints: bool,
    /// Page paths that require the auth cookie before being served
    pub protected_pages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Token signing secret from JWT_SECRET; empty when unset
    pub jwt_secret: String,
    /// Auxiliary secret from NEXTAUTH_SECRET, only reported by debug endpoints
    pub session_secret: String,
    pub jwt_issuer: String,
    /// Token lifetime, always within `1..=MAX_JWT_EXPIRY_HOURS`
    pub jwt_expiry_hours: i64,
    pub cookie_max_age_days: i64,
    pub secure_cookies: bool,
    pub cors_origins: Vec<String>,
}

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
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_IDLE_TIMEOUT_SECS") {
            self.database.idle_timeout_secs = v.parse().unwrap_or(self.database.idle_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }
        if let Ok(v) = env::var("DATABASE_SLOW_QUERY_THRESHOLD_MS") {
            self.database.slow_query_threshold_ms = v.parse().unwrap_or(self.database.slow_query_threshold_ms);
        }

        // API overrides
        if let Ok(v) = env::var("HOST") {
            self.api.host = v;
        }
        if let Some(port) = env::var("IOT_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("NEXT_PUBLIC_API_URL") {
            self.api.public_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("STATIC_DIR") {
            self.api.static_dir = v;
        }
        if let Ok(v) = env::var("API_ENABLE_DEBUG_ENDPOINTS") {
            self.api.enable_debug_endpoints = v.parse().unwrap_or(self.api.enable_debug_endpoints);
        }
        if let Ok(v) = env::var("API_PROTECTED_PAGES") {
            self.api.protected_pages = split_list(&v);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("NEXTAUTH_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            match parse_expiry_hours(&v) {
                Some(hours) => self.security.jwt_expiry_hours = hours,
                None => tracing::warn!(
                    "Ignoring SECURITY_JWT_EXPIRY_HOURS={}; expected 1..={}",
                    v,
                    MAX_JWT_EXPIRY_HOURS
                ),
            }
        }
        if let Ok(v) = env::var("SECURITY_COOKIE_MAX_AGE_DAYS") {
            self.security.cookie_max_age_days = v.parse().unwrap_or(self.security.cookie_max_age_days);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                acquire_timeout_secs: 2,
                idle_timeout_secs: 30,
                enable_query_logging: true,
                slow_query_threshold_ms: 100,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_url: "http://localhost:3000".to_string(),
                static_dir: "public".to_string(),
                enable_debug_endpoints: true,
                protected_pages: default_protected_pages(),
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_secret: String::new(),
                jwt_issuer: "iot-electric-energy-app".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                cookie_max_age_days: 7,
                secure_cookies: false,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.max_connections = 20;
        config.database.acquire_timeout_secs = 5;
        config.database.slow_query_threshold_ms = 500;
        config.api.enable_debug_endpoints = true;
        config.security.secure_cookies = true;
        // Deployed origins come from SECURITY_CORS_ORIGINS; none are allowed until it is set
        config.security.cors_origins = Vec::new();
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database.max_connections = 20;
        config.database.acquire_timeout_secs = 5;
        config.database.enable_query_logging = false;
        config.database.slow_query_threshold_ms = 1000;
        config.api.enable_debug_endpoints = false;
        config.security.secure_cookies = true;
        config.security.cors_origins = Vec::new();
        config
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Name reported by the environment probes, mirroring NODE_ENV values
    pub fn environment_name(&self) -> &'static str {
        match self.environment {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Upper bound on token lifetime (ten years)
pub const MAX_JWT_EXPIRY_HOURS: i64 = 24 * 365 * 10;

fn parse_expiry_hours(value: &str) -> Option<i64> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|hours| (1..=MAX_JWT_EXPIRY_HOURS).contains(hours))
}

fn default_protected_pages() -> Vec<String> {
    vec!["/dashboard".to_string(), "/admin".to_string()]
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert!(config.api.enable_debug_endpoints);
        assert!(!config.security.secure_cookies);
        assert_eq!(config.security.jwt_expiry_hours, 168);
        assert_eq!(config.security.cookie_max_age_days, 7);
        assert!(config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_hides_debug_and_secures_cookies() {
        let config = AppConfig::production();
        assert!(config.is_production());
        assert!(!config.api.enable_debug_endpoints);
        assert!(config.security.secure_cookies);
        assert_eq!(config.environment_name(), "production");
        assert!(config.security.cors_origins.is_empty());
        assert!(AppConfig::staging().security.cors_origins.is_empty());
    }

    #[test]
    fn expiry_hours_outside_range_are_rejected() {
        assert_eq!(parse_expiry_hours(" 24 "), Some(24));
        assert_eq!(parse_expiry_hours("0"), None);
        assert_eq!(parse_expiry_hours("-5"), None);
        assert_eq!(parse_expiry_hours("18446744073709551615"), None);
        assert_eq!(parse_expiry_hours("3000000000000000"), None);
        assert_eq!(parse_expiry_hours("a week"), None);
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list(" /a, ,/b "), vec!["/a".to_string(), "/b".to_string()]);
    }
}
