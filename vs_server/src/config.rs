//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;
use vidshare::db::DatabaseConfig;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Public application settings
    pub app: AppConfig,
    /// Outbound mail configuration
    pub mail: MailConfig,
    /// Prometheus scrape address; metrics are disabled when unset
    pub metrics_bind: Option<SocketAddr>,
}

/// Security-related configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Access token signing secret (required)
    pub jwt_secret: String,
    /// Refresh token signing secret (required)
    pub jwt_refresh_secret: String,
    /// Password hashing pepper (required)
    pub password_pepper: String,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("development") {
            AppEnvironment::Development
        } else {
            AppEnvironment::Production
        }
    }
}

/// Public application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Frontend origin used for CORS and for links in outbound mail
    pub origin: String,
    /// Deployment environment; cookies drop `Secure` only in development
    pub environment: AppEnvironment,
    /// Cookie domain; host-only cookies when unset
    pub cookie_domain: Option<String>,
}

/// Outbound mail configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Resend API key; mail is only logged when unset
    pub resend_api_key: Option<String>,
    /// Sender address
    pub from: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(
            |key| std::env::var(key).ok(),
            bind_override,
            database_url_override,
        )
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(
        lookup: F,
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_or(&lookup, "SERVER_BIND", SocketAddr::from(([127, 0, 0, 1], 8000)))?,
        };

        let defaults = DatabaseConfig::development();
        let database = DatabaseConfig {
            database_url: database_url_override
                .or_else(|| lookup("DATABASE_URL"))
                .unwrap_or(defaults.database_url),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connection_timeout_secs: parse_or(
                &lookup,
                "DB_CONNECTION_TIMEOUT_SECS",
                defaults.connection_timeout_secs,
            )?,
            idle_timeout_secs: parse_or(&lookup, "DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
            max_lifetime_secs: parse_or(&lookup, "DB_MAX_LIFETIME_SECS", defaults.max_lifetime_secs)?,
        };

        // Security configuration (REQUIRED)
        let security = SecurityConfig {
            jwt_secret: required(&lookup, "JWT_SECRET", "Generate with: openssl rand -hex 32")?,
            jwt_refresh_secret: required(
                &lookup,
                "JWT_REFRESH_SECRET",
                "Generate with: openssl rand -hex 32",
            )?,
            password_pepper: required(
                &lookup,
                "PASSWORD_PEPPER",
                "Generate with: openssl rand -hex 16",
            )?,
        };

        let app = AppConfig {
            origin: required(&lookup, "APP_ORIGIN", "e.g. https://app.example.com")?,
            environment: lookup("APP_ENV")
                .map(|v| AppEnvironment::parse(&v))
                .unwrap_or(AppEnvironment::Production),
            cookie_domain: lookup("COOKIE_DOMAIN").filter(|d| !d.is_empty()),
        };

        let mail = MailConfig {
            resend_api_key: lookup("RESEND_API_KEY").filter(|k| !k.is_empty()),
            from: lookup("MAIL_FROM").unwrap_or_else(|| "onboarding@resend.dev".to_string()),
        };

        let metrics_bind = match lookup("METRICS_BIND") {
            Some(value) => Some(value.parse().map_err(|_| ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Not a socket address: {value}"),
            })?),
            None => None,
        };

        Ok(ServerConfig {
            bind,
            database,
            security,
            app,
            mail,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "JWT_SECRET".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        if self.security.jwt_refresh_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_SECRET".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        if self.security.jwt_refresh_secret == self.security.jwt_secret {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_SECRET".to_string(),
                reason: "Must differ from JWT_SECRET".to_string(),
            });
        }

        if self.security.password_pepper.len() < 16 {
            return Err(ConfigError::Invalid {
                var: "PASSWORD_PEPPER".to_string(),
                reason: "Must be at least 16 characters (64-bit security)".to_string(),
            });
        }

        if !(self.app.origin.starts_with("http://") || self.app.origin.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "APP_ORIGIN".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed DB_MAX_CONNECTIONS ({})",
                    self.database.max_connections
                ),
            });
        }

        if self.mail.resend_api_key.is_some() && !self.mail.from.contains('@') {
            return Err(ConfigError::Invalid {
                var: "MAIL_FROM".to_string(),
                reason: "Must be an email address".to_string(),
            });
        }

        Ok(())
    }

    /// Whether auth cookies carry the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.app.environment != AppEnvironment::Development
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn required<F>(lookup: &F, key: &str, hint: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingRequired {
            var: key.to_string(),
            hint: hint.to_string(),
        })
}

/// Parse a variable, falling back to `default` only when it is unset
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Cannot parse {value:?}"),
        }),
        None => Ok(default),
    }
}
