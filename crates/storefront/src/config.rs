//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `FARMACARE_HOST` - Bind address (default: 127.0.0.1)
//! - `FARMACARE_PORT` - Listen port (default: 3000)
//! - `FARMACARE_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `FARMACARE_API_URL` - Backend REST API base URL (default: <http://localhost:8000>)
//! - `FARMACARE_API_TOKEN` - Bearer token for the backend API
//! - `FARMACARE_API_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 10)
//! - `FARMACARE_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event, for log shippers.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Backend API configuration
    pub api: PharmacyApiConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Backend REST API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct PharmacyApiConfig {
    /// Base URL; `/products` and `/purchases` are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl std::fmt::Debug for PharmacyApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PharmacyApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PharmacyApiConfig {
    /// Configuration pointing at `base_url` with no token and the default timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or the API token
    /// looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env
            .or_default("FARMACARE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FARMACARE_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("FARMACARE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FARMACARE_PORT".to_string(), e.to_string()))?;
        let base_url = env.or_default("FARMACARE_BASE_URL", "http://localhost:3000");

        let log_format = env
            .or_default("FARMACARE_LOG_FORMAT", "pretty")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("FARMACARE_LOG_FORMAT".to_string(), e))?;

        let api = PharmacyApiConfig::from_env(&env)?;

        Ok(Self {
            host,
            port,
            base_url,
            api,
            log_format,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl PharmacyApiConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = env.or_default("FARMACARE_API_URL", DEFAULT_API_URL);
        let base_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("FARMACARE_API_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "FARMACARE_API_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let token = match env.optional("FARMACARE_API_TOKEN") {
            Some(value) => {
                validate_secret_strength(&value, "FARMACARE_API_TOKEN")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        let timeout_secs = env
            .or_default(
                "FARMACARE_API_TIMEOUT_SECS",
                &DEFAULT_API_TIMEOUT_SECS.to_string(),
            )
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FARMACARE_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "FARMACARE_API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// The bearer token, if one is configured.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_ref().map(|token| token.expose_secret())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup wrapper.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Reject secrets that are obviously placeholders.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}
