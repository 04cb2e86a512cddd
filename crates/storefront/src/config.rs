//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>);
//!   an `https://` URL marks session cookies `Secure`
//! - `STOREFRONT_DATABASE_URL` - `SQLite` URL for session storage, falling back
//!   to `DATABASE_URL` (default: `sqlite://shopfront.db?mode=rwc`)
//! - `CATALOG_API_URL` - Product catalog API (default: <https://dummyjson.com>)
//! - `CATALOG_IMAGE_ORIGIN` - Origin serving product images, allowed by the CSP
//!   (default: <https://cdn.dummyjson.com>)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog response cache lifetime (default: 300)
//! - `CATALOG_TIMEOUT_SECS` - Catalog request timeout (default: 10)
//! - `PRODUCTS_PER_PAGE` - Listing page size (default: 12)
//! - `POPULAR_PRODUCTS_LIMIT` - Products on the home page (default: 6)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_DATABASE_URL: &str = "sqlite://shopfront.db?mode=rwc";
const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com";
const DEFAULT_IMAGE_ORIGIN: &str = "https://cdn.dummyjson.com";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PRODUCTS_PER_PAGE: u32 = 12;
const DEFAULT_POPULAR_LIMIT: u32 = 6;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `SQLite` connection URL for session storage
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Remote product catalog configuration
    pub catalog: CatalogConfig,
    /// Page sizes for catalog pages
    pub pages: PageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Remote product catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API root, e.g. <https://dummyjson.com>
    pub base_url: Url,
    /// Origin product images are served from
    pub image_origin: String,
    /// How long catalog responses stay cached
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Page sizes for the listing and home pages.
#[derive(Debug, Clone, Copy)]
pub struct PageConfig {
    pub products_per_page: u32,
    pub popular_products_limit: u32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL");
        let host = parse_env("STOREFRONT_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = parse_env("STOREFRONT_PORT", DEFAULT_PORT)?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", DEFAULT_BASE_URL);
        parse_value::<Url>("STOREFRONT_BASE_URL", &base_url)?;

        let catalog = CatalogConfig::from_env()?;
        let pages = PageConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            catalog,
            pages,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Configuration with every value at its default, ignoring the
    /// environment.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in catalog URL does not parse.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: SecretString::from(DEFAULT_DATABASE_URL),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog: CatalogConfig {
                base_url: parse_value("CATALOG_API_URL", DEFAULT_CATALOG_URL)?,
                image_origin: DEFAULT_IMAGE_ORIGIN.to_string(),
                cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
            pages: PageConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
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

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("CATALOG_API_URL", DEFAULT_CATALOG_URL);
        Ok(Self {
            base_url: parse_value("CATALOG_API_URL", &base_url)?,
            image_origin: get_env_or_default("CATALOG_IMAGE_ORIGIN", DEFAULT_IMAGE_ORIGIN),
            cache_ttl: Duration::from_secs(parse_env(
                "CATALOG_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
            )?),
            timeout: Duration::from_secs(parse_env("CATALOG_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?),
        })
    }
}

impl PageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            products_per_page: parse_positive("PRODUCTS_PER_PAGE", DEFAULT_PRODUCTS_PER_PAGE)?,
            popular_products_limit: parse_positive(
                "POPULAR_PRODUCTS_LIMIT",
                DEFAULT_POPULAR_LIMIT,
            )?,
        })
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            products_per_page: DEFAULT_PRODUCTS_PER_PAGE,
            popular_products_limit: DEFAULT_POPULAR_LIMIT,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> SecretString {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_or_else(|_| SecretString::from(DEFAULT_DATABASE_URL), SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, using `default` when it is unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

/// Parse an environment variable that must be at least 1.
fn parse_positive(key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = parse_env(key, default)?;
    if value == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(value)
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
