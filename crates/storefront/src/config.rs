//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIREBASE_API_KEY` - Web API key of the Firebase project
//! - `FIREBASE_PROJECT_ID` - Firestore project id
//! - `FIREBASE_STORAGE_BUCKET` - Cloud Storage bucket (e.g., venus.appspot.com)
//!
//! Each Firebase variable also accepts the `VITE_`-prefixed name used by the
//! web build, so one `.env` file serves both.
//!
//! ## Optional
//! - `FIREBASE_AUTH_DOMAIN` - Auth domain (informational)
//! - `VENUS_POLL_INTERVAL_SECS` - Live-update polling interval (default: 5, min: 1)
//! - `VENUS_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `VENUS_LANGUAGE` - Initial display language, `ko` or `en` (default: ko)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use venus_gecko_core::Language;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

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
    /// Firebase project configuration
    pub firebase: FirebaseConfig,
    /// How often live collections are re-read
    pub poll_interval: Duration,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Language the view starts in
    pub language: Language,
}

/// Firebase project configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Web API key (query parameter on auth calls)
    pub api_key: SecretString,
    /// Firestore project id
    pub project_id: String,
    /// Cloud Storage bucket
    pub storage_bucket: String,
    /// Auth domain, kept for parity with the web build
    pub auth_domain: Option<String>,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .field("storage_bucket", &self.storage_bucket)
            .field("auth_domain", &self.auth_domain)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let firebase = FirebaseConfig::from_lookup(&lookup)?;

        let poll_secs = parse_or_default(&lookup, "VENUS_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VENUS_POLL_INTERVAL_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let timeout_secs =
            parse_or_default(&lookup, "VENUS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let language = match lookup("VENUS_LANGUAGE") {
            Some(value) => value
                .parse::<Language>()
                .map_err(|e| ConfigError::InvalidEnvVar("VENUS_LANGUAGE".to_string(), e.to_string()))?,
            None => Language::default(),
        };

        Ok(Self {
            firebase,
            poll_interval: Duration::from_secs(poll_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            language,
        })
    }
}

impl FirebaseConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: SecretString::from(get_required(lookup, "FIREBASE_API_KEY")?),
            project_id: get_required(lookup, "FIREBASE_PROJECT_ID")?,
            storage_bucket: get_required(lookup, "FIREBASE_STORAGE_BUCKET")?,
            auth_domain: get_optional(lookup, "FIREBASE_AUTH_DOMAIN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, falling back to the `VITE_`-prefixed name.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .or_else(|| lookup(&format!("VITE_{key}")))
        .filter(|value| !value.trim().is_empty())
}

/// Get a required variable, falling back to the `VITE_`-prefixed name.
fn get_required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    get_optional(lookup, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse a numeric variable or use the default when unset.
fn parse_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
