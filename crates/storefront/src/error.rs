//! Unified error handling.
//!
//! Provides a unified `AppError` type for the application context. Library
//! layers keep their own error enums; this one aggregates them for callers
//! that drive the whole storefront.

use thiserror::Error;

use crate::admin::MutationFailure;
use crate::backend::{AuthError, BackendError};
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Sign-in failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// An admin mutation failed.
    #[error(transparent)]
    Mutation(#[from] MutationFailure),

    /// Record not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether the error means the backend is not configured at all, in
    /// which case front ends show a setup notice instead of the catalog.
    #[must_use]
    pub const fn is_unconfigured(&self) -> bool {
        matches!(self, Self::Config(ConfigError::MissingEnvVar(_)))
    }
}

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{MutationError, Operation};

    #[test]
    fn test_error_display() {
        let err = AppError::NotFound("gecko g1".to_string());
        assert_eq!(err.to_string(), "Not found: gecko g1");

        let err: AppError = MutationFailure::new(Operation::Delete, MutationError::SaveInProgress).into();
        assert_eq!(err.to_string(), "Delete failed: a save is already in progress");
    }

    #[test]
    fn test_unconfigured() {
        let err: AppError = ConfigError::MissingEnvVar("FIREBASE_API_KEY".to_string()).into();
        assert!(err.is_unconfigured());
        let err: AppError = ConfigError::InvalidEnvVar("X".to_string(), "bad".to_string()).into();
        assert!(!err.is_unconfigured());
    }
}
