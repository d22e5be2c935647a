//! Command implementations.
//!
//! Every command runs against a connected [`Storefront`]. Rendering and
//! admin helpers are generic over the backend so they can be driven by the
//! in-memory backend as well.

pub mod admin;
pub mod browse;

use std::sync::Arc;

use thiserror::Error;
use venus_gecko_core::Language;
use venus_gecko_storefront::backend::firebase::FirebaseBackend;
use venus_gecko_storefront::config::StorefrontConfig;
use venus_gecko_storefront::{AppError, Storefront};

/// Errors raised by the CLI itself, before anything reaches the storefront.
#[derive(Debug, Error)]
pub enum CliError {
    /// A destructive command was run without `--yes`.
    #[error("Refusing to {0} without --yes")]
    NotConfirmed(&'static str),

    /// A photo file could not be read.
    #[error("Failed to read photo {path}: {source}")]
    Photo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load configuration and subscribe to the Firebase backend.
///
/// Returns `Ok(None)` after printing the setup notice when no backend is
/// configured.
pub async fn connect(
    language: Option<Language>,
) -> Result<Option<Storefront<FirebaseBackend>>, AppError> {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let e = AppError::from(e);
            if e.is_unconfigured() {
                browse::unconfigured_notice(&e);
                return Ok(None);
            }
            return Err(e);
        }
    };

    let backend = Arc::new(FirebaseBackend::new(&config)?);
    let mut app = Storefront::new(backend, language.unwrap_or(config.language));

    tracing::info!(project = %config.firebase.project_id, "Loading catalog...");
    app.wait_synced().await?;
    Ok(Some(app))
}
