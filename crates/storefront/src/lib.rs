//! Venus Gecko storefront library.
//!
//! Live catalog state, the Firebase and in-memory backends, the admin
//! mutation gateway and the view shell state, packaged as a library so the
//! CLI and the integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod i18n;
pub mod store;
pub mod views;

pub use app::Storefront;
pub use error::{AppError, Result};
