//! Core types for Venus Gecko.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod email;
pub mod gecko;
pub mod id;
pub mod price;
pub mod reference;
pub mod status;

pub use email::{Email, EmailError};
pub use gecko::{Gecko, Morph, SiteSettings, UNKNOWN_MORPH};
pub use id::*;
pub use price::Price;
pub use reference::{Record, resolve};
pub use status::*;
