//! Venus Gecko Core - Shared types library.
//!
//! This crate provides the domain model and the pure logic used across all
//! Venus Gecko components:
//! - `storefront` - Live store, backend clients, admin gateway and view state
//! - `cli` - Terminal front-end for browsing and administering the catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no async,
//! no HTTP clients. Everything here is deterministic and can be called on
//! every snapshot without side effects.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, statuses and the gecko/morph records
//! - [`catalog`] - Filter, sort and group the collection into display sections
//! - [`lineage`] - Sire/dam drill-down with a back-stack

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod lineage;
pub mod types;

pub use catalog::{CatalogSection, Filter, Selection, derive_catalog};
pub use lineage::{LineageNavigator, ParentRole};
pub use types::*;
