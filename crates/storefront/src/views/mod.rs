//! View shell state.
//!
//! Everything a front end needs to draw each screen, computed from a
//! [`StoreSnapshot`](crate::store::StoreSnapshot) and the current selection.
//! No markup lives here.

pub mod card;
pub mod details;
pub mod filter_bar;
pub mod landing;
pub mod morph_manager;

pub use card::{GeckoCard, PLACEHOLDER_PHOTO};
pub use details::{DetailsView, ParentPanel};
pub use filter_bar::{FilterBar, FilterOption};
pub use landing::{DEFAULT_LANDING_PHOTO, LandingView};
pub use morph_manager::MorphManagerView;
