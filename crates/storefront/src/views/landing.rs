//! Landing page.

use std::collections::HashSet;

use venus_gecko_core::{Gecko, SiteSettings, Status};

/// Hero image when neither the settings nor the catalog provide one.
pub const DEFAULT_LANDING_PHOTO: &str =
    "https://images.unsplash.com/photo-1548366086-7f1b76106622?auto=format&fit=crop&q=80&w=800";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingView<'a> {
    /// Settings override, else the first record's cover, else the default.
    pub main_photo: &'a str,
    pub available_count: usize,
    /// Distinct morph references, records without a morph counting as one.
    pub morph_count: usize,
}

impl<'a> LandingView<'a> {
    #[must_use]
    pub fn new(geckos: &'a [Gecko], settings: &'a SiteSettings) -> Self {
        let main_photo = settings
            .landing_image_url
            .as_deref()
            .or_else(|| geckos.first().and_then(Gecko::cover_photo))
            .unwrap_or(DEFAULT_LANDING_PHOTO);
        Self {
            main_photo,
            available_count: geckos.iter().filter(|g| g.status == Status::Available).count(),
            morph_count: geckos
                .iter()
                .map(|g| g.morph_id.as_ref())
                .collect::<HashSet<_>>()
                .len(),
        }
    }
}
