//! Partial gecko records filled in progressively by the edit form.
//!
//! A [`GeckoDraft`] can hold any combination of fields while the admin is
//! typing. [`GeckoDraft::validate`] runs exactly once, right before
//! submission, and is the only place required fields are enforced.

use std::path::Path;

use venus_gecko_core::{Gecko, GeckoId, Gender, Morph, MorphId, Price, Status, resolve};

use super::ValidationError;

/// A photo picked locally but not uploaded yet.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalPhoto {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for LocalPhoto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPhoto")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl LocalPhoto {
    /// Wrap picked file contents. Returns `None` unless `content_type` is an
    /// `image/*` type.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Option<Self> {
        let content_type = content_type.into();
        if !content_type.starts_with("image/") {
            return None;
        }
        Some(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    /// Guess a content type from a file extension.
    #[must_use]
    pub fn guess_content_type(file_name: &str) -> &'static str {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("heic") => "image/heic",
            Some("avif") => "image/avif",
            Some("bmp") => "image/bmp",
            _ => "application/octet-stream",
        }
    }

    /// Upload path: `geckos/<unique>_<file name>`. Only the last component of
    /// the picked name is used, with either separator style.
    #[must_use]
    pub fn storage_path(&self) -> String {
        let name = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !matches!(*name, "" | "." | ".."))
            .unwrap_or("photo");
        format!("geckos/{}_{name}", uuid::Uuid::new_v4().simple())
    }
}

/// One entry of a draft's ordered photo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSlot {
    /// Already durable.
    Stored(String),
    /// Needs uploading before the record is written.
    Local(LocalPhoto),
}

impl PhotoSlot {
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Text shown for the slot while editing.
    #[must_use]
    pub fn preview(&self) -> &str {
        match self {
            Self::Stored(url) => url,
            Self::Local(photo) => &photo.file_name,
        }
    }
}

/// A gecko record under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeckoDraft {
    pub name: Option<String>,
    pub morph_id: Option<MorphId>,
    /// Carried over from legacy records so their fallback label survives.
    pub morph_name: Option<String>,
    pub gender: Gender,
    pub hatch_date: Option<String>,
    pub price: Price,
    pub status: Status,
    pub description: Option<String>,
    pub sire_id: Option<GeckoId>,
    pub dam_id: Option<GeckoId>,
    photos: Vec<PhotoSlot>,
}

impl Default for GeckoDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl GeckoDraft {
    /// Blank draft for a new record, hatched today.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            morph_id: None,
            morph_name: None,
            gender: Gender::Unknown,
            hatch_date: Some(chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()),
            price: Price::default(),
            status: Status::Available,
            description: None,
            sire_id: None,
            dam_id: None,
            photos: Vec::new(),
        }
    }

    /// Draft pre-filled from an existing record.
    #[must_use]
    pub fn from_gecko(gecko: &Gecko) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_owned());
        Self {
            name: non_empty(&gecko.name),
            morph_id: gecko.morph_id.clone(),
            morph_name: gecko.morph_name.clone(),
            gender: gecko.gender,
            hatch_date: non_empty(&gecko.hatch_date),
            price: gecko.price,
            status: gecko.status,
            description: non_empty(&gecko.description),
            sire_id: gecko.sire_id.clone(),
            dam_id: gecko.dam_id.clone(),
            photos: gecko.photos.iter().cloned().map(PhotoSlot::Stored).collect(),
        }
    }

    #[must_use]
    pub fn photos(&self) -> &[PhotoSlot] {
        &self.photos
    }

    /// Append a locally picked photo. Non-image files are ignored; returns
    /// whether the photo was added.
    pub fn add_local_photo(
        &mut self,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> bool {
        match LocalPhoto::new(file_name, content_type, bytes) {
            Some(photo) => {
                self.photos.push(PhotoSlot::Local(photo));
                true
            }
            None => false,
        }
    }

    /// Append an already durable photo URL.
    pub fn add_photo_url(&mut self, url: impl Into<String>) {
        self.photos.push(PhotoSlot::Stored(url.into()));
    }

    /// Remove the photo at `index`, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PhotoOutOfRange`] for a bad index.
    pub fn remove_photo(&mut self, index: usize) -> Result<PhotoSlot, ValidationError> {
        if index >= self.photos.len() {
            return Err(ValidationError::PhotoOutOfRange {
                index,
                len: self.photos.len(),
            });
        }
        Ok(self.photos.remove(index))
    }

    /// Check required fields and produce a submittable record.
    ///
    /// A morph must be selected. When it resolves against `morphs`, its
    /// Korean name is stored as the record's fallback label so the record
    /// still reads sensibly if the morph is deleted later.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingMorph`] when no morph is selected.
    pub fn validate(self, morphs: &[Morph]) -> Result<ValidatedDraft, ValidationError> {
        let morph_id = self
            .morph_id
            .filter(|id| !id.as_str().trim().is_empty())
            .ok_or(ValidationError::MissingMorph)?;
        let morph_name = resolve(&morph_id, morphs)
            .map(|morph| morph.ko.clone())
            .filter(|name| !name.is_empty())
            .or(self.morph_name);

        Ok(ValidatedDraft {
            record: Gecko {
                id: GeckoId::new(""),
                name: self.name.unwrap_or_default(),
                morph_id: Some(morph_id),
                morph_name,
                gender: self.gender,
                hatch_date: self.hatch_date.unwrap_or_default(),
                price: self.price,
                status: self.status,
                description: self.description.unwrap_or_default(),
                photos: Vec::new(),
                sire_id: self.sire_id,
                dam_id: self.dam_id,
            },
            photos: self.photos,
        })
    }
}

/// A draft that passed validation. Photos may still need uploading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    /// Every field except `id` and `photos` is final.
    pub record: Gecko,
    pub photos: Vec<PhotoSlot>,
}

impl ValidatedDraft {
    /// Indices and contents of the photos that need uploading.
    pub fn local_photos(&self) -> impl Iterator<Item = (usize, &LocalPhoto)> {
        self.photos.iter().enumerate().filter_map(|(i, slot)| match slot {
            PhotoSlot::Local(photo) => Some((i, photo)),
            PhotoSlot::Stored(_) => None,
        })
    }

    /// Substitute uploaded URLs in place and return the complete record.
    ///
    /// `uploaded` pairs slot indices with durable URLs; every local slot
    /// must have an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PhotoOutOfRange`] if a local slot has no
    /// uploaded URL.
    pub fn into_record(self, uploaded: Vec<(usize, String)>) -> Result<Gecko, ValidationError> {
        let mut urls: Vec<Option<String>> = self
            .photos
            .iter()
            .map(|slot| match slot {
                PhotoSlot::Stored(url) => Some(url.clone()),
                PhotoSlot::Local(_) => None,
            })
            .collect();
        let len = urls.len();
        for (index, url) in uploaded {
            let slot = urls
                .get_mut(index)
                .ok_or(ValidationError::PhotoOutOfRange { index, len })?;
            *slot = Some(url);
        }

        let photos = urls
            .into_iter()
            .enumerate()
            .map(|(index, url)| url.ok_or(ValidationError::PhotoOutOfRange { index, len }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Gecko {
            photos,
            ..self.record
        })
    }
}
