//! Admin commands: sign-in, record, morph and landing mutations.
//!
//! # Environment Variables
//!
//! - `VENUS_ADMIN_EMAIL` - Admin account email
//! - `VENUS_ADMIN_PASSWORD` - Admin account password

use std::path::PathBuf;

use clap::{Args, Subcommand};
use secrecy::SecretString;
use venus_gecko_core::{GeckoId, Gender, MorphId, Price, Status};
use venus_gecko_storefront::admin::form::{dam_candidates, sire_candidates};
use venus_gecko_storefront::admin::{
    GeckoDraft, GeckoForm, LocalPhoto, MutationError, MutationResultExt, Operation,
};
use venus_gecko_storefront::backend::Backend;
use venus_gecko_storefront::{AppError, Storefront};

use super::CliError;

/// Admin credentials.
#[derive(Args)]
pub struct AdminArgs {
    /// Admin email address
    #[arg(short, long, env = "VENUS_ADMIN_EMAIL")]
    pub email: String,

    /// Admin password
    #[arg(short, long, env = "VENUS_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Manage gecko records
    Gecko {
        #[command(subcommand)]
        action: GeckoAction,
    },
    /// Manage morph definitions
    Morph {
        #[command(subcommand)]
        action: MorphAction,
    },
    /// Change the landing page image
    Landing {
        #[command(subcommand)]
        action: LandingAction,
    },
}

#[derive(Subcommand)]
pub enum GeckoAction {
    /// Register a new gecko
    Add {
        #[command(flatten)]
        fields: GeckoFields,
    },
    /// Edit an existing gecko
    Edit {
        /// Gecko id
        id: String,

        #[command(flatten)]
        fields: GeckoFields,

        /// Remove the photo at this position (1-based, repeatable)
        #[arg(long)]
        remove_photo: Vec<usize>,
    },
    /// Delete a gecko
    Delete {
        /// Gecko id
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Toggle between available and sold
    Toggle {
        /// Gecko id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum MorphAction {
    /// Add a morph definition
    Add {
        /// Korean name
        #[arg(long)]
        ko: String,

        /// English name
        #[arg(long)]
        en: String,

        /// Display order (default: after the last morph)
        #[arg(long)]
        order: Option<i64>,
    },
    /// Change a morph's display order
    Order {
        /// Morph id
        id: String,

        /// New display order
        order: i64,
    },
    /// Delete a morph definition
    Delete {
        /// Morph id
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum LandingAction {
    /// Use an image URL as the landing image
    Set {
        /// Image URL
        url: String,
    },
    /// Use one of a gecko's photos as the landing image
    FromGecko {
        /// Gecko id
        id: String,

        /// Photo position (1-based)
        #[arg(long, default_value_t = 1)]
        photo: usize,
    },
}

/// Editable gecko fields. Omitted flags leave the draft untouched.
#[derive(Args)]
pub struct GeckoFields {
    /// Name
    #[arg(long)]
    name: Option<String>,

    /// Morph id
    #[arg(long)]
    morph: Option<String>,

    /// Gender (`male`, `female`, `unknown`)
    #[arg(long)]
    gender: Option<Gender>,

    /// Hatch date (YYYY-MM-DD)
    #[arg(long)]
    hatch_date: Option<String>,

    /// Price in won
    #[arg(long)]
    price: Option<u64>,

    /// Status (`available`, `breeder`, `sold`)
    #[arg(long)]
    status: Option<Status>,

    /// Description
    #[arg(long)]
    description: Option<String>,

    /// Sire id (empty to clear)
    #[arg(long)]
    sire: Option<String>,

    /// Dam id (empty to clear)
    #[arg(long)]
    dam: Option<String>,

    /// Local image file to upload (repeatable)
    #[arg(long = "photo")]
    photos: Vec<PathBuf>,

    /// Already hosted image URL (repeatable)
    #[arg(long = "photo-url")]
    photo_urls: Vec<String>,
}

/// Sign in with the given credentials.
///
/// # Errors
///
/// Returns the auth failure for bad credentials or an unreachable backend.
pub async fn sign_in<B: Backend>(app: &Storefront<B>, args: &AdminArgs) -> Result<(), AppError> {
    let password = SecretString::from(args.password.clone());
    app.gateway().sign_in(&args.email, &password).await?;
    tracing::info!(email = %args.email, "Signed in");
    Ok(())
}

/// Run one admin action.
///
/// # Errors
///
/// Returns the first failure: unreadable photo, missing confirmation, or
/// the mutation failure reported by the gateway.
pub async fn run<B: Backend>(
    app: &mut Storefront<B>,
    action: AdminAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AdminAction::Gecko { action } => gecko(app, action).await,
        AdminAction::Morph { action } => morph(app, action).await,
        AdminAction::Landing { action } => landing(app, action).await,
    }
}

async fn gecko<B: Backend>(
    app: &mut Storefront<B>,
    action: GeckoAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        GeckoAction::Add { fields } => {
            let mut form = GeckoForm::create();
            fields.apply(app, form.draft_mut()).await?;
            let id = app.save_form(&form).await?;
            tracing::info!(%id, "Gecko registered");
        }
        GeckoAction::Edit {
            id,
            fields,
            mut remove_photo,
        } => {
            let mut form = app.edit_form(&id)?;
            remove_photo.sort_unstable_by(|a, b| b.cmp(a));
            for position in remove_photo {
                form.draft_mut()
                    .remove_photo(position.saturating_sub(1))
                    .map_err(MutationError::from)
                    .during(Operation::Save)?;
            }
            fields.apply(app, form.draft_mut()).await?;
            let id = app.save_form(&form).await?;
            tracing::info!(%id, "Gecko updated");
        }
        GeckoAction::Delete { id, yes } => {
            if !yes {
                return Err(CliError::NotConfirmed("delete a gecko").into());
            }
            app.open_details(&id)?;
            if app.delete_from_details().await? {
                tracing::info!(%id, "Gecko deleted");
            }
        }
        GeckoAction::Toggle { id } => {
            let id = GeckoId::new(id);
            match app.toggle_status(&id).await? {
                Some(status) => tracing::info!(%id, %status, "Status changed"),
                None => tracing::warn!(%id, "Status unchanged (breeder or unknown record)"),
            }
        }
    }
    Ok(())
}

async fn morph<B: Backend>(
    app: &Storefront<B>,
    action: MorphAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = app.gateway();
    match action {
        MorphAction::Add { ko, en, order } => {
            let order = order.unwrap_or_else(|| app.morph_manager().suggested_order);
            let id = gateway
                .add_morph(&ko, &en, order)
                .await
                .during(Operation::Save)?;
            tracing::info!(%id, order, "Morph added");
        }
        MorphAction::Order { id, order } => {
            let id = MorphId::new(id);
            gateway
                .update_morph_order(&id, order)
                .await
                .during(Operation::UpdateOrder)?;
            tracing::info!(%id, order, "Morph order updated");
        }
        MorphAction::Delete { id, yes } => {
            if !yes {
                return Err(CliError::NotConfirmed("delete a morph").into());
            }
            let id = MorphId::new(id);
            gateway
                .delete_morph(&id)
                .await
                .during(Operation::Delete)?;
            tracing::info!(%id, "Morph deleted");
        }
    }
    Ok(())
}

async fn landing<B: Backend>(
    app: &mut Storefront<B>,
    action: LandingAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LandingAction::Set { url } => {
            app.gateway()
                .set_landing_image(&url)
                .await
                .during(Operation::SetLandingImage)?;
            tracing::info!(%url, "Landing image updated");
        }
        LandingAction::FromGecko { id, photo } => {
            app.open_details(&id)?;
            if let Some(navigator) = app.navigator_mut() {
                navigator.select_photo(photo.saturating_sub(1));
            }
            if app.set_landing_from_details().await? {
                tracing::info!(%id, photo, "Landing image updated");
            } else {
                tracing::warn!(%id, "Record has no photos");
            }
        }
    }
    Ok(())
}

impl GeckoFields {
    /// Copy the given flags into `draft`, reading local photos from disk.
    async fn apply<B: Backend>(
        self,
        app: &Storefront<B>,
        draft: &mut GeckoDraft,
    ) -> Result<(), CliError> {
        let geckos = &app.snapshot().geckos;

        if let Some(name) = self.name {
            draft.name = Some(name);
        }
        if let Some(morph) = self.morph {
            draft.morph_id = Some(MorphId::new(morph));
        }
        if let Some(gender) = self.gender {
            draft.gender = gender;
        }
        if let Some(hatch_date) = self.hatch_date {
            draft.hatch_date = Some(hatch_date);
        }
        if let Some(price) = self.price {
            draft.price = Price::new(price);
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(description) = self.description {
            draft.description = Some(description);
        }
        if let Some(sire) = self.sire {
            draft.sire_id = (!sire.is_empty()).then(|| GeckoId::new(sire));
            if let Some(id) = &draft.sire_id
                && !sire_candidates(geckos, "").iter().any(|g| &g.id == id)
            {
                tracing::warn!(%id, "Sire is not a breeding male in the catalog");
            }
        }
        if let Some(dam) = self.dam {
            draft.dam_id = (!dam.is_empty()).then(|| GeckoId::new(dam));
            if let Some(id) = &draft.dam_id
                && !dam_candidates(geckos, "").iter().any(|g| &g.id == id)
            {
                tracing::warn!(%id, "Dam is not a breeding female in the catalog");
            }
        }

        for path in self.photos {
            let bytes = tokio::fs::read(&path).await.map_err(|source| CliError::Photo {
                path: path.display().to_string(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map_or_else(|| "photo".to_string(), |name| name.to_string_lossy().into_owned());
            let content_type = LocalPhoto::guess_content_type(&file_name);
            if !draft.add_local_photo(file_name, content_type, bytes) {
                tracing::warn!(path = %path.display(), "Skipping non-image file");
            }
        }
        for url in self.photo_urls {
            draft.add_photo_url(url);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use venus_gecko_core::{Email, Language, Morph};
    use venus_gecko_storefront::backend::Collection;
    use venus_gecko_storefront::backend::memory::MemoryBackend;

    use super::*;

    const EMAIL: &str = "admin@venusgecko.kr";

    fn fields() -> GeckoFields {
        GeckoFields {
            name: Some("Luna".to_string()),
            morph: Some("m1".to_string()),
            gender: Some(Gender::Female),
            hatch_date: Some("2024-06-01".to_string()),
            price: Some(350_000),
            status: None,
            description: None,
            sire: None,
            dam: None,
            photos: Vec::new(),
            photo_urls: vec!["https://cdn/luna.jpg".to_string()],
        }
    }

    async fn signed_in() -> (Arc<MemoryBackend>, Storefront<MemoryBackend>) {
        let backend = MemoryBackend::new().with_admin(Email::parse(EMAIL).unwrap(), "pw");
        let morph = Morph {
            id: MorphId::new("m1"),
            ko: "릴리".to_string(),
            en: "Lilly".to_string(),
            order: 1,
        };
        backend.insert_record(Collection::Morphs, "m1", &morph).unwrap();
        let backend = Arc::new(backend);
        let app = Storefront::new(Arc::clone(&backend), Language::Ko);
        let args = AdminArgs {
            email: EMAIL.to_string(),
            password: "pw".to_string(),
        };
        sign_in(&app, &args).await.unwrap();
        (backend, app)
    }

    #[tokio::test]
    async fn test_add_then_toggle() {
        let (backend, mut app) = signed_in().await;
        let action = AdminAction::Gecko {
            action: GeckoAction::Add { fields: fields() },
        };
        run(&mut app, action).await.unwrap();
        assert_eq!(backend.count(Collection::Geckos), 1);

        app.refresh();
        let id = app.snapshot().geckos.first().unwrap().id.clone();
        assert_eq!(app.snapshot().geckos.first().unwrap().photos, vec!["https://cdn/luna.jpg"]);

        let action = AdminAction::Gecko {
            action: GeckoAction::Toggle { id: id.to_string() },
        };
        run(&mut app, action).await.unwrap();
        assert_eq!(backend.get(Collection::Geckos, id.as_str()).unwrap()["status"], "Sold");
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (backend, mut app) = signed_in().await;
        run(
            &mut app,
            AdminAction::Gecko {
                action: GeckoAction::Add { fields: fields() },
            },
        )
        .await
        .unwrap();
        app.refresh();
        let id = app.snapshot().geckos.first().unwrap().id.to_string();

        let refused = AdminAction::Gecko {
            action: GeckoAction::Delete {
                id: id.clone(),
                yes: false,
            },
        };
        assert!(run(&mut app, refused).await.is_err());
        assert_eq!(backend.count(Collection::Geckos), 1);

        let confirmed = AdminAction::Gecko {
            action: GeckoAction::Delete { id, yes: true },
        };
        run(&mut app, confirmed).await.unwrap();
        assert_eq!(backend.count(Collection::Geckos), 0);
    }

    #[tokio::test]
    async fn test_morph_add_uses_suggested_order() {
        let (backend, mut app) = signed_in().await;
        let action = AdminAction::Morph {
            action: MorphAction::Add {
                ko: "하이포".to_string(),
                en: "Hypo".to_string(),
                order: None,
            },
        };
        run(&mut app, action).await.unwrap();
        assert_eq!(backend.count(Collection::Morphs), 2);

        app.refresh();
        let added = app.snapshot().morphs.iter().find(|m| m.en == "Hypo").unwrap();
        assert_eq!(added.order, 2);
    }

    #[tokio::test]
    async fn test_missing_photo_file_is_reported() {
        let (_backend, mut app) = signed_in().await;
        let mut with_photo = fields();
        with_photo.photos = vec![PathBuf::from("/nonexistent/luna.jpg")];
        let action = AdminAction::Gecko {
            action: GeckoAction::Add { fields: with_photo },
        };
        let err = run(&mut app, action).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to read photo"));
    }
}
