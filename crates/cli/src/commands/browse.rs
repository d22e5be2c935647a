//! Read-only views: catalog, details, landing and morph listing.

#![allow(clippy::print_stdout)]

use clap::ValueEnum;
use venus_gecko_core::ParentRole;
use venus_gecko_storefront::backend::Backend;
use venus_gecko_storefront::i18n::translations;
use venus_gecko_storefront::views::{DetailsView, FilterBar, ParentPanel};
use venus_gecko_storefront::{AppError, Storefront};

/// One navigation step inside the details view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Step {
    Sire,
    Dam,
    Back,
    Next,
    Prev,
}

/// Print the notice shown when the backend keys are missing.
pub fn unconfigured_notice(error: &AppError) {
    println!("Backend not configured ({error}).");
    println!("Set FIREBASE_API_KEY, FIREBASE_PROJECT_ID and FIREBASE_STORAGE_BUCKET");
    println!("in the environment or a .env file to load the catalog.");
}

/// Render the catalog, optionally re-rendering on every change until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the backend closes its subscriptions while watching.
pub async fn catalog<B: Backend>(app: &mut Storefront<B>, watch: bool) -> Result<(), AppError> {
    render_catalog(app);
    if !watch {
        return Ok(());
    }

    loop {
        tokio::select! {
            result = app.next_change() => {
                result?;
                render_catalog(app);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopped watching");
                return Ok(());
            }
        }
    }
}

fn render_catalog<B: Backend>(app: &Storefront<B>) {
    let t = translations(app.language());
    let sections = app.catalog();

    println!("{} - {}", t.title, t.tab(app.selection().tab));
    render_filter_bar(&app.filter_bar(), t.quick_jump);

    if sections.is_empty() {
        println!("{}", t.empty_catalog);
        return;
    }

    for section in &sections {
        println!();
        println!("== {} ({}) ==", section.label, section.geckos.len());
        for gecko in &section.geckos {
            let card = app.card(gecko);
            let mut line = format!("  [{}] {} | {} | {}", gecko.id, card.name, card.morph, card.gender);
            if let Some(price) = &card.price {
                line.push_str(&format!(" | {price}"));
            }
            if card.sold {
                line.push_str(&format!(" | {}", t.sold));
            }
            println!("{line}");
        }
    }
}

fn render_filter_bar(bar: &FilterBar, quick_jump_label: &str) {
    if !bar.quick_jump.is_empty() {
        println!("{quick_jump_label}: {}", bar.quick_jump.join(" / "));
    }
}

/// Open a record, apply navigation steps and render the details view.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id.
pub fn show<B: Backend>(app: &mut Storefront<B>, id: &str, steps: &[Step]) -> Result<(), AppError> {
    app.open_details(id)?;

    for step in steps {
        let moved = match step {
            Step::Sire => app.follow_parent(ParentRole::Sire),
            Step::Dam => app.follow_parent(ParentRole::Dam),
            Step::Back => app.go_back(),
            Step::Next | Step::Prev => {
                if let Some(navigator) = app.navigator_mut() {
                    if *step == Step::Next {
                        navigator.next_photo();
                    } else {
                        navigator.previous_photo();
                    }
                }
                true
            }
        };
        if !moved {
            tracing::warn!(?step, "Step ignored");
        }
    }

    if let Some(view) = app.details() {
        render_details(&view, app);
    }
    Ok(())
}

fn render_details<B: Backend>(view: &DetailsView<'_>, app: &Storefront<B>) {
    let t = translations(app.language());
    let gecko = view.gecko;

    println!("{} [{}]", gecko.name, gecko.id);
    println!("  {}: {}", t.morph, view.morph);
    println!("  {}: {}", t.gender, view.gender);
    println!("  {}: {}", t.hatch_date, gecko.hatch_date);
    println!("  {}: {}", t.price, view.price);
    println!("  {}: {}", t.status, t.status(gecko.status));
    if !gecko.description.is_empty() {
        println!();
        println!("  {}", gecko.description);
    }

    println!();
    match &view.photo_counter {
        Some(counter) => println!("  {} ({counter})", view.photo),
        None => println!("  {}", view.photo),
    }

    println!();
    render_parent(&view.sire);
    render_parent(&view.dam);

    if view.show_back
        && let Some(navigator) = app.navigator()
    {
        let trail: Vec<&str> = navigator.history().iter().map(|g| g.name.as_str()).collect();
        println!("  {}: {}", t.back, trail.join(" > "));
    }
}

fn render_parent(panel: &ParentPanel<'_>) {
    let marker = if panel.is_navigable() { ">" } else { " " };
    println!("  {marker} {}: {}", panel.role_label, panel.name);
}

/// Render the landing page summary.
pub fn landing<B: Backend>(app: &Storefront<B>) {
    let t = translations(app.language());
    let view = app.landing();
    println!("{}", t.title);
    println!("  {}", view.main_photo);
    println!("  {}: {}", t.available, view.available_count);
    println!("  {}: {}", t.morph, view.morph_count);
}

/// List morph definitions in manager order.
pub fn morphs<B: Backend>(app: &Storefront<B>) {
    let t = translations(app.language());
    let view = app.morph_manager();
    println!("{}", t.manage_morphs);
    for morph in &view.morphs {
        println!("  {:>4}  [{}] {} / {}", morph.order, morph.id, morph.ko, morph.en);
    }
}
