//! Details view navigation over parent references.

use venus_gecko_core::{Language, ParentRole};
use venus_gecko_integration_tests::TestContext;

fn current(ctx: &TestContext) -> String {
    ctx.app
        .navigator()
        .map(|nav| nav.current().name.clone())
        .expect("Details view is open")
}

#[tokio::test]
async fn test_walk_up_three_generations_and_back() {
    let mut ctx = TestContext::new(Language::En);
    ctx.app.open_details("luna").expect("luna exists");

    assert!(ctx.app.follow_parent(ParentRole::Sire));
    assert_eq!(current(&ctx), "Zeus");
    assert!(ctx.app.follow_parent(ParentRole::Sire));
    assert_eq!(current(&ctx), "Grandpa");

    let trail: Vec<String> = ctx
        .app
        .navigator()
        .expect("open")
        .history()
        .iter()
        .map(|g| g.name.clone())
        .collect();
    assert_eq!(trail, vec!["Luna", "Zeus"]);

    assert!(ctx.app.go_back());
    assert_eq!(current(&ctx), "Zeus");
    assert!(ctx.app.go_back());
    assert_eq!(current(&ctx), "Luna");
    assert!(!ctx.app.go_back());
    assert_eq!(current(&ctx), "Luna");
}

#[tokio::test]
async fn test_dangling_parent_is_shown_as_unknown() {
    let mut ctx = TestContext::new(Language::Ko);
    ctx.app.open_details("stray").expect("stray exists");

    let view = ctx.app.details().expect("open");
    assert_eq!(view.morph, "Old Morph");
    assert!(!view.dam.is_navigable());
    assert_eq!(view.dam.name, "알 수 없음");
    assert!(!view.sire.is_navigable());

    assert!(!ctx.app.follow_parent(ParentRole::Dam));
    assert_eq!(current(&ctx), "Stray");
}

#[tokio::test]
async fn test_details_affordances_depend_on_history_and_session() {
    let mut ctx = TestContext::new(Language::En);
    ctx.app.open_details("luna").expect("luna exists");

    let view = ctx.app.details().expect("open");
    assert!(!view.show_back);
    assert!(!view.show_delete);
    assert!(view.landing_candidate.is_none());

    ctx.sign_in().await;
    let view = ctx.app.details().expect("open");
    assert!(view.show_delete);
    assert_eq!(view.landing_candidate, Some("luna.jpg"));

    ctx.app.follow_parent(ParentRole::Dam);
    let view = ctx.app.details().expect("open");
    assert!(view.show_back);
    assert!(!view.show_delete);
    assert_eq!(view.gecko.name, "Hera");
    assert_eq!(view.price, "NFS");
}

#[tokio::test]
async fn test_carousel_resets_on_navigation() {
    let mut ctx = TestContext::new(Language::En);
    ctx.app.open_details("luna").expect("luna exists");
    ctx.app.follow_parent(ParentRole::Sire);

    let nav = ctx.app.navigator_mut().expect("open");
    nav.next_photo();
    assert_eq!(nav.active_photo_url(), Some("zeus-2.jpg"));
    let view = ctx.app.details().expect("open");
    assert_eq!(view.photo_counter.as_deref(), Some("2 / 2"));

    ctx.app.go_back();
    ctx.app.follow_parent(ParentRole::Sire);
    let view = ctx.app.details().expect("open");
    assert_eq!(view.photo, "zeus-1.jpg");
}

#[tokio::test]
async fn test_navigator_keeps_showing_deleted_parent() {
    let mut ctx = TestContext::new(Language::En);
    ctx.sign_in().await;
    ctx.app.open_details("luna").expect("luna exists");

    ctx.app
        .gateway()
        .delete_gecko(&venus_gecko_core::GeckoId::new("hera"))
        .await
        .expect("delete hera");
    ctx.app.refresh();

    let view = ctx.app.details().expect("open");
    assert!(!view.dam.is_navigable());
    assert!(!ctx.app.follow_parent(ParentRole::Dam));
    assert!(ctx.app.follow_parent(ParentRole::Sire));
}
