//! Admin mutations and their loop-back into the catalog.

use secrecy::SecretString;
use venus_gecko_core::{GeckoId, Language, MorphId, Status};
use venus_gecko_integration_tests::{ADMIN_EMAIL, TestContext};
use venus_gecko_storefront::AppError;
use venus_gecko_storefront::admin::{GeckoForm, MutationError};
use venus_gecko_storefront::backend::{AuthError, Collection};

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let ctx = TestContext::new(Language::Ko);
    let err = ctx
        .app
        .gateway()
        .sign_in(ADMIN_EMAIL, &SecretString::from("wrong"))
        .await
        .expect_err("Wrong password must fail");
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(!ctx.app.is_admin());
}

#[tokio::test]
async fn test_create_with_photos_loops_back_into_catalog() {
    let mut ctx = TestContext::new(Language::Ko);
    ctx.sign_in().await;

    let mut form = GeckoForm::create();
    let draft = form.draft_mut();
    draft.name = Some("Iris".to_string());
    draft.morph_id = Some(MorphId::new("hypo"));
    draft.hatch_date = Some("2025-01-15".to_string());
    draft.add_photo_url("https://cdn/iris-old.jpg");
    assert!(draft.add_local_photo("iris.png", "image/png", vec![1, 2, 3]));
    assert!(!draft.add_local_photo("notes.txt", "text/plain", vec![4]));

    let id = ctx.app.save_form(&form).await.expect("save succeeds");
    assert!(form.is_closed());
    assert_eq!(ctx.backend.blob_paths().len(), 1);

    ctx.app.next_change().await.expect("change published");
    let iris = ctx.app.snapshot().gecko(id.as_str()).expect("iris stored").clone();
    assert_eq!(iris.status, Status::Available);
    assert_eq!(iris.morph_name.as_deref(), Some("하이포"));
    assert_eq!(iris.photos.len(), 2);
    assert_eq!(iris.photos.first().map(String::as_str), Some("https://cdn/iris-old.jpg"));
    assert!(iris.photos.get(1).is_some_and(|url| url.starts_with("memory://blobs/geckos/")));

    let hypo: Vec<String> = ctx
        .app
        .catalog()
        .iter()
        .find(|s| s.label == "하이포")
        .map(|s| s.geckos.iter().map(|g| g.name.clone()).collect())
        .expect("hypo section");
    assert_eq!(hypo, vec!["Iris", "Sol"]);
}

#[tokio::test]
async fn test_save_without_morph_never_writes() {
    let ctx = TestContext::new(Language::En);
    ctx.sign_in().await;
    let before = ctx.backend.count(Collection::Geckos);

    let mut form = GeckoForm::create();
    form.draft_mut().name = Some("Nameless".to_string());
    form.draft_mut().add_local_photo("a.jpg", "image/jpeg", vec![0]);

    let err = ctx.app.save_form(&form).await.expect_err("morph is required");
    let AppError::Mutation(failure) = err else {
        panic!("expected a mutation failure");
    };
    assert_eq!(failure.message(Language::En), "Save failed: Please select a morph.");
    assert!(!form.is_closed());
    assert_eq!(ctx.backend.count(Collection::Geckos), before);
    assert!(ctx.backend.blob_paths().is_empty());
}

#[tokio::test]
async fn test_failed_upload_leaves_records_untouched() {
    let ctx = TestContext::new(Language::Ko);
    ctx.sign_in().await;

    let mut form = ctx.app.edit_form("luna").expect("luna exists");
    form.draft_mut().add_local_photo("luna-2.jpg", "image/jpeg", vec![9]);
    ctx.backend.fail_next_upload();

    let err = ctx.app.save_form(&form).await.expect_err("upload fails");
    assert!(matches!(
        err,
        AppError::Mutation(ref failure) if matches!(failure.error, MutationError::Network(_))
    ));
    let stored = ctx.backend.get(Collection::Geckos, "luna").expect("luna kept");
    assert_eq!(stored["photos"], serde_json::json!(["luna.jpg"]));
}

#[tokio::test]
async fn test_edit_merges_into_existing_record() {
    let mut ctx = TestContext::new(Language::En);
    ctx.sign_in().await;

    let mut form = ctx.app.edit_form("sol").expect("sol exists");
    form.draft_mut().price = venus_gecko_core::Price::new(280_000);
    form.draft_mut().status = Status::Sold;
    ctx.app.save_form(&form).await.expect("save succeeds");

    ctx.app.refresh();
    let sol = ctx.app.snapshot().gecko("sol").expect("sol kept");
    assert_eq!(sol.price.amount(), 280_000);
    assert_eq!(sol.status, Status::Sold);
    assert_eq!(sol.sire_id, Some(GeckoId::new("zeus")));

    ctx.app.select_tab(Status::Sold);
    let sold: Vec<String> = ctx
        .app
        .catalog()
        .iter()
        .flat_map(|s| s.geckos.iter().map(|g| g.name.clone()))
        .collect();
    assert_eq!(sold, vec!["Nova", "Sol"]);
}

#[tokio::test]
async fn test_toggle_status_round_trip_and_breeder_noop() {
    let mut ctx = TestContext::new(Language::Ko);
    ctx.sign_in().await;

    let luna = GeckoId::new("luna");
    assert_eq!(ctx.app.toggle_status(&luna).await.expect("toggle"), Some(Status::Sold));
    ctx.app.refresh();
    assert_eq!(ctx.app.toggle_status(&luna).await.expect("toggle"), Some(Status::Available));
    ctx.app.refresh();
    assert_eq!(ctx.app.snapshot().gecko("luna").map(|g| g.status), Some(Status::Available));

    let zeus = GeckoId::new("zeus");
    assert_eq!(ctx.app.toggle_status(&zeus).await.expect("noop"), None);
    assert_eq!(ctx.backend.get(Collection::Geckos, "zeus").expect("zeus")["status"], "Breeder");
}

#[tokio::test]
async fn test_signed_out_mutations_are_denied_with_localized_message() {
    let ctx = TestContext::new(Language::Ko);
    let err = ctx
        .app
        .toggle_status(&GeckoId::new("luna"))
        .await
        .expect_err("denied");
    let AppError::Mutation(failure) = err else {
        panic!("expected a mutation failure");
    };
    assert_eq!(failure.message(Language::Ko), "상태 변경 실패: 관리자 로그인이 필요합니다.");
    assert_eq!(ctx.backend.get(Collection::Geckos, "luna").expect("luna")["status"], "Available");
}

#[tokio::test]
async fn test_delete_morph_falls_back_to_stored_name() {
    let mut ctx = TestContext::new(Language::En);
    ctx.sign_in().await;

    ctx.app
        .gateway()
        .delete_morph(&MorphId::new("hypo"))
        .await
        .expect("delete morph");
    ctx.app.refresh();

    let labels: Vec<String> = ctx.app.catalog().iter().map(|s| s.label.clone()).collect();
    assert_eq!(labels, vec!["Lilly White", "Old Morph", "Unknown"]);
    assert_eq!(ctx.app.morph_manager().suggested_order, 2);
}

#[tokio::test]
async fn test_landing_image_from_details() {
    let mut ctx = TestContext::new(Language::En);
    ctx.sign_in().await;
    ctx.app.open_details("zeus").expect("zeus exists");
    ctx.app.navigator_mut().expect("open").select_photo(1);

    assert!(ctx.app.set_landing_from_details().await.expect("set landing"));
    ctx.app.refresh();
    assert_eq!(ctx.app.landing().main_photo, "zeus-2.jpg");
}
