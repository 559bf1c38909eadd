mod common;

use actix_web::{http::{header, StatusCode}, test};
use chrono::{Duration, Utc};
use common::{bearer, TestContext};

async fn body_string(resp: actix_web::dev::ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).expect("utf-8 body")
}

#[actix_web::test]
async fn test_profile_detail_unknown_user_not_found() {
    println!("\n\n[+] Running test: test_profile_detail_unknown_user_not_found");
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let req = test::TestRequest::get().uri("/people/profile/nobody/").to_request();
    let resp = test::call_service(&app, req).await;
    println!("[<] Received response with status: {}", resp.status());

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_detail_inactive_user_not_found() {
    println!("\n\n[+] Running test: test_profile_detail_inactive_user_not_found");
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let (ann, _) = ctx.create_user("ann", "ann@example.com", false).await;
    ctx.db.set_user_active(ann.id, false).await.unwrap();

    let req = test::TestRequest::get().uri("/people/profile/ann/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // editing by username resolves the same way, even for a superuser
    let (_, admin_token) = ctx.create_user("admin", "admin@example.com", true).await;
    let req = test::TestRequest::get()
        .uri("/people/edit/ann/")
        .insert_header(bearer(&admin_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_detail_anonymous_has_no_token() {
    println!("\n\n[+] Running test: test_profile_detail_anonymous_has_no_token");
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    ctx.create_user("ann", "ann@example.com", false).await;

    let req = test::TestRequest::get().uri("/people/profile/ann/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("<h1>ann</h1>"));
    assert!(!body.contains("access-token"));
    println!("[/] Test passed: anonymous detail renders without a token.");
}

#[actix_web::test]
async fn test_profile_detail_shows_callers_live_token() {
    println!("\n\n[+] Running test: test_profile_detail_shows_callers_live_token");
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    ctx.create_user("ann", "ann@example.com", false).await;
    let (_, bob_token) = ctx.create_user("bob", "bob@example.com", false).await;

    let req = test::TestRequest::get()
        .uri("/people/profile/ann/")
        .insert_header(bearer(&bob_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // the caller's own token, not the profile owner's
    let body = body_string(resp).await;
    assert!(body.contains(&format!("<code id=\"access-token\">{}</code>", bob_token)));
}

#[actix_web::test]
async fn test_profile_detail_expired_token_is_null() {
    println!("\n\n[+] Running test: test_profile_detail_expired_token_is_null");
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (bob, bob_token) = ctx.create_user("bob", "bob@example.com", false).await;

    // a newer token that has already expired becomes the one shown on the page
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = ctx.db.create_access_token(bob.id, Duration::hours(1)).await.unwrap();
    ctx.db.set_token_expiry(newer.id, Utc::now() - Duration::minutes(1)).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/people/profile/bob/")
        .insert_header(bearer(&bob_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(!body.contains("access-token"));
    assert!(!body.contains(&newer.token));
}

#[actix_web::test]
async fn test_get_or_create_token_issues_when_missing() {
    let ctx = TestContext::new().await;
    let user = ctx.create_named_user("carl", "Carl", "Jung", "carl@example.com").await;

    assert!(ctx.db.latest_access_token(user.id).await.unwrap().is_none());
    let issued = ctx.db.get_or_create_token(&user, Duration::minutes(5)).await.expect("token issued");
    assert!(!issued.is_expired());

    let again = ctx.db.get_or_create_token(&user, Duration::minutes(5)).await.expect("token reused");
    assert_eq!(again.token, issued.token);
}

#[actix_web::test]
async fn test_profile_edit_requires_auth() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let req = test::TestRequest::get().uri("/people/edit/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_profile_edit_own_form_prefilled() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (_, token) = ctx.create_user("ann", "ann@example.com", false).await;

    let req = test::TestRequest::get()
        .uri("/people/edit/")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("Edit profile: ann"));
    assert!(body.contains("value=\"ann@example.com\""));
}

#[actix_web::test]
async fn test_profile_edit_owner_updates_submitted_fields_only() {
    println!("\n\n[+] Running test: test_profile_edit_owner_updates_submitted_fields_only");
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (ann, token) = ctx.create_user("ann", "ann@example.com", false).await;

    let req = test::TestRequest::post()
        .uri("/people/edit/ann/")
        .insert_header(bearer(&token))
        .set_form([("first_name", "Ann"), ("city", "Lisbon")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    println!("[<] Received response with status: {}", resp.status());

    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, "/people/profile/ann/?notice=Profile%20ann%20updated.");

    let updated = ctx.db.get_user_by_id(&ann.id).await.unwrap();
    assert_eq!(updated.first_name, "Ann");
    assert_eq!(updated.city.as_deref(), Some("Lisbon"));
    assert_eq!(updated.last_name, ann.last_name);
    assert_eq!(updated.email, ann.email);
    assert_eq!(updated.organization, None);

    // the notice is shown once the browser follows the redirect
    let req = test::TestRequest::get().uri(location).to_request();
    let body = body_string(test::call_service(&app, req).await).await;
    assert!(body.contains("Profile ann updated."));
    println!("[/] Test passed: owner edit persisted and redirected.");
}

#[actix_web::test]
async fn test_profile_edit_without_username_targets_caller() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (ann, token) = ctx.create_user("ann", "ann@example.com", false).await;

    let req = test::TestRequest::post()
        .uri("/people/edit/")
        .insert_header(bearer(&token))
        .set_form([("organization", "OSGeo")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let updated = ctx.db.get_user_by_id(&ann.id).await.unwrap();
    assert_eq!(updated.organization.as_deref(), Some("OSGeo"));
}

#[actix_web::test]
async fn test_profile_edit_blank_email_clears_address() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (ann, token) = ctx.create_user("ann", "ann@example.com", false).await;

    // the edit page always posts the email input, even when emptied
    let req = test::TestRequest::post()
        .uri("/people/edit/")
        .insert_header(bearer(&token))
        .set_form([("first_name", "Ann"), ("email", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let updated = ctx.db.get_user_by_id(&ann.id).await.unwrap();
    assert_eq!(updated.email, "");
    assert_eq!(updated.first_name, "Ann");
}

#[actix_web::test]
async fn test_profile_edit_invalid_post_rerenders_with_errors() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (ann, token) = ctx.create_user("ann", "ann@example.com", false).await;

    let req = test::TestRequest::post()
        .uri("/people/edit/ann/")
        .insert_header(bearer(&token))
        .set_form([("email", "not-an-address"), ("city", "Porto")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("data-field=\"email\""));
    assert!(body.contains("Enter a valid email address."));

    let unchanged = ctx.db.get_user_by_id(&ann.id).await.unwrap();
    assert_eq!(unchanged.email, "ann@example.com");
    assert_eq!(unchanged.city, None);
}

#[actix_web::test]
async fn test_profile_edit_other_user_forbidden() {
    println!("\n\n[+] Running test: test_profile_edit_other_user_forbidden");
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (ann, _) = ctx.create_user("ann", "ann@example.com", false).await;
    let (_, bob_token) = ctx.create_user("bob", "bob@example.com", false).await;

    let req = test::TestRequest::post()
        .uri("/people/edit/ann/")
        .insert_header(bearer(&bob_token))
        .set_form([("first_name", "Hacked")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "You are not allowed to edit other users profile");

    // a body that is not even a form gets the same answer
    let req = test::TestRequest::post()
        .uri("/people/edit/ann/")
        .insert_header(bearer(&bob_token))
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .set_payload(vec![0u8, 159, 146, 150])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    // GET is refused too
    let req = test::TestRequest::get()
        .uri("/people/edit/ann/")
        .insert_header(bearer(&bob_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let untouched = ctx.db.get_user_by_id(&ann.id).await.unwrap();
    assert_eq!(untouched.first_name, "");
    println!("[/] Test passed: non-owner edit forbidden.");
}

#[actix_web::test]
async fn test_profile_edit_superuser_may_edit_anyone() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (ann, _) = ctx.create_user("ann", "ann@example.com", false).await;
    let (_, admin_token) = ctx.create_user("admin", "admin@example.com", true).await;

    let req = test::TestRequest::post()
        .uri("/people/edit/ann/")
        .insert_header(bearer(&admin_token))
        .set_form([("position", "Cartographer")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let updated = ctx.db.get_user_by_id(&ann.id).await.unwrap();
    assert_eq!(updated.position.as_deref(), Some("Cartographer"));
}

#[actix_web::test]
async fn test_profile_edit_malformed_body_by_owner_rerenders() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (_, token) = ctx.create_user("ann", "ann@example.com", false).await;

    let req = test::TestRequest::post()
        .uri("/people/edit/ann/")
        .insert_header(bearer(&token))
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .set_payload("garbage")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("The submitted data could not be read."));
}
