//! Black-box router tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::util::ServiceExt;

use atrium_server::authn::PRINCIPAL_HEADER;
use atrium_server::respond::{FLASH_ALERT_HEADER, FLASH_NOTICE_HEADER};
use atrium_server::{AppState, app};
use opkit_auth::Role;
use portal::test_support::{seed_owner_with_company, seed_user};
use portal::{Directory, User};

struct Fixture {
    store: Arc<Directory>,
    admin: User,
    customer: User,
    owner: User,
}

fn fixture() -> Fixture {
    let store = Arc::new(Directory::new());
    let admin = seed_user(&store, "Root", "root@example.com", Role::Admin);
    let customer = seed_user(&store, "One", "one@example.com", Role::Customer);
    let (owner, _) = seed_owner_with_company(&store, "Two", "two@example.com", "Acme");
    Fixture {
        store,
        admin,
        customer,
        owner,
    }
}

fn get(path: &str, acting_as: Option<&User>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(user) = acting_as {
        builder = builder.header(PRINCIPAL_HEADER, user.id.to_string());
    }
    builder.body(Body::empty()).expect("request builds")
}

fn post_form(path: &str, body: &str, acting_as: Option<&User>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(user) = acting_as {
        builder = builder.header(PRINCIPAL_HEADER, user.id.to_string());
    }
    builder.body(Body::from(body.to_owned())).expect("request builds")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn health_probe_answers() {
    let f = fixture();
    let response = app(AppState::new(f.store))
        .oneshot(get("/up", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ── Realm gates ─────────────────────────────────────────────────────

#[tokio::test]
async fn customer_is_redirected_away_from_crm() {
    let f = fixture();
    let response = app(AppState::new(f.store))
        .oneshot(get("/crm", Some(&f.customer)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn owner_is_redirected_from_screener_to_crm() {
    let f = fixture();
    let response = app(AppState::new(f.store))
        .oneshot(get("/screener", Some(&f.owner)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/crm");
}

#[tokio::test]
async fn anonymous_admin_request_bounces_back_with_alert() {
    let f = fixture();
    let response = app(AppState::new(f.store))
        .oneshot(get("/admin", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(response.headers().contains_key(FLASH_ALERT_HEADER));
}

#[tokio::test]
async fn anonymous_screener_home_renders() {
    let f = fixture();
    let response = app(AppState::new(f.store))
        .oneshot(get("/", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json.get("view").is_some());
    assert!(json["chrome"].get("navbar").is_some());
}

// ── Admin realm ─────────────────────────────────────────────────────

#[tokio::test]
async fn admin_lists_users() {
    let f = fixture();
    let response = app(AppState::new(Arc::clone(&f.store)))
        .oneshot(get("/admin/users?sort_by=name&sort_direction=asc", Some(&f.admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    // The rendered view carries a table with one row per user.
    let table = &json["view"]["fragment"][1]["table"];
    assert_eq!(table["rows"].as_array().unwrap().len(), 3);
    assert_eq!(table["sort"]["field"], "name");
}

#[tokio::test]
async fn admin_shows_a_user_card() {
    let f = fixture();
    let response = app(AppState::new(Arc::clone(&f.store)))
        .oneshot(get(
            &format!("/admin/users/{}", f.customer.id),
            Some(&f.admin),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let card = &json["view"]["fragment"][1]["card"];
    assert_eq!(card["header_title"], "One");
}

#[tokio::test]
async fn missing_user_is_a_404() {
    let f = fixture();
    let response = app(AppState::new(f.store.clone()))
        .oneshot(get(
            &format!("/admin/users/{}", uuid::Uuid::new_v4()),
            Some(&f.admin),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_search_payload_for_typeahead() {
    let f = fixture();
    let response = app(AppState::new(f.store.clone()))
        .oneshot(get("/admin/users?format=json", Some(&f.admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["result"].as_array().unwrap().len(), 3);
    assert_eq!(json["pagination"]["more"], false);
}

// ── CRM realm ───────────────────────────────────────────────────────

#[tokio::test]
async fn owner_sees_their_company_form() {
    let f = fixture();
    let response = app(AppState::new(Arc::clone(&f.store)))
        .oneshot(get("/crm/company/edit", Some(&f.owner)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let form = &json["view"]["fragment"][1]["form"];
    let name_field = &form["fields"][0];
    assert_eq!(name_field["value"], "Acme");
}

#[tokio::test]
async fn owner_dashboard_carries_their_card() {
    let f = fixture();
    let response = app(AppState::new(Arc::clone(&f.store)))
        .oneshot(get("/crm", Some(&f.owner)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let card = &json["view"]["fragment"][1]["card"];
    assert_eq!(card["header_title"], "Two");
    assert!(json["chrome"]["sidebar"].is_object());
}

// ── Registration ────────────────────────────────────────────────────

#[tokio::test]
async fn signup_form_renders() {
    let f = fixture();
    let response = app(AppState::new(f.store))
        .oneshot(get("/users/sign_up", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let form = &json["view"]["fragment"][1]["form"];
    assert_eq!(form["action"], "/users");
}

#[tokio::test]
async fn successful_signup_redirects_home_with_notice() {
    let f = fixture();
    let response = app(AppState::new(Arc::clone(&f.store)))
        .oneshot(post_form(
            "/users",
            "name=Three&email=three%40example.com&password=long%20enough&password_confirmation=long%20enough",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(response.headers().contains_key(FLASH_NOTICE_HEADER));
}

#[tokio::test]
async fn company_signup_lands_on_the_company_form() {
    let f = fixture();
    let response = app(AppState::new(Arc::clone(&f.store)))
        .oneshot(post_form(
            "/users",
            "name=Three&email=three%40example.com&password=long%20enough&password_confirmation=long%20enough&register_company=1&company_name=Bravo",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/crm/company/edit");
}

#[tokio::test]
async fn failed_signup_rerenders_the_form_with_errors() {
    let f = fixture();
    let response = app(AppState::new(f.store))
        .oneshot(post_form(
            "/users",
            "name=Three&email=three%40example.com&password=short&password_confirmation=short",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(
        json["flash"]["alert"]
            .as_str()
            .unwrap_or_default()
            .contains("too short")
    );
    let form = &json["view"]["fragment"][1]["form"];
    let password_field = form["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|field| field["name"] == "password")
        .expect("password field");
    assert!(!password_field["errors"].as_array().unwrap().is_empty());
}
