mod common;

use std::sync::Arc;

use actix_web::http::{header, Method};
use actix_web::{test, web, App};
use common::{init_data_for, BOT_TOKEN};
use metro_empire_server::db::player_repo::PlayerStore;
use metro_empire_server::db::row_store::MemRowStore;
use metro_empire_server::http;
use serde_json::Value;

macro_rules! test_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .wrap(http::routes::cors())
                .app_data(web::Data::new($store.clone()))
                .configure(http::routes::init_routes),
        )
        .await
    };
}

fn setup() -> PlayerStore {
    std::env::set_var("BOT_TOKEN", BOT_TOKEN);
    PlayerStore::new(Arc::new(MemRowStore::new()))
}

fn auth_header(id: i64) -> (&'static str, String) {
    ("Authorization", format!("tma {}", init_data_for(id, BOT_TOKEN)))
}

#[actix_rt::test]
async fn state_without_auth_is_unauthorized() {
    let app = test_app!(setup());

    let req = test::TestRequest::get().uri("/state").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "missing_init_data");
}

#[actix_rt::test]
async fn state_with_forged_auth_is_unauthorized() {
    let app = test_app!(setup());

    let req = test::TestRequest::get()
        .uri("/state")
        .insert_header(("Authorization", "tma auth_date=1&hash=deadbeef"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_init_data");
}

#[actix_rt::test]
async fn state_returns_identity_resources_and_daily() {
    let app = test_app!(setup());

    let req = test::TestRequest::get()
        .uri("/state")
        .insert_header(auth_header(42))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], 42);
    assert_eq!(body["user"]["username"], "chief_42");
    assert_eq!(body["resources"]["energy"], 5000);
    assert_eq!(body["daily"]["available"], true);
    assert_eq!(body["daily"]["todayDay"], 1);
}

#[actix_rt::test]
async fn second_claim_conflicts_and_mutates_nothing() {
    let store = setup();
    let app = test_app!(store);

    let req = test::TestRequest::post()
        .uri("/daily/claim")
        .insert_header(auth_header(7))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["resources"]["crystals"], 101);
    assert_eq!(body["daily"]["available"], false);
    assert_eq!(body["daily"]["streak"], 1);

    let req = test::TestRequest::post()
        .uri("/daily/claim")
        .insert_header(auth_header(7))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "already_claimed");
    assert_eq!(body["resources"]["crystals"], 101);
    assert_eq!(body["daily"]["streak"], 1);
}

#[actix_rt::test]
async fn save_merges_and_state_reflects_it() {
    let store = setup();
    let app = test_app!(store);

    let req = test::TestRequest::post()
        .uri("/save")
        .insert_header(auth_header(9))
        .set_json(serde_json::json!({
            "state": { "resources": { "crystals": 5 }, "buildings": { "generator": 2 } }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["state"]["resources"]["crystals"], 5);
    assert_eq!(body["state"]["resources"]["energy"], 5000);
    assert_eq!(body["state"]["buildings"]["generator"], 2);
    assert_eq!(body["state"]["buildings"]["farm"], 1);
    assert_eq!(body["state"]["army"]["militia"], 10);

    let req = test::TestRequest::get()
        .uri("/state")
        .insert_header(auth_header(9))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["resources"]["crystals"], 5);
}

#[actix_rt::test]
async fn save_rejects_missing_or_unknown_payloads() {
    let app = test_app!(setup());

    for body in [
        "not json",
        "{}",
        r#"{"state":{"wallet":{"gold":1}}}"#,
        r#"{"state":{"resources":{"gold":1}}}"#,
    ] {
        let req = test::TestRequest::post()
            .uri("/save")
            .insert_header(auth_header(11))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400, "payload {body:?} must be rejected");
        let out: Value = test::read_body_json(resp).await;
        assert_eq!(out["error"], "invalid_payload");
    }
}

#[actix_rt::test]
async fn unknown_route_is_not_found() {
    let app = test_app!(setup());

    let req = test::TestRequest::get()
        .uri("/leaderboard")
        .insert_header(auth_header(1))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}

#[actix_rt::test]
async fn preflight_succeeds_with_cors_headers() {
    let app = test_app!(setup());

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/state")
        .insert_header((header::ORIGIN, "https://metro-empire.example"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert!(resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[actix_rt::test]
async fn healthz_reports_ok() {
    let app = test_app!(setup());

    let req = test::TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
}
