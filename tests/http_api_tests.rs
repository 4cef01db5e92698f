use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use classshift::config::AppConfig;
use classshift::server::{AppState, configure};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Semaphore;

const FIXTURE: &str = include_str!("fixtures/csci_20253.json");

fn state_in(dir: &tempfile::TempDir) -> web::Data<AppState> {
    let config = AppConfig {
        db_path: dir.path().join("api.db"),
        ..AppConfig::default()
    };
    web::Data::new(AppState::new(config).unwrap())
}

fn fixture_json() -> Value {
    serde_json::from_str(FIXTURE).unwrap()
}

#[actix_web::test]
async fn test_ping_and_help() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "pong");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/help").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post_example"]["term_id"], 20253);
    assert_eq!(body["max_schedules_limit"], 100);
}

#[actix_web::test]
async fn test_catalog_upload_then_generate() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;

    let req = test::TestRequest::put().uri("/catalog/20253/csci").set_json(fixture_json()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["department"], "CSCI");
    assert_eq!(body["courses"], 2);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/catalog/20253").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["departments"][0]["department"], "CSCI");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/catalog/20253/courses/CSCI-104").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sections"].as_array().map(|a| a.len()), Some(4));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/catalog/20253/courses/CSCI-999").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/schedules/generate")
        .set_json(json!({"term_id": 20253, "courses": ["CSCI-104", "CSCI-170", "CSCI-999"], "max_schedules": 5, "seed": 42}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["schedules"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(body["warnings"][0]["kind"], "course_not_found");
    assert_eq!(body["warnings"][0]["course_id"], "CSCI-999");
    let starts: Vec<&str> = body["schedules"][0]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["start_time"].as_str())
        .collect();
    assert!(!starts.is_empty());
    assert!(starts.iter().all(|s| s.len() == 5 && s.as_bytes()[2] == b':'));
}

#[actix_web::test]
async fn test_generate_error_statuses() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;

    let cases = [
        (json!({"term_id": 20253, "courses": []}), StatusCode::BAD_REQUEST, "invalid_input"),
        (json!({"term_id": 20253, "courses": ["CSCI-104"], "max_schedules": 0}), StatusCode::BAD_REQUEST, "invalid_input"),
        (json!({"term_id": 20253, "courses": ["CSCI-104"], "max_schedules": 101}), StatusCode::BAD_REQUEST, "invalid_input"),
        (json!({"term_id": 20253}), StatusCode::BAD_REQUEST, "invalid_input"),
        (json!({"term_id": 20253, "courses": ["CSCI-104"]}), StatusCode::NOT_FOUND, "no_resolvable_courses"),
    ];
    for (payload, status, kind) in cases {
        let req = test::TestRequest::post().uri("/schedules/generate").set_json(payload.clone()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), status, "payload {}", payload);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], kind, "payload {}", payload);
        assert!(body["error"].is_string());
    }
}

#[actix_web::test]
async fn test_catalog_upload_rejects_bad_payload() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;

    let req = test::TestRequest::put().uri("/catalog/20251/CSCI").set_json(fixture_json()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put().uri("/catalog/20253/CSCI").set_json(json!({"courses": 3})).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_saved_schedules_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/saved-schedules")
        .set_json(json!({"user_id": "trojan@usc.edu", "term_id": 20253, "name": "Plan A", "sections": ["30019", "30031"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let saved: Value = test::read_body_json(resp).await;
    let id = saved["id"].as_i64().unwrap();

    let req = test::TestRequest::get().uri("/saved-schedules?user_id=trojan@usc.edu&term_id=20253").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["schedules"][0]["name"], "Plan A");

    let req = test::TestRequest::delete().uri(&format!("/saved-schedules/{}?user_id=someone@else.edu", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri(&format!("/saved-schedules/{}?user_id=trojan@usc.edu", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/saved-schedules")
        .set_json(json!({"user_id": "trojan@usc.edu", "term_id": 20253, "name": " ", "sections": ["1"]}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_generate_times_out_while_waiting_for_a_permit() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        db_path: dir.path().join("api.db"),
        generation_timeout_ms: 50,
        ..AppConfig::default()
    };
    let mut state = AppState::new(config).unwrap();
    // todos los permisos ocupados por búsquedas anteriores
    state.gate = Arc::new(Semaphore::new(0));
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/schedules/generate")
        .set_json(json!({"term_id": 20253, "courses": ["CSCI-104"], "seed": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "timeout");
}
