use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use secrecy::SecretString;

use study_buddy_server::{
    app_state::AppState,
    config::Config,
    errors::GenerationError,
    handlers,
    middleware::{RequestIdMiddleware, REQUEST_ID_HEADER},
    models::domain::{FeedbackContext, FollowupContext, StudyPackage},
    services::{ContentGateway, PersonaBlock},
};

/// Gateway whose upstream is permanently down.
struct OfflineGateway;

#[async_trait]
impl ContentGateway for OfflineGateway {
    async fn generate_study_package(
        &self,
        _persona: &PersonaBlock,
        _document_text: &str,
    ) -> Result<StudyPackage, GenerationError> {
        Err(GenerationError::Unavailable("offline".to_string()))
    }

    async fn generate_followup_message(
        &self,
        _persona: &PersonaBlock,
        _context: &FollowupContext,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable("offline".to_string()))
    }

    async fn generate_answer_feedback(
        &self,
        _persona: &PersonaBlock,
        _context: &FeedbackContext,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable("offline".to_string()))
    }

    async fn answer_freeform_query(
        &self,
        _persona: &PersonaBlock,
        _document_text: &str,
        _query: &str,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable("offline".to_string()))
    }
}

fn config() -> Config {
    Config {
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        cors_allowed_origin: "http://localhost:5173".to_string(),
        llm_api_base: "http://localhost:9/v1".to_string(),
        llm_api_key: SecretString::from("integration-key-integration-key-00".to_string()),
        llm_model: "offline".to_string(),
        llm_timeout_secs: 1,
        llm_max_attempts: 1,
        llm_retry_backoff_ms: 0,
        max_document_bytes: 4096,
        telegram_token: None,
        telegram_message_limit: 3500,
    }
}

fn state() -> Arc<AppState> {
    Arc::new(AppState::with_gateway(config(), Arc::new(OfflineGateway)))
}

#[actix_web::test]
async fn test_onboarding_over_http() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state()))
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/sessions").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    let body: serde_json::Value = test::read_body_json(resp).await;
    let id = body["session_id"].as_str().expect("session id").to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/profile", id))
        .set_json(serde_json::json!({ "name": "Ana", "tone_profile": "warm" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["step"]["name"], "awaiting_document");
    assert_eq!(body["outputs"], serde_json::json!([]));

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/profile", id))
        .set_json(serde_json::json!({ "name": "Ana again" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["profile"]["display_name"], "Ana");
    assert_eq!(body["profile"]["locale"], "Unknown");
}

#[actix_web::test]
async fn test_oversized_document_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state()))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/sessions").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let id = body["session_id"].as_str().expect("session id").to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/profile", id))
        .set_json(serde_json::json!({}))
        .to_request();
    test::call_service(&app, req).await;

    let mut pdf = b"%PDF-1.4\n".to_vec();
    pdf.resize(5000, b' ');
    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/document", id))
        .set_payload(pdf)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "DOCUMENT_ERROR");
}

#[actix_web::test]
async fn test_health_reports_sessions() {
    let state = state();
    state
        .session_service
        .create_session()
        .await
        .expect("create session");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["active_sessions"], 1);
}

#[actix_web::test]
async fn test_ended_session_is_evicted() {
    let state = state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/sessions").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let id = body["session_id"].as_str().expect("session id").to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(state.session_repository.count().await.expect("count"), 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
