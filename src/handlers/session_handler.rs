use std::sync::Arc;

use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        domain::{SessionEvent, SessionId},
        dto::{
            request::{
                FreeformQueryRequest, RequestFollowupRequest, SubmitAnswerRequest,
                SubmitMoodRequest, SubmitProfileRequest,
            },
            response::CreateSessionResponse,
        },
    },
};

/// Runs one event on its own task so a dropped connection cannot abandon a transition halfway.
async fn dispatch(
    state: &AppState,
    id: String,
    event: SessionEvent,
) -> Result<HttpResponse, AppError> {
    let service = state.session_service.clone();
    let id = SessionId::new(id);
    let reply = tokio::spawn(async move { service.handle_event(&id, event).await }).await??;
    Ok(HttpResponse::Ok().json(reply))
}

#[post("/api/sessions")]
pub async fn create_session(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let session_id = state.session_service.create_session().await?;
    Ok(HttpResponse::Created().json(CreateSessionResponse { session_id }))
}

#[get("/api/sessions/{id}")]
pub async fn get_session(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let snapshot = state
        .session_service
        .snapshot(&SessionId::new(id.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[delete("/api/sessions/{id}")]
pub async fn end_session(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state
        .session_service
        .end_session(&SessionId::new(id.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/sessions/{id}/question")]
pub async fn get_current_question(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let prompt = state
        .session_service
        .current_question(&SessionId::new(id.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(prompt))
}

#[post("/api/sessions/{id}/profile")]
pub async fn submit_profile(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<SubmitProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    dispatch(&state, id.into_inner(), request.into()).await
}

/// Raw PDF bytes as the request body.
#[post("/api/sessions/{id}/document")]
pub async fn submit_document(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let event = SessionEvent::SubmitDocument {
        bytes: body.to_vec(),
    };
    dispatch(&state, id.into_inner(), event).await
}

#[post("/api/sessions/{id}/answer")]
pub async fn submit_answer(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<SubmitAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    dispatch(&state, id.into_inner(), SessionEvent::try_from(request)?).await
}

#[post("/api/sessions/{id}/advance")]
pub async fn advance(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    dispatch(&state, id.into_inner(), SessionEvent::Advance).await
}

#[post("/api/sessions/{id}/mood")]
pub async fn submit_mood(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<SubmitMoodRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    dispatch(&state, id.into_inner(), request.into()).await
}

#[post("/api/sessions/{id}/followups")]
pub async fn request_followup(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<RequestFollowupRequest>,
) -> Result<HttpResponse, AppError> {
    dispatch(&state, id.into_inner(), request.into_inner().into()).await
}

#[post("/api/sessions/{id}/play-again")]
pub async fn play_again(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    dispatch(&state, id.into_inner(), SessionEvent::PlayAgain).await
}

#[post("/api/sessions/{id}/start-over")]
pub async fn start_over(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    dispatch(&state, id.into_inner(), SessionEvent::StartOver).await
}

#[post("/api/sessions/{id}/freeform")]
pub async fn enter_freeform(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    dispatch(&state, id.into_inner(), SessionEvent::EnterFreeformMode).await
}

#[post("/api/sessions/{id}/freeform/query")]
pub async fn freeform_query(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<FreeformQueryRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    dispatch(&state, id.into_inner(), request.into()).await
}

#[post("/api/sessions/{id}/resume")]
pub async fn resume_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    dispatch(&state, id.into_inner(), SessionEvent::ResumeQuiz).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handlers::configure;
    use crate::services::gateway::MockContentGateway;
    use crate::test_utils::{fixtures, test_helpers};
    use actix_web::{http::StatusCode, test, App};

    fn state_with(gateway: MockContentGateway) -> Arc<AppState> {
        Arc::new(AppState::with_gateway(Config::test_config(), Arc::new(gateway)))
    }

    async fn create(state: &Arc<AppState>) -> String {
        state
            .session_service
            .create_session()
            .await
            .expect("create session")
            .to_string()
    }

    /// Puts the session straight onto question 1 without going through a real PDF.
    async fn seed_quiz(state: &Arc<AppState>, id: &str) {
        let handle = state
            .session_repository
            .get(&SessionId::new(id))
            .await
            .expect("lookup")
            .expect("session exists");
        let mut session = handle.lock().await;
        session.submit_profile(fixtures::warm_profile()).expect("profile");
        session
            .begin_generation(fixtures::DOCUMENT_TEXT.to_string())
            .expect("generation");
        session
            .complete_generation(fixtures::study_package(17))
            .expect("package");
    }

    #[actix_web::test]
    async fn test_create_session_returns_id() {
        let state = state_with(MockContentGateway::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/sessions").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["session_id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[actix_web::test]
    async fn test_profile_then_snapshot() {
        let state = state_with(MockContentGateway::new());
        let id = create(&state).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/profile", id))
            .set_json(serde_json::json!({
                "name": "",
                "tone_profile": "sarcastic",
                "locale": "Turkey",
                "mood_before": "bored"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["step"]["name"], "awaiting_document");

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{}", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["profile"]["display_name"], "Sweetheart");
        assert_eq!(body["profile"]["tone_profile"], "sarcastic");
    }

    #[actix_web::test]
    async fn test_unknown_session_is_404() {
        let state = state_with(MockContentGateway::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/sessions/nope/advance")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_non_pdf_upload_is_422() {
        let state = state_with(MockContentGateway::new());
        let id = create(&state).await;
        state
            .session_service
            .handle_event(
                &SessionId::new(id.as_str()),
                fixtures::warm_profile_event(),
            )
            .await
            .expect("profile");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/document", id))
            .set_payload("just some text")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "DOCUMENT_ERROR");
    }

    #[actix_web::test]
    async fn test_answer_flow_and_duplicate_conflict() {
        let mut gateway = MockContentGateway::new();
        gateway
            .expect_generate_answer_feedback()
            .times(1)
            .returning(|_, _| Ok("So proud of you".to_string()));
        let state = state_with(gateway);
        let id = create(&state).await;
        seed_quiz(&state, &id).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{}/question", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["type"], "question_prompt");
        assert_eq!(body["total"], 17);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/answer", id))
            .set_json(serde_json::json!({ "key": "b" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["outputs"][0]["type"], "answer_feedback");
        assert_eq!(body["outputs"][0]["outcome"], "correct");

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/answer", id))
            .set_json(serde_json::json!({ "key": "B" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/advance", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["step"]["name"], "presenting");
        assert_eq!(body["step"]["cursor"], 1);
    }

    #[actix_web::test]
    async fn test_invalid_answer_key_is_400() {
        let state = state_with(MockContentGateway::new());
        let id = create(&state).await;
        seed_quiz(&state, &id).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/answer", id))
            .set_json(serde_json::json!({ "key": "Z" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        test_helpers::assert_error_status(resp.status());
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_freeform_endpoints() {
        let mut gateway = MockContentGateway::new();
        gateway
            .expect_answer_freeform_query()
            .times(1)
            .returning(|_, _, _| Ok("ATP is energy".to_string()));
        let state = state_with(gateway);
        let id = create(&state).await;
        seed_quiz(&state, &id).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/freeform", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        test_helpers::assert_success_status(resp.status());

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/freeform/query", id))
            .set_json(serde_json::json!({ "text": "What is ATP?" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["freeform"], true);
        assert_eq!(body["outputs"][0]["text"], "ATP is energy");

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/resume", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["freeform"], false);
        assert_eq!(body["outputs"][0]["type"], "question_prompt");
    }
}
