use std::sync::Arc;

use actix_web::{get, web, HttpResponse};
use secrecy::ExposeSecret;

use crate::app_state::AppState;

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
pub async fn health_check_ready(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let gateway_configured = !state.config.llm_api_key.expose_secret().is_empty();
    let sessions = state.session_repository.count().await;

    let ready = gateway_configured && sessions.is_ok();
    let response = serde_json::json!({
        "status": if ready { "ready" } else { "not_ready" },
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "content_gateway": if gateway_configured { "configured" } else { "missing_key" },
            "session_store": if sessions.is_ok() { "ok" } else { "error" }
        },
        "active_sessions": sessions.unwrap_or_default()
    });

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[get("/health/live")]
pub async fn health_check_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
