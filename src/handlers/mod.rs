pub mod health_handler;
pub mod session_handler;

use actix_web::web;

pub use health_handler::{health_check, health_check_live, health_check_ready};

/// Registers every route of the web shell.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(session_handler::create_session)
        .service(session_handler::get_session)
        .service(session_handler::end_session)
        .service(session_handler::get_current_question)
        .service(session_handler::submit_profile)
        .service(session_handler::submit_document)
        .service(session_handler::submit_answer)
        .service(session_handler::advance)
        .service(session_handler::submit_mood)
        .service(session_handler::request_followup)
        .service(session_handler::play_again)
        .service(session_handler::start_over)
        .service(session_handler::enter_freeform)
        .service(session_handler::freeform_query)
        .service(session_handler::resume_quiz);
}
