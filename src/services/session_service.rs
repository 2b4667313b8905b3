use std::sync::Arc;

use crate::constants::messages;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{
    ChoiceKey, FollowupKind, QuizSession, SessionEvent, SessionId, SessionStep, UserProfile,
};
use crate::models::dto::{SessionOutput, SessionReply, SessionSnapshot};
use crate::repositories::{SessionHandle, SessionRepository};
use crate::services::document_service::DocumentService;
use crate::services::gateway::ContentGateway;
use crate::services::persona_service::select_persona;
use crate::services::retry::{retry_unavailable, RetryPolicy};

/// Feeds shell events into the session state machine and talks to the gateway on its behalf.
///
/// The session lock is held for the whole event, gateway calls included, so events for one
/// session are handled strictly one after another.
pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
    gateway: Arc<dyn ContentGateway>,
    documents: DocumentService,
    retry: RetryPolicy,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        gateway: Arc<dyn ContentGateway>,
        documents: DocumentService,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            repository,
            gateway,
            documents,
            retry,
        }
    }

    pub async fn create_session(&self) -> AppResult<SessionId> {
        let id = SessionId::generate();
        self.repository.create(id.clone()).await?;
        log::info!("Session {} created", id);
        Ok(id)
    }

    /// Drops a web session for good. Later events for `id` get `NotFound`.
    pub async fn end_session(&self, id: &SessionId) -> AppResult<()> {
        self.repository.remove(id).await?;
        log::info!("Session {} ended", id);
        Ok(())
    }

    /// Returns the session for `id`, creating it on first contact.
    pub async fn open_session(&self, id: &SessionId) -> AppResult<SessionHandle> {
        self.repository.get_or_create(id).await
    }

    async fn handle(&self, id: &SessionId) -> AppResult<SessionHandle> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))
    }

    pub async fn snapshot(&self, id: &SessionId) -> AppResult<SessionSnapshot> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(SessionSnapshot::from(&*session))
    }

    pub async fn current_question(&self, id: &SessionId) -> AppResult<SessionOutput> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        let index = session.active_question_index().ok_or_else(|| {
            AppError::InvalidTransition(format!("no question is shown while {}", session.step()))
        })?;
        Ok(SessionOutput::question_prompt(
            index,
            session.total_questions(),
            &session.questions()[index],
        ))
    }

    /// `Err` means the event was rejected and the session did not change.
    pub async fn handle_event(&self, id: &SessionId, event: SessionEvent) -> AppResult<SessionReply> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        let from = session.step();
        let event_name = event.name();

        let outputs = match event {
            SessionEvent::SubmitProfile {
                name,
                tone_profile,
                locale,
                mood_before,
            } => {
                session.submit_profile(UserProfile::new(&name, tone_profile, &locale, &mood_before))?;
                Vec::new()
            }
            SessionEvent::SubmitDocument { bytes } => {
                session.ensure_accepts_document()?;
                let text = self.documents.extract_text(bytes).await?;
                session.begin_generation(text)?;
                self.run_generation(&mut session).await?
            }
            SessionEvent::SubmitAnswer { key } => self.answer(&mut session, key).await?,
            SessionEvent::Advance => match session.advance()? {
                SessionStep::Presenting(i) => vec![SessionOutput::question_prompt(
                    i,
                    session.total_questions(),
                    &session.questions()[i],
                )],
                _ => vec![self.results_summary(&session)?],
            },
            SessionEvent::SubmitMoodAfter { text } => self.post_quiz_advice(&mut session, &text).await?,
            SessionEvent::RequestFollowup { kind } => self.followup(&session, kind).await?,
            SessionEvent::PlayAgain => {
                session.begin_regeneration()?;
                self.run_generation(&mut session).await?
            }
            SessionEvent::StartOver => {
                session.start_over();
                Vec::new()
            }
            SessionEvent::EnterFreeformMode => {
                session.enter_freeform()?;
                Vec::new()
            }
            SessionEvent::FreeformQuery { text } => self.freeform_query(&session, &text).await?,
            SessionEvent::ResumeQuiz => {
                session.resume_quiz()?;
                vec![self.current_view(&session)?]
            }
        };

        log::info!(
            "Session {} handled {}: {} -> {}",
            session.id(),
            event_name,
            from,
            session.step()
        );
        debug_assert!(session.invariants_hold());
        Ok(SessionReply::new(&session, outputs))
    }

    /// Drives a pending generation to completion. Any failure lands back at the upload step.
    async fn run_generation(&self, session: &mut QuizSession) -> AppResult<Vec<SessionOutput>> {
        let persona = select_persona(session.require_profile()?);
        let source = session
            .generation_source()
            .ok_or_else(|| AppError::InternalError("no generation is pending".to_string()))?
            .to_string();

        let generated = retry_unavailable(self.retry, "study package generation", || {
            self.gateway.generate_study_package(&persona, &source)
        })
        .await;

        let completed = match generated {
            Ok(package) => session.complete_generation(package),
            Err(err) => Err(err.into()),
        };

        match completed {
            Ok(replaced_material) => {
                let mut outputs = Vec::new();
                if replaced_material {
                    if let Some(material) = session.material() {
                        outputs.push(SessionOutput::StudyPackageReady {
                            summary: material.summary.clone(),
                            guidance: material.guidance.clone(),
                        });
                    }
                }
                outputs.push(SessionOutput::question_prompt(
                    0,
                    session.total_questions(),
                    &session.questions()[0],
                ));
                Ok(outputs)
            }
            Err(err) => {
                log::warn!("Session {} generation failed: {}", session.id(), err);
                session.fail_generation()?;
                Ok(vec![SessionOutput::error_notice(&err)])
            }
        }
    }

    async fn answer(
        &self,
        session: &mut QuizSession,
        key: ChoiceKey,
    ) -> AppResult<Vec<SessionOutput>> {
        let context = session.accept_answer(key)?;
        let persona = select_persona(session.require_profile()?);

        let text = match retry_unavailable(self.retry, "answer feedback", || {
            self.gateway.generate_answer_feedback(&persona, &context)
        })
        .await
        {
            Ok(text) => context.enforce_header(&text),
            Err(err) => {
                log::warn!(
                    "Session {} falling back to template feedback: {}",
                    session.id(),
                    err
                );
                context.fallback_feedback()
            }
        };

        let outcome = session.record_feedback(text.clone())?;
        Ok(vec![SessionOutput::AnswerFeedback { outcome, text }])
    }

    fn results_summary(&self, session: &QuizSession) -> AppResult<SessionOutput> {
        let profile = session.require_profile()?;
        let report = session.score_report();
        Ok(SessionOutput::ResultsSummary {
            score: report.score,
            total: report.total,
            percent: report.percent,
            headline: messages::results_headline(profile.tone_profile, &profile.display_name, &report),
        })
    }

    /// Advice failures do not block the menu; the learner sees a notice instead.
    async fn post_quiz_advice(&self, session: &mut QuizSession, mood: &str) -> AppResult<Vec<SessionOutput>> {
        let context = session.submit_mood_after(mood)?;
        let profile = session.require_profile()?;
        let persona = select_persona(profile);
        let tone = profile.tone_profile;

        let generated = retry_unavailable(self.retry, "post-quiz advice", || {
            self.gateway.generate_followup_message(&persona, &context)
        })
        .await;
        session.complete_advice()?;

        Ok(match generated {
            Ok(advice) => vec![SessionOutput::FollowupMessage {
                kind: FollowupKind::PostQuizAdvice,
                text: format!("{}\n\n{}", advice, messages::rest_reminder(tone)),
            }],
            Err(err) => {
                log::warn!("Session {} advice unavailable: {}", session.id(), err);
                vec![SessionOutput::error_notice(&AppError::from(err))]
            }
        })
    }

    async fn followup(&self, session: &QuizSession, kind: FollowupKind) -> AppResult<Vec<SessionOutput>> {
        if kind == FollowupKind::PostQuizAdvice {
            return Err(AppError::ValidationError(
                "post-quiz advice is produced from the after-quiz mood".to_string(),
            ));
        }
        let context = session.followup_context(kind)?;
        let persona = select_persona(session.require_profile()?);

        let generated = retry_unavailable(self.retry, "follow-up message", || {
            self.gateway.generate_followup_message(&persona, &context)
        })
        .await;

        Ok(match generated {
            Ok(text) => vec![SessionOutput::FollowupMessage { kind, text }],
            Err(err) => vec![SessionOutput::error_notice(&AppError::from(err))],
        })
    }

    async fn freeform_query(&self, session: &QuizSession, query: &str) -> AppResult<Vec<SessionOutput>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::ValidationError("question must not be empty".to_string()));
        }
        let document = session.freeform_source()?.to_string();
        let persona = select_persona(session.require_profile()?);

        let generated = retry_unavailable(self.retry, "free-form answer", || {
            self.gateway.answer_freeform_query(&persona, &document, query)
        })
        .await;

        Ok(match generated {
            Ok(text) => vec![SessionOutput::FreeformAnswer { text }],
            Err(err) => vec![SessionOutput::error_notice(&AppError::from(err))],
        })
    }

    /// What the learner was looking at before leaving free-form mode.
    fn current_view(&self, session: &QuizSession) -> AppResult<SessionOutput> {
        match (session.step(), session.last_outcome()) {
            (SessionStep::ShowingFeedback(_), Some(outcome)) => Ok(SessionOutput::AnswerFeedback {
                outcome,
                text: session.last_feedback().to_string(),
            }),
            (SessionStep::Presenting(i), _) | (SessionStep::ShowingFeedback(i), None) => {
                Ok(SessionOutput::question_prompt(
                    i,
                    session.total_questions(),
                    &session.questions()[i],
                ))
            }
            (step, _) => Err(AppError::InvalidTransition(format!(
                "nothing to resume while {}",
                step
            ))),
        }
    }
}
