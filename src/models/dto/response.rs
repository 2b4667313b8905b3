use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{AppError, GenerationError};
use crate::models::domain::{
    AnswerOutcome, ChoiceKey, FollowupKind, Question, QuizSession, SessionId, SessionStep,
    StudyGuidance, UserProfile,
};

/// Machine-readable category of a recoverable failure shown to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InputError,
    ContentUnavailable,
    MalformedOutput,
    DocumentError,
    Internal,
}

impl From<&AppError> for ErrorKind {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::ValidationError(_)
            | AppError::InvalidTransition(_)
            | AppError::NotFound(_)
            | AppError::AlreadyExists(_) => ErrorKind::InputError,
            AppError::Document(_) => ErrorKind::DocumentError,
            AppError::Generation(GenerationError::Unavailable(_)) => ErrorKind::ContentUnavailable,
            AppError::Generation(GenerationError::MalformedOutput(_)) => ErrorKind::MalformedOutput,
            AppError::InternalError(_) => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub key: ChoiceKey,
    pub text: String,
}

/// Renderable payloads produced by one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionOutput {
    StudyPackageReady {
        summary: String,
        guidance: StudyGuidance,
    },
    QuestionPrompt {
        number: usize,
        total: usize,
        intro: String,
        text: String,
        options: Vec<OptionView>,
    },
    AnswerFeedback {
        outcome: AnswerOutcome,
        text: String,
    },
    ResultsSummary {
        score: usize,
        total: usize,
        percent: f64,
        headline: String,
    },
    FollowupMessage {
        kind: FollowupKind,
        text: String,
    },
    FreeformAnswer {
        text: String,
    },
    ErrorNotice {
        kind: ErrorKind,
        message: String,
    },
}

impl SessionOutput {
    pub fn question_prompt(index: usize, total: usize, question: &Question) -> Self {
        SessionOutput::QuestionPrompt {
            number: index + 1,
            total,
            intro: question.intro.clone(),
            text: question.prompt_text.clone(),
            options: question
                .options
                .iter()
                .map(|(key, text)| OptionView {
                    key: *key,
                    text: text.clone(),
                })
                .collect(),
        }
    }

    pub fn error_notice(err: &AppError) -> Self {
        SessionOutput::ErrorNotice {
            kind: ErrorKind::from(err),
            message: err.to_string(),
        }
    }
}

/// Result of one consumed event.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReply {
    pub session_id: SessionId,
    pub step: SessionStep,
    pub freeform: bool,
    pub outputs: Vec<SessionOutput>,
}

impl SessionReply {
    pub fn new(session: &QuizSession, outputs: Vec<SessionOutput>) -> Self {
        SessionReply {
            session_id: session.id().clone(),
            step: session.step(),
            freeform: session.is_freeform(),
            outputs,
        }
    }

    pub fn has_error(&self) -> bool {
        self.outputs
            .iter()
            .any(|o| matches!(o, SessionOutput::ErrorNotice { .. }))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
}

/// Read-only view of a session for the web shell.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub step: SessionStep,
    pub freeform: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub total_questions: usize,
    pub cursor: usize,
    pub score: usize,
    pub missed_topics: Vec<String>,
    pub last_feedback: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&QuizSession> for SessionSnapshot {
    fn from(session: &QuizSession) -> Self {
        SessionSnapshot {
            session_id: session.id().clone(),
            step: session.step(),
            freeform: session.is_freeform(),
            profile: session.profile().cloned(),
            summary: session.material().map(|m| m.summary.clone()),
            total_questions: session.total_questions(),
            cursor: session.cursor(),
            score: session.score(),
            missed_topics: session.missed_topics().to_vec(),
            last_feedback: session.last_feedback().to_string(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}
