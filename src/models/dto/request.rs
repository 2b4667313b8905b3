use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;
use crate::models::domain::{ChoiceKey, FollowupKind, SessionEvent, ToneProfile};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitProfileRequest {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: String,

    #[serde(default)]
    pub tone_profile: ToneProfile,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub locale: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub mood_before: String,
}

impl From<SubmitProfileRequest> for SessionEvent {
    fn from(req: SubmitProfileRequest) -> Self {
        SessionEvent::SubmitProfile {
            name: req.name,
            tone_profile: req.tone_profile,
            locale: req.locale,
            mood_before: req.mood_before,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 3))]
    pub key: String,
}

impl TryFrom<SubmitAnswerRequest> for SessionEvent {
    type Error = AppError;

    fn try_from(req: SubmitAnswerRequest) -> Result<Self, Self::Error> {
        let key: ChoiceKey = req.key.parse()?;
        Ok(SessionEvent::SubmitAnswer { key })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitMoodRequest {
    #[validate(length(max = 1000))]
    pub text: String,
}

impl From<SubmitMoodRequest> for SessionEvent {
    fn from(req: SubmitMoodRequest) -> Self {
        SessionEvent::SubmitMoodAfter { text: req.text }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestFollowupRequest {
    pub kind: FollowupKind,
}

impl From<RequestFollowupRequest> for SessionEvent {
    fn from(req: RequestFollowupRequest) -> Self {
        SessionEvent::RequestFollowup { kind: req.kind }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FreeformQueryRequest {
    #[validate(length(min = 1, max = 2000, message = "Question must be 1 to 2000 characters"))]
    pub text: String,
}

impl From<FreeformQueryRequest> for SessionEvent {
    fn from(req: FreeformQueryRequest) -> Self {
        SessionEvent::FreeformQuery { text: req.text }
    }
}
