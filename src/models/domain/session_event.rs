use std::fmt;

use crate::models::domain::generation_context::FollowupKind;
use crate::models::domain::question::ChoiceKey;
use crate::models::domain::user_profile::ToneProfile;

/// Everything a front end can ask the session to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    SubmitProfile {
        name: String,
        tone_profile: ToneProfile,
        locale: String,
        mood_before: String,
    },
    SubmitDocument {
        bytes: Vec<u8>,
    },
    SubmitAnswer {
        key: ChoiceKey,
    },
    Advance,
    SubmitMoodAfter {
        text: String,
    },
    RequestFollowup {
        kind: FollowupKind,
    },
    PlayAgain,
    StartOver,
    EnterFreeformMode,
    FreeformQuery {
        text: String,
    },
    /// Leaves free-form mode and shows the current question again.
    ResumeQuiz,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::SubmitProfile { .. } => "submit_profile",
            SessionEvent::SubmitDocument { .. } => "submit_document",
            SessionEvent::SubmitAnswer { .. } => "submit_answer",
            SessionEvent::Advance => "advance",
            SessionEvent::SubmitMoodAfter { .. } => "submit_mood_after",
            SessionEvent::RequestFollowup { .. } => "request_followup",
            SessionEvent::PlayAgain => "play_again",
            SessionEvent::StartOver => "start_over",
            SessionEvent::EnterFreeformMode => "enter_freeform_mode",
            SessionEvent::FreeformQuery { .. } => "freeform_query",
            SessionEvent::ResumeQuiz => "resume_quiz",
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
