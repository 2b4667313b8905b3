use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, GenerationError};
use crate::models::domain::generation_context::{FeedbackContext, FollowupContext, FollowupKind};
use crate::models::domain::question::{AnswerOutcome, ChoiceKey, Question};
use crate::models::domain::study_material::StudyMaterial;
use crate::models::domain::study_package::{MessageSeeds, StudyPackage};
use crate::models::domain::user_profile::UserProfile;

/// Opaque identity of one learner's session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn telegram(chat_id: i64) -> Self {
        Self(format!("tg:{}", chat_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "name", content = "cursor", rename_all = "snake_case")]
pub enum SessionStep {
    Onboarding,
    AwaitingDocument,
    Generating,
    /// Question `i` is on screen and an answer may be submitted.
    Presenting(usize),
    /// An answer for question `i` was accepted and its feedback is being produced.
    AwaitingAnswer(usize),
    ShowingFeedback(usize),
    Results,
    AwaitingMoodAfter,
    ResultsMenu,
}

impl fmt::Display for SessionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStep::Onboarding => write!(f, "onboarding"),
            SessionStep::AwaitingDocument => write!(f, "awaiting_document"),
            SessionStep::Generating => write!(f, "generating"),
            SessionStep::Presenting(i) => write!(f, "presenting({})", i),
            SessionStep::AwaitingAnswer(i) => write!(f, "awaiting_answer({})", i),
            SessionStep::ShowingFeedback(i) => write!(f, "showing_feedback({})", i),
            SessionStep::Results => write!(f, "results"),
            SessionStep::AwaitingMoodAfter => write!(f, "awaiting_mood_after"),
            SessionStep::ResultsMenu => write!(f, "results_menu"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Generation {
    /// A new document; the package replaces the material.
    Fresh { raw_text: String },
    /// Same document, new questions.
    Regenerate,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoreReport {
    pub score: usize,
    pub total: usize,
    pub percent: f64,
}

/// One learner's quiz lifecycle. All mutation goes through the transition methods,
/// each of which either applies completely or leaves the session untouched.
#[derive(Clone, Debug)]
pub struct QuizSession {
    id: SessionId,
    step: SessionStep,
    profile: Option<UserProfile>,
    material: Option<StudyMaterial>,
    seeds: MessageSeeds,
    questions: Vec<Question>,
    cursor: usize,
    score: usize,
    missed_topics: Vec<String>,
    last_feedback: String,
    last_outcome: Option<AnswerOutcome>,
    freeform: bool,
    pending_outcome: Option<AnswerOutcome>,
    generation: Option<Generation>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn rejected(event: &str, step: SessionStep) -> AppError {
    AppError::InvalidTransition(format!("cannot {} while {}", event, step))
}

impl QuizSession {
    pub fn new(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            step: SessionStep::Onboarding,
            profile: None,
            material: None,
            seeds: MessageSeeds::default(),
            questions: Vec::new(),
            cursor: 0,
            score: 0,
            missed_topics: Vec::new(),
            last_feedback: String::new(),
            last_outcome: None,
            freeform: false,
            pending_outcome: None,
            generation: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn step(&self) -> SessionStep {
        self.step
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn material(&self) -> Option<&StudyMaterial> {
        self.material.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn missed_topics(&self) -> &[String] {
        &self.missed_topics
    }

    pub fn last_feedback(&self) -> &str {
        &self.last_feedback
    }

    pub fn last_outcome(&self) -> Option<AnswerOutcome> {
        self.last_outcome
    }

    pub fn is_freeform(&self) -> bool {
        self.freeform
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Index of the question currently on screen, if any.
    pub fn active_question_index(&self) -> Option<usize> {
        match self.step {
            SessionStep::Presenting(i)
            | SessionStep::AwaitingAnswer(i)
            | SessionStep::ShowingFeedback(i) => Some(i),
            _ => None,
        }
    }

    pub fn require_profile(&self) -> AppResult<&UserProfile> {
        self.profile.as_ref().ok_or_else(|| {
            AppError::InternalError(format!("session {} has no profile in step {}", self.id, self.step))
        })
    }

    pub fn score_report(&self) -> ScoreReport {
        let total = self.questions.len();
        let percent = if total == 0 {
            0.0
        } else {
            100.0 * self.score as f64 / total as f64
        };
        ScoreReport {
            score: self.score,
            total,
            percent,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn submit_profile(&mut self, profile: UserProfile) -> AppResult<()> {
        if self.step != SessionStep::Onboarding {
            return Err(rejected("submit a profile", self.step));
        }
        self.profile = Some(profile);
        self.step = SessionStep::AwaitingDocument;
        self.touch();
        Ok(())
    }

    /// Checks that a document would be accepted right now, without changing anything.
    pub fn ensure_accepts_document(&self) -> AppResult<()> {
        if self.step != SessionStep::AwaitingDocument {
            return Err(rejected("submit a document", self.step));
        }
        Ok(())
    }

    pub fn begin_generation(&mut self, raw_text: String) -> AppResult<()> {
        self.ensure_accepts_document()?;
        if raw_text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "document text must not be empty".to_string(),
            ));
        }
        self.generation = Some(Generation::Fresh { raw_text });
        self.freeform = false;
        self.step = SessionStep::Generating;
        self.touch();
        Ok(())
    }

    /// Play again: same profile and material, new questions.
    pub fn begin_regeneration(&mut self) -> AppResult<()> {
        if self.step != SessionStep::ResultsMenu {
            return Err(rejected("play again", self.step));
        }
        if self.material.is_none() {
            return Err(AppError::InvalidTransition(
                "cannot play again without study material".to_string(),
            ));
        }
        self.generation = Some(Generation::Regenerate);
        self.freeform = false;
        self.step = SessionStep::Generating;
        self.touch();
        Ok(())
    }

    /// Text the pending generation should be based on.
    pub fn generation_source(&self) -> Option<&str> {
        match (&self.generation, self.step) {
            (Some(Generation::Fresh { raw_text }), SessionStep::Generating) => Some(raw_text),
            (Some(Generation::Regenerate), SessionStep::Generating) => {
                self.material.as_ref().map(|m| m.raw_text.as_str())
            }
            _ => None,
        }
    }

    /// Returns true when the completed generation replaced the study material.
    pub fn complete_generation(&mut self, package: StudyPackage) -> AppResult<bool> {
        if self.step != SessionStep::Generating {
            return Err(rejected("accept a study package", self.step));
        }
        if package.questions.is_empty() {
            return Err(GenerationError::MalformedOutput(
                "study package contains no questions".to_string(),
            )
            .into());
        }
        let generation = self.generation.take().ok_or_else(|| {
            AppError::InternalError("generating without a pending generation".to_string())
        })?;

        let replaced_material = match generation {
            Generation::Fresh { raw_text } => {
                let (material, questions, seeds) = package.into_parts(raw_text);
                self.material = Some(material);
                self.questions = questions;
                self.seeds = seeds;
                true
            }
            Generation::Regenerate => {
                self.questions = package.questions;
                self.seeds = package.seeds;
                false
            }
        };

        self.cursor = 0;
        self.score = 0;
        self.missed_topics.clear();
        self.last_feedback.clear();
        self.last_outcome = None;
        self.pending_outcome = None;
        self.step = SessionStep::Presenting(0);
        self.touch();
        Ok(replaced_material)
    }

    /// A failed generation always lands back at the upload step.
    pub fn fail_generation(&mut self) -> AppResult<()> {
        if self.step != SessionStep::Generating {
            return Err(rejected("fail a generation", self.step));
        }
        self.generation = None;
        self.step = SessionStep::AwaitingDocument;
        self.touch();
        Ok(())
    }

    /// Accepts one answer for the question on screen. Only one answer per question
    /// can be outstanding; anything else is rejected without touching the session.
    pub fn accept_answer(&mut self, key: ChoiceKey) -> AppResult<FeedbackContext> {
        let index = match self.step {
            SessionStep::Presenting(i) => i,
            step => return Err(rejected("submit an answer", step)),
        };
        let question = self.questions.get(index).ok_or_else(|| {
            AppError::InvalidTransition(format!("question {} does not exist", index + 1))
        })?;
        let selected_text = question.option_text(key).ok_or_else(|| {
            AppError::ValidationError(format!("option {} is not available for this question", key))
        })?;

        let outcome = question.grade(key);
        let context = FeedbackContext {
            question_number: index + 1,
            question_text: question.prompt_text.clone(),
            selected_key: key,
            selected_text: selected_text.to_string(),
            correct_key: question.correct_key,
            correct_text: question.correct_text().to_string(),
            outcome,
            tone_seed: question.feedback_templates.for_outcome(outcome).to_string(),
        };

        self.pending_outcome = Some(outcome);
        self.freeform = false;
        self.step = SessionStep::AwaitingAnswer(index);
        self.touch();
        Ok(context)
    }

    /// Applies the scoring rule for the outstanding answer and shows its feedback.
    pub fn record_feedback(&mut self, feedback: String) -> AppResult<AnswerOutcome> {
        let index = match self.step {
            SessionStep::AwaitingAnswer(i) => i,
            step => return Err(rejected("record feedback", step)),
        };
        let outcome = self.pending_outcome.ok_or_else(|| {
            AppError::InternalError("awaiting an answer without a pending outcome".to_string())
        })?;

        match outcome {
            AnswerOutcome::Correct => self.score += 1,
            AnswerOutcome::Incorrect => {
                let topic = self.questions[index].review_topic.clone();
                self.missed_topics.push(topic);
            }
            // An explicit pass is neither scored nor tracked for review.
            AnswerOutcome::Pass => {}
        }

        self.pending_outcome = None;
        self.last_outcome = Some(outcome);
        self.last_feedback = feedback;
        self.step = SessionStep::ShowingFeedback(index);
        self.touch();
        Ok(outcome)
    }

    pub fn advance(&mut self) -> AppResult<SessionStep> {
        let index = match self.step {
            SessionStep::ShowingFeedback(i) => i,
            step => return Err(rejected("advance", step)),
        };
        self.cursor = index + 1;
        self.last_feedback.clear();
        self.last_outcome = None;
        self.freeform = false;
        self.step = if self.cursor < self.questions.len() {
            SessionStep::Presenting(self.cursor)
        } else {
            SessionStep::Results
        };
        self.touch();
        Ok(self.step)
    }

    pub fn submit_mood_after(&mut self, mood_after: &str) -> AppResult<FollowupContext> {
        if self.step != SessionStep::Results {
            return Err(rejected("submit the after-quiz mood", self.step));
        }
        let profile = self
            .profile
            .as_mut()
            .ok_or_else(|| AppError::InternalError("results reached without a profile".to_string()))?;
        profile.mood_after = mood_after.trim().to_string();

        self.step = SessionStep::AwaitingMoodAfter;
        self.touch();
        self.build_followup_context(FollowupKind::PostQuizAdvice)
    }

    pub fn complete_advice(&mut self) -> AppResult<()> {
        if self.step != SessionStep::AwaitingMoodAfter {
            return Err(rejected("finish post-quiz advice", self.step));
        }
        self.step = SessionStep::ResultsMenu;
        self.touch();
        Ok(())
    }

    pub fn followup_context(&self, kind: FollowupKind) -> AppResult<FollowupContext> {
        if self.step != SessionStep::ResultsMenu {
            return Err(rejected("request a follow-up message", self.step));
        }
        self.build_followup_context(kind)
    }

    fn build_followup_context(&self, kind: FollowupKind) -> AppResult<FollowupContext> {
        let profile = self.require_profile()?;
        let seed = match kind {
            FollowupKind::DailyMessage => self.seeds.daily.clone(),
            FollowupKind::NightMessage => self.seeds.night.clone(),
            FollowupKind::PostQuizAdvice | FollowupKind::SpecialMessage => String::new(),
        };
        Ok(FollowupContext {
            kind,
            display_name: profile.display_name.clone(),
            locale: profile.locale.clone(),
            mood_before: profile.mood_before.clone(),
            mood_after: profile.mood_after.clone(),
            missed_topics: self.missed_topics.clone(),
            seed,
        })
    }

    /// Wipes everything back to onboarding. Accepted from any step.
    pub fn start_over(&mut self) {
        let id = self.id.clone();
        let created_at = self.created_at;
        *self = QuizSession::new(id);
        self.created_at = created_at;
    }

    pub fn enter_freeform(&mut self) -> AppResult<()> {
        match self.step {
            SessionStep::Presenting(_) | SessionStep::ShowingFeedback(_) if self.material.is_some() => {
                self.freeform = true;
                self.touch();
                Ok(())
            }
            step => Err(rejected("chat about the document", step)),
        }
    }

    /// Document text for a free-form question. Only available while free-form mode is on.
    pub fn freeform_source(&self) -> AppResult<&str> {
        if !self.freeform {
            return Err(AppError::InvalidTransition(
                "free-form mode is not active".to_string(),
            ));
        }
        self.material
            .as_ref()
            .map(|m| m.raw_text.as_str())
            .ok_or_else(|| AppError::InvalidTransition("no document has been studied yet".to_string()))
    }

    pub fn resume_quiz(&mut self) -> AppResult<SessionStep> {
        match self.step {
            SessionStep::Presenting(_) | SessionStep::ShowingFeedback(_) => {
                self.freeform = false;
                self.touch();
                Ok(self.step)
            }
            step => Err(rejected("resume the quiz", step)),
        }
    }

    /// Structural invariants that must hold after every transition.
    pub fn invariants_hold(&self) -> bool {
        let n = self.questions.len();
        let cursor_ok = self.cursor <= n;
        let answered = self.answered_count();
        let score_ok = self.score <= answered;
        let missed_ok = self.missed_topics.len() <= answered
            && self.missed_topics.len() + self.score <= n;
        let active_ok = self.active_question_index().map_or(true, |i| i < n && i == self.cursor);
        cursor_ok && score_ok && missed_ok && active_ok
    }

    /// While feedback for question `cursor` is shown, its answer already counts.
    fn answered_count(&self) -> usize {
        match self.step {
            SessionStep::ShowingFeedback(i) if i == self.cursor => self.cursor + 1,
            _ => self.cursor,
        }
    }
}
