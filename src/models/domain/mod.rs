pub mod generation_context;
pub mod question;
pub mod quiz_session;
pub mod session_event;
pub mod study_material;
pub mod study_package;
pub mod user_profile;

pub use generation_context::{FeedbackContext, FollowupContext, FollowupKind};
pub use question::{AnswerOutcome, ChoiceKey, FeedbackTemplates, Question};
pub use quiz_session::{QuizSession, ScoreReport, SessionId, SessionStep};
pub use session_event::SessionEvent;
pub use study_material::{StudyGuidance, StudyMaterial, TopicNote};
pub use study_package::{MessageSeeds, StudyPackage, QUESTIONS_PER_PACKAGE};
pub use user_profile::{ToneProfile, UserProfile};
