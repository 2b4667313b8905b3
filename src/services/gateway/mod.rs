pub mod llm_gateway;

use async_trait::async_trait;

use crate::errors::GenerationError;
use crate::models::domain::{FeedbackContext, FollowupContext, StudyPackage};
use crate::services::persona_service::PersonaBlock;

pub use llm_gateway::LlmGateway;

/// Opaque, fallible text and quiz generator. Implementations may be slow and
/// may return different text for identical input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Must return a package that already passed structural validation.
    async fn generate_study_package(
        &self,
        persona: &PersonaBlock,
        document_text: &str,
    ) -> Result<StudyPackage, GenerationError>;

    async fn generate_followup_message(
        &self,
        persona: &PersonaBlock,
        context: &FollowupContext,
    ) -> Result<String, GenerationError>;

    async fn generate_answer_feedback(
        &self,
        persona: &PersonaBlock,
        context: &FeedbackContext,
    ) -> Result<String, GenerationError>;

    async fn answer_freeform_query(
        &self,
        persona: &PersonaBlock,
        document_text: &str,
        query: &str,
    ) -> Result<String, GenerationError>;
}
