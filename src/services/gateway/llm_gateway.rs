use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::config::Config;
use crate::constants::prompts::{
    ANSWER_FEEDBACK_PROMPT, DAILY_MESSAGE_PROMPT, FREEFORM_QUERY_PROMPT, NIGHT_MESSAGE_PROMPT,
    POST_QUIZ_ADVICE_PROMPT, SPECIAL_MESSAGE_PROMPT, STUDY_PACKAGE_PROMPT,
};
use crate::errors::GenerationError;
use crate::models::domain::{
    AnswerOutcome, FeedbackContext, FollowupContext, FollowupKind, StudyPackage,
    QUESTIONS_PER_PACKAGE,
};
use crate::models::dto::StudyPackageDto;
use crate::services::gateway::ContentGateway;
use crate::services::persona_service::PersonaBlock;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("CODE_FENCE is a valid regex pattern")
});

static STUDY_PACKAGE_SCHEMA: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(StudyPackageDto);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
});

/// Content gateway backed by an OpenAI-compatible chat completions endpoint.
pub struct LlmGateway {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl LlmGateway {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.llm_api_base.clone())
            .with_api_key(config.llm_api_key.expose_secret().to_string());

        Self {
            client: Client::with_config(openai_config),
            model: config.llm_model.clone(),
            timeout: config.llm_timeout(),
        }
    }

    async fn complete(
        &self,
        persona: &PersonaBlock,
        prompt: String,
        json_output: bool,
    ) -> Result<String, GenerationError> {
        let mut request = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": persona.directive() },
                { "role": "user", "content": prompt },
            ],
        });
        if json_output {
            request["response_format"] = json!({ "type": "json_object" });
        }

        let response: Value = tokio::time::timeout(self.timeout, self.client.chat().create_byot(request))
            .await
            .map_err(|_| {
                GenerationError::Unavailable(format!(
                    "no response within {} seconds",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        completion_text(&response)
    }
}

/// Pulls the first choice's text out of a chat completion body.
fn completion_text(response: &Value) -> Result<String, GenerationError> {
    let text = response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GenerationError::MalformedOutput(
            "completion contained no text".to_string(),
        ));
    }
    Ok(text.to_string())
}

fn strip_code_fence(text: &str) -> &str {
    CODE_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text.trim(), |m| m.as_str())
}

/// Parses and validates a raw study package reply.
pub fn parse_study_package(text: &str) -> Result<StudyPackage, GenerationError> {
    let dto: StudyPackageDto = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| GenerationError::MalformedOutput(format!("study package is not valid JSON: {}", e)))?;

    StudyPackage::try_from(dto).map_err(|e| match e {
        crate::errors::AppError::Generation(err) => err,
        other => GenerationError::MalformedOutput(other.to_string()),
    })
}

fn study_package_prompt(document_text: &str) -> String {
    STUDY_PACKAGE_PROMPT
        .replace("{question_count}", &QUESTIONS_PER_PACKAGE.to_string())
        .replace("{schema}", &STUDY_PACKAGE_SCHEMA)
        .replace("{document}", document_text)
}

fn feedback_prompt(context: &FeedbackContext) -> String {
    let outcome = match context.outcome {
        AnswerOutcome::Correct => "the learner answered correctly",
        AnswerOutcome::Incorrect => "the learner answered incorrectly",
        AnswerOutcome::Pass => "the learner chose to pass",
    };
    ANSWER_FEEDBACK_PROMPT
        .replace("{question_number}", &context.question_number.to_string())
        .replace("{outcome}", outcome)
        .replace("{header}", &context.header())
        .replace("{tone_seed}", &context.tone_seed)
        .replace("{question_text}", &context.question_text)
}

fn followup_prompt(context: &FollowupContext) -> String {
    let template = match context.kind {
        FollowupKind::PostQuizAdvice => POST_QUIZ_ADVICE_PROMPT,
        FollowupKind::DailyMessage => DAILY_MESSAGE_PROMPT,
        FollowupKind::NightMessage => NIGHT_MESSAGE_PROMPT,
        FollowupKind::SpecialMessage => SPECIAL_MESSAGE_PROMPT,
    };
    let or_unknown = |value: &str| {
        if value.is_empty() {
            "unknown".to_string()
        } else {
            value.to_string()
        }
    };
    template
        .replace("{missed_topics}", &context.missed_topics_block())
        .replace("{mood_before}", &or_unknown(&context.mood_before))
        .replace("{mood_after}", &or_unknown(&context.mood_after))
        .replace("{locale}", &context.locale)
        .replace("{seed}", &context.seed)
        .replace("{name}", &context.display_name)
}

fn freeform_prompt(document_text: &str, query: &str) -> String {
    FREEFORM_QUERY_PROMPT
        .replace("{query}", query)
        .replace("{document}", document_text)
}

#[async_trait]
impl ContentGateway for LlmGateway {
    async fn generate_study_package(
        &self,
        persona: &PersonaBlock,
        document_text: &str,
    ) -> Result<StudyPackage, GenerationError> {
        let text = self
            .complete(persona, study_package_prompt(document_text), true)
            .await?;
        let package = parse_study_package(&text)?;
        log::info!(
            "Generated study package with {} questions",
            package.questions.len()
        );
        Ok(package)
    }

    async fn generate_followup_message(
        &self,
        persona: &PersonaBlock,
        context: &FollowupContext,
    ) -> Result<String, GenerationError> {
        self.complete(persona, followup_prompt(context), false).await
    }

    async fn generate_answer_feedback(
        &self,
        persona: &PersonaBlock,
        context: &FeedbackContext,
    ) -> Result<String, GenerationError> {
        self.complete(persona, feedback_prompt(context), false).await
    }

    async fn answer_freeform_query(
        &self,
        persona: &PersonaBlock,
        document_text: &str,
        query: &str,
    ) -> Result<String, GenerationError> {
        self.complete(persona, freeform_prompt(document_text, query), false)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::ChoiceKey;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_completion_text_requires_content() {
        let ok = json!({ "choices": [{ "message": { "content": "  hello " } }] });
        assert_eq!(completion_text(&ok), Ok("hello".to_string()));

        let empty = json!({ "choices": [{ "message": { "content": "" } }] });
        assert!(matches!(
            completion_text(&empty),
            Err(GenerationError::MalformedOutput(_))
        ));

        let missing = json!({ "id": "x" });
        assert!(completion_text(&missing).is_err());
    }

    #[test]
    fn test_parse_study_package_rejects_prose() {
        let result = parse_study_package("Sure! Here is your quiz.");

        assert!(matches!(result, Err(GenerationError::MalformedOutput(_))));
    }

    #[test]
    fn test_parse_study_package_surfaces_validation_message() {
        let fenced = "```json\n{\"sweet_summary\":\"s\",\"study_guide\":{},\"questions\":[]}\n```";

        match parse_study_package(fenced) {
            Err(GenerationError::MalformedOutput(message)) => {
                assert!(message.contains("expected 17 questions"))
            }
            other => panic!("Expected MalformedOutput, got {:?}", other),
        }
    }

    #[test]
    fn test_study_package_prompt_embeds_schema_and_document() {
        let prompt = study_package_prompt("Mitochondria make ATP.");

        assert!(prompt.contains("Mitochondria make ATP."));
        assert!(prompt.contains("EXACTLY 17"));
        assert!(prompt.contains("correct_answer_key"));
        assert!(!prompt.contains("{schema}"));
    }

    #[test]
    fn test_feedback_prompt_carries_header() {
        let context = FeedbackContext {
            question_number: 3,
            question_text: "2 + 2?".to_string(),
            selected_key: ChoiceKey::E,
            selected_text: "Pass".to_string(),
            correct_key: ChoiceKey::B,
            correct_text: "4".to_string(),
            outcome: AnswerOutcome::Pass,
            tone_seed: "It's fine".to_string(),
        };
        let prompt = feedback_prompt(&context);

        assert!(prompt.contains("You selected: [E] Pass\nCorrect answer: [B] 4"));
        assert!(prompt.contains("chose to pass"));
    }

    #[test]
    fn test_followup_prompt_lists_missed_topics() {
        let context = FollowupContext {
            kind: FollowupKind::PostQuizAdvice,
            display_name: "Ana".to_string(),
            locale: "Spain".to_string(),
            mood_before: "nervous".to_string(),
            mood_after: String::new(),
            missed_topics: vec!["Osmosis".to_string()],
            seed: String::new(),
        };
        let prompt = followup_prompt(&context);

        assert!(prompt.contains("- Osmosis"));
        assert!(prompt.contains("Mood after the quiz: unknown"));
        assert!(prompt.contains("Ana"));
    }
}
