use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::domain::question::{AnswerOutcome, ChoiceKey};

/// Context line used for post-quiz advice when nothing was missed.
pub const NO_MISSED_TOPICS: &str = "No major weak areas - every question was handled beautifully.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowupKind {
    PostQuizAdvice,
    DailyMessage,
    NightMessage,
    SpecialMessage,
}

impl fmt::Display for FollowupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowupKind::PostQuizAdvice => write!(f, "post_quiz_advice"),
            FollowupKind::DailyMessage => write!(f, "daily_message"),
            FollowupKind::NightMessage => write!(f, "night_message"),
            FollowupKind::SpecialMessage => write!(f, "special_message"),
        }
    }
}

/// What the gateway needs to write feedback for one answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeedbackContext {
    pub question_number: usize,
    pub question_text: String,
    pub selected_key: ChoiceKey,
    pub selected_text: String,
    pub correct_key: ChoiceKey,
    pub correct_text: String,
    pub outcome: AnswerOutcome,
    pub tone_seed: String,
}

impl FeedbackContext {
    /// The two lines every feedback message must open with.
    pub fn header(&self) -> String {
        format!(
            "You selected: [{}] {}\nCorrect answer: [{}] {}",
            self.selected_key, self.selected_text, self.correct_key, self.correct_text
        )
    }

    /// Returns `text` unchanged when it already opens with the header, otherwise prefixes it.
    pub fn enforce_header(&self, text: &str) -> String {
        let header = self.header();
        let body = text.trim();
        if body.starts_with(&header) {
            body.to_string()
        } else {
            format!("{}\n\n{}", header, body)
        }
    }

    /// Feedback assembled from the pre-generated template when the gateway gave up.
    pub fn fallback_feedback(&self) -> String {
        self.enforce_header(&self.tone_seed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FollowupContext {
    pub kind: FollowupKind,
    pub display_name: String,
    pub locale: String,
    pub mood_before: String,
    pub mood_after: String,
    pub missed_topics: Vec<String>,
    pub seed: String,
}

impl FollowupContext {
    /// Missed topics as a bullet list, or the "nothing missed" line.
    pub fn missed_topics_block(&self) -> String {
        if self.missed_topics.is_empty() {
            format!("- {}", NO_MISSED_TOPICS)
        } else {
            self.missed_topics
                .iter()
                .map(|t| format!("- {}", t))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> FeedbackContext {
        FeedbackContext {
            question_number: 1,
            question_text: "2 + 2?".to_string(),
            selected_key: ChoiceKey::A,
            selected_text: "3".to_string(),
            correct_key: ChoiceKey::B,
            correct_text: "4".to_string(),
            outcome: AnswerOutcome::Incorrect,
            tone_seed: "Aww my love, so close.".to_string(),
        }
    }

    #[test]
    fn test_header_restates_both_choices() {
        assert_eq!(
            context().header(),
            "You selected: [A] 3\nCorrect answer: [B] 4"
        );
    }

    #[test]
    fn test_enforce_header_keeps_compliant_text() {
        let ctx = context();
        let text = format!("{}\nBaby, it's four.", ctx.header());

        assert_eq!(ctx.enforce_header(&text), text);
    }

    #[test]
    fn test_enforce_header_prefixes_non_compliant_text() {
        let ctx = context();
        let fixed = ctx.enforce_header("Baby, it's four.");

        assert!(fixed.starts_with(&ctx.header()));
        assert!(fixed.ends_with("Baby, it's four."));
    }

    #[test]
    fn test_fallback_uses_template() {
        let ctx = context();
        let fallback = ctx.fallback_feedback();

        assert!(fallback.starts_with("You selected: [A] 3"));
        assert!(fallback.contains("so close"));
    }

    #[test]
    fn test_missed_topics_block() {
        let mut ctx = FollowupContext {
            kind: FollowupKind::PostQuizAdvice,
            display_name: "Ana".to_string(),
            locale: "Spain".to_string(),
            mood_before: String::new(),
            mood_after: String::new(),
            missed_topics: vec![],
            seed: String::new(),
        };
        assert!(ctx.missed_topics_block().contains(NO_MISSED_TOPICS));

        ctx.missed_topics = vec!["Osmosis".to_string(), "Diffusion".to_string()];
        assert_eq!(ctx.missed_topics_block(), "- Osmosis\n- Diffusion");
    }
}
