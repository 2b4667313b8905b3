use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Answer choices. `E` is always the "pass" choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum ChoiceKey {
    A,
    B,
    C,
    D,
    E,
}

impl ChoiceKey {
    pub const PASS: ChoiceKey = ChoiceKey::E;
    pub const ALL: [ChoiceKey; 5] = [
        ChoiceKey::A,
        ChoiceKey::B,
        ChoiceKey::C,
        ChoiceKey::D,
        ChoiceKey::E,
    ];

    pub fn is_pass(self) -> bool {
        self == Self::PASS
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChoiceKey::A => "A",
            ChoiceKey::B => "B",
            ChoiceKey::C => "C",
            ChoiceKey::D => "D",
            ChoiceKey::E => "E",
        }
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoiceKey {
    type Err = AppError;

    /// Accepts `b`, `B` or `[B]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().trim_start_matches('[').trim_end_matches(']').trim();
        ChoiceKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| AppError::ValidationError(format!("'{}' is not an answer choice", s)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    Pass,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedbackTemplates {
    pub on_correct: String,
    pub on_incorrect: String,
    pub on_pass: String,
}

impl FeedbackTemplates {
    pub fn for_outcome(&self, outcome: AnswerOutcome) -> &str {
        match outcome {
            AnswerOutcome::Correct => &self.on_correct,
            AnswerOutcome::Incorrect => &self.on_incorrect,
            AnswerOutcome::Pass => &self.on_pass,
        }
    }
}

/// One generated multiple-choice question. Immutable once validated.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub intro: String,
    pub prompt_text: String,
    pub options: BTreeMap<ChoiceKey, String>,
    pub correct_key: ChoiceKey,
    pub feedback_templates: FeedbackTemplates,
    pub review_topic: String,
    pub intensity_level: u32,
}

impl Question {
    pub fn option_text(&self, key: ChoiceKey) -> Option<&str> {
        self.options.get(&key).map(String::as_str)
    }

    pub fn correct_text(&self) -> &str {
        self.option_text(self.correct_key).unwrap_or_default()
    }

    /// The pass choice is checked after the correct key, so a pass can never count as correct.
    pub fn grade(&self, selected: ChoiceKey) -> AnswerOutcome {
        if selected == self.correct_key && !selected.is_pass() {
            AnswerOutcome::Correct
        } else if selected.is_pass() {
            AnswerOutcome::Pass
        } else {
            AnswerOutcome::Incorrect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            intro: "Come sit with me, my love".to_string(),
            prompt_text: "Which organelle produces ATP?".to_string(),
            options: BTreeMap::from([
                (ChoiceKey::A, "Nucleus".to_string()),
                (ChoiceKey::B, "Mitochondria".to_string()),
                (ChoiceKey::C, "Ribosome".to_string()),
                (ChoiceKey::D, "Golgi body".to_string()),
                (ChoiceKey::E, "Pass".to_string()),
            ]),
            correct_key: ChoiceKey::B,
            feedback_templates: FeedbackTemplates {
                on_correct: "So proud".to_string(),
                on_incorrect: "Come here".to_string(),
                on_pass: "It's okay".to_string(),
            },
            review_topic: "Cell respiration".to_string(),
            intensity_level: 1,
        }
    }

    #[test]
    fn test_choice_key_parsing_is_lenient() {
        assert_eq!("b".parse::<ChoiceKey>().ok(), Some(ChoiceKey::B));
        assert_eq!(" [E] ".parse::<ChoiceKey>().ok(), Some(ChoiceKey::E));
        assert!("F".parse::<ChoiceKey>().is_err());
        assert!("".parse::<ChoiceKey>().is_err());
    }

    #[test]
    fn test_choice_key_serializes_as_letter() {
        let json = serde_json::to_string(&ChoiceKey::C).expect("key should serialize");
        assert_eq!(json, "\"C\"");
    }

    #[test]
    fn test_grade_outcomes() {
        let question = sample_question();

        assert_eq!(question.grade(ChoiceKey::B), AnswerOutcome::Correct);
        assert_eq!(question.grade(ChoiceKey::A), AnswerOutcome::Incorrect);
        assert_eq!(question.grade(ChoiceKey::E), AnswerOutcome::Pass);
    }

    #[test]
    fn test_option_lookup() {
        let question = sample_question();

        assert_eq!(question.correct_text(), "Mitochondria");
        assert_eq!(question.option_text(ChoiceKey::E), Some("Pass"));
    }

    #[test]
    fn test_templates_by_outcome() {
        let question = sample_question();

        assert_eq!(question.feedback_templates.for_outcome(AnswerOutcome::Pass), "It's okay");
        assert_eq!(question.feedback_templates.for_outcome(AnswerOutcome::Correct), "So proud");
    }
}
