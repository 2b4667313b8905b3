use std::collections::BTreeMap;

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use crate::models::domain::{
        ChoiceKey, FeedbackTemplates, MessageSeeds, Question, SessionEvent, StudyGuidance,
        StudyPackage, TopicNote, ToneProfile, UserProfile,
    };

    pub const DOCUMENT_TEXT: &str = "Mitochondria produce ATP through cellular respiration.";
    pub const CORRECT_KEY: ChoiceKey = ChoiceKey::B;
    pub const WRONG_KEY: ChoiceKey = ChoiceKey::A;
    pub const INCORRECT_TEMPLATE: &str = "Aww my love, come here.";
    pub const DAILY_SEED: &str = "A little study every morning";
    pub const NIGHT_SEED: &str = "Proud of you tonight";

    /// Question `number` (1-based) of a package of `total`, correct answer B.
    pub fn question(number: usize, total: usize) -> Question {
        Question {
            intro: format!("Warm-up {}", number),
            prompt_text: format!("Question {} of {}?", number, total),
            options: BTreeMap::from([
                (ChoiceKey::A, "Nucleus".to_string()),
                (ChoiceKey::B, "Mitochondria".to_string()),
                (ChoiceKey::C, "Ribosome".to_string()),
                (ChoiceKey::D, "Golgi body".to_string()),
                (ChoiceKey::E, "Pass".to_string()),
            ]),
            correct_key: CORRECT_KEY,
            feedback_templates: FeedbackTemplates {
                on_correct: "So proud of you!".to_string(),
                on_incorrect: INCORRECT_TEMPLATE.to_string(),
                on_pass: "It's okay to skip, sweetheart.".to_string(),
            },
            review_topic: format!("Topic {}", number),
            intensity_level: number as u32,
        }
    }

    /// A valid package with `count` questions and intensity climbing 1..=count.
    pub fn study_package(count: usize) -> StudyPackage {
        StudyPackage {
            summary: "This document is all about cell energy.".to_string(),
            guidance: StudyGuidance {
                overview: "Cells need energy.".to_string(),
                exam_strategy: "Know the organelles.".to_string(),
                key_topics: vec!["Respiration".to_string()],
                topic_notes: vec![TopicNote {
                    topic: "Respiration".to_string(),
                    nuance: "Not the same as breathing".to_string(),
                    importance: "Shows up every year".to_string(),
                }],
            },
            questions: (1..=count).map(|n| question(n, count)).collect(),
            seeds: MessageSeeds {
                daily: DAILY_SEED.to_string(),
                night: NIGHT_SEED.to_string(),
            },
        }
    }

    pub fn warm_profile() -> UserProfile {
        UserProfile::new("Ana", ToneProfile::Warm, "Spain", "nervous")
    }

    pub fn warm_profile_event() -> SessionEvent {
        SessionEvent::SubmitProfile {
            name: "Ana".to_string(),
            tone_profile: ToneProfile::Warm,
            locale: "Spain".to_string(),
            mood_before: "nervous".to_string(),
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::QUESTIONS_PER_PACKAGE;

    #[test]
    fn test_fixture_package_is_full_length() {
        let package = study_package(QUESTIONS_PER_PACKAGE);

        assert_eq!(package.questions.len(), 17);
        assert_eq!(package.questions[0].intensity_level, 1);
        assert_eq!(package.questions[16].intensity_level, 17);
    }

    #[test]
    fn test_fixture_profile() {
        let profile = warm_profile();

        assert_eq!(profile.display_name, "Ana");
        assert!(profile.is_warm());
    }
}
