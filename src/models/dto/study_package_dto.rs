use std::collections::{BTreeMap, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, GenerationError};
use crate::models::domain::{
    ChoiceKey, FeedbackTemplates, MessageSeeds, Question, StudyGuidance, StudyPackage, TopicNote,
    QUESTIONS_PER_PACKAGE,
};

/// Shape the model is asked to produce. Field names are part of the prompt contract.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct StudyPackageDto {
    pub sweet_summary: String,
    pub study_guide: StudyGuideDto,
    pub questions: Vec<GeneratedQuestionDto>,
    #[serde(default)]
    pub daily_romantic_message_seed: String,
    #[serde(default)]
    pub night_mode_message_seed: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct StudyGuideDto {
    #[serde(default)]
    pub overall_advice: String,
    #[serde(default)]
    pub exam_strategy: String,
    #[serde(default)]
    pub key_topics: Vec<String>,
    #[serde(default)]
    pub topic_notes: Vec<TopicNoteDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TopicNoteDto {
    pub topic: String,
    #[serde(default)]
    pub nuance_note: String,
    #[serde(default)]
    pub why_important: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GeneratedQuestionDto {
    #[serde(default)]
    pub introduction: String,
    pub question_text: String,
    /// Keys "A" to "E"; "E" is always the pass option.
    pub options: HashMap<String, String>,
    pub correct_answer_key: String,
    #[serde(default)]
    pub correct_feedback_script: String,
    #[serde(default)]
    pub incorrect_feedback_script: String,
    #[serde(default)]
    pub pass_feedback_script: String,
    #[serde(default)]
    pub focus_if_wrong: String,
    pub romance_level: u32,
}

fn malformed(message: String) -> AppError {
    GenerationError::MalformedOutput(message).into()
}

impl GeneratedQuestionDto {
    fn into_question(self, number: usize) -> Result<Question, AppError> {
        if self.question_text.trim().is_empty() {
            return Err(malformed(format!("question {} has no text", number)));
        }

        let mut options = BTreeMap::new();
        for (key, text) in self.options {
            let key: ChoiceKey = key
                .parse()
                .map_err(|_| malformed(format!("question {} has unknown option key '{}'", number, key)))?;
            options.insert(key, text);
        }
        if !options.contains_key(&ChoiceKey::PASS) {
            return Err(malformed(format!("question {} has no pass option", number)));
        }
        if options.keys().filter(|k| !k.is_pass()).count() < 2 {
            return Err(malformed(format!("question {} needs at least two real options", number)));
        }

        let correct_key: ChoiceKey = self.correct_answer_key.parse().map_err(|_| {
            malformed(format!(
                "question {} has invalid correct key '{}'",
                number, self.correct_answer_key
            ))
        })?;
        if correct_key.is_pass() {
            return Err(malformed(format!("question {} marks the pass option as correct", number)));
        }
        if !options.contains_key(&correct_key) {
            return Err(malformed(format!(
                "question {} correct key {} is not one of its options",
                number, correct_key
            )));
        }

        Ok(Question {
            intro: self.introduction,
            prompt_text: self.question_text,
            options,
            correct_key,
            feedback_templates: FeedbackTemplates {
                on_correct: self.correct_feedback_script,
                on_incorrect: self.incorrect_feedback_script,
                on_pass: self.pass_feedback_script,
            },
            review_topic: self.focus_if_wrong,
            intensity_level: self.romance_level,
        })
    }
}

/// Intensity must climb from 1 to `len` without ever going back down.
fn validate_intensity(questions: &[Question]) -> Result<(), AppError> {
    let n = questions.len() as u32;
    let mut previous = 0;
    for (i, question) in questions.iter().enumerate() {
        let level = question.intensity_level;
        if level < 1 || level > n {
            return Err(malformed(format!(
                "question {} intensity {} is outside 1..={}",
                i + 1,
                level,
                n
            )));
        }
        if level < previous {
            return Err(malformed(format!(
                "question {} intensity {} drops below {}",
                i + 1,
                level,
                previous
            )));
        }
        previous = level;
    }
    match (questions.first(), questions.last()) {
        (Some(first), Some(last)) if first.intensity_level == 1 && last.intensity_level == n => Ok(()),
        _ => Err(malformed(format!("intensity does not span 1..={}", n))),
    }
}

impl TryFrom<StudyPackageDto> for StudyPackage {
    type Error = AppError;

    fn try_from(dto: StudyPackageDto) -> Result<Self, Self::Error> {
        if dto.questions.len() != QUESTIONS_PER_PACKAGE {
            return Err(malformed(format!(
                "expected {} questions, got {}",
                QUESTIONS_PER_PACKAGE,
                dto.questions.len()
            )));
        }
        if dto.sweet_summary.trim().is_empty() {
            return Err(malformed("summary is empty".to_string()));
        }

        let questions = dto
            .questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| q.into_question(i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        validate_intensity(&questions)?;

        let guide = dto.study_guide;
        Ok(StudyPackage {
            summary: dto.sweet_summary,
            guidance: StudyGuidance {
                overview: guide.overall_advice,
                exam_strategy: guide.exam_strategy,
                key_topics: guide.key_topics,
                topic_notes: guide
                    .topic_notes
                    .into_iter()
                    .map(|note| TopicNote {
                        topic: note.topic,
                        nuance: note.nuance_note,
                        importance: note.why_important,
                    })
                    .collect(),
            },
            questions,
            seeds: MessageSeeds {
                daily: dto.daily_romantic_message_seed,
                night: dto.night_mode_message_seed,
            },
        })
    }
}
