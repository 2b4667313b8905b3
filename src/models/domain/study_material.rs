use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopicNote {
    pub topic: String,
    pub nuance: String,
    pub importance: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudyGuidance {
    pub overview: String,
    pub exam_strategy: String,
    pub key_topics: Vec<String>,
    pub topic_notes: Vec<TopicNote>,
}

/// The uploaded document's text together with the generated study guide.
/// Replaced wholesale when a new document is uploaded.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudyMaterial {
    #[serde(skip_serializing, default)]
    pub raw_text: String,
    pub summary: String,
    pub guidance: StudyGuidance,
}

impl StudyMaterial {
    pub fn new(raw_text: String, summary: String, guidance: StudyGuidance) -> Self {
        Self {
            raw_text,
            summary,
            guidance,
        }
    }
}
