use serde::{Deserialize, Serialize};

use crate::models::domain::question::Question;
use crate::models::domain::study_material::{StudyGuidance, StudyMaterial};

/// Every generated quiz carries exactly this many questions.
pub const QUESTIONS_PER_PACKAGE: usize = 17;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageSeeds {
    pub daily: String,
    pub night: String,
}

/// Validated result of one study-package generation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudyPackage {
    pub summary: String,
    pub guidance: StudyGuidance,
    pub questions: Vec<Question>,
    pub seeds: MessageSeeds,
}

impl StudyPackage {
    /// Splits the package into the material it describes and the quiz it carries.
    pub fn into_parts(self, raw_text: String) -> (StudyMaterial, Vec<Question>, MessageSeeds) {
        (
            StudyMaterial::new(raw_text, self.summary, self.guidance),
            self.questions,
            self.seeds,
        )
    }
}
