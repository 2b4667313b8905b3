use crate::constants::persona_prompts::{SARCASTIC_PERSONA_PROMPT, WARM_PERSONA_PROMPT};
use crate::models::domain::{ToneProfile, UserProfile};

/// Natural-language directive that fixes the voice of every generation for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaBlock {
    tone: ToneProfile,
    directive: String,
}

impl PersonaBlock {
    pub fn tone(&self) -> ToneProfile {
        self.tone
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }
}

/// Chooses the persona branch from the tone profile and renders it for the learner's locale.
pub fn select_persona(profile: &UserProfile) -> PersonaBlock {
    let template = match profile.tone_profile {
        ToneProfile::Warm => WARM_PERSONA_PROMPT,
        ToneProfile::Sarcastic => SARCASTIC_PERSONA_PROMPT,
    };

    PersonaBlock {
        tone: profile.tone_profile,
        directive: template.replace("{locale}", &profile.locale),
    }
}
