use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DISPLAY_NAME: &str = "Sweetheart";
pub const DEFAULT_LOCALE: &str = "Unknown";

/// Which of the two personas talks to the learner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneProfile {
    /// Romantic, doting boyfriend.
    #[default]
    Warm,
    /// Sarcastic, annoyed ex.
    Sarcastic,
}

impl fmt::Display for ToneProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToneProfile::Warm => write!(f, "warm"),
            ToneProfile::Sarcastic => write!(f, "sarcastic"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserProfile {
    pub display_name: String,
    pub tone_profile: ToneProfile,
    pub locale: String,
    pub mood_before: String,
    pub mood_after: String,
}

impl UserProfile {
    /// Builds a profile from raw onboarding answers. Blank name and locale fall back to defaults.
    pub fn new(display_name: &str, tone_profile: ToneProfile, locale: &str, mood_before: &str) -> Self {
        let display_name = display_name.trim();
        let locale = locale.trim();

        UserProfile {
            display_name: if display_name.is_empty() {
                DEFAULT_DISPLAY_NAME.to_string()
            } else {
                display_name.to_string()
            },
            tone_profile,
            locale: if locale.is_empty() {
                DEFAULT_LOCALE.to_string()
            } else {
                locale.to_string()
            },
            mood_before: mood_before.trim().to_string(),
            mood_after: String::new(),
        }
    }

    pub fn is_warm(&self) -> bool {
        self.tone_profile == ToneProfile::Warm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_keeps_provided_values() {
        let profile = UserProfile::new(" Ana ", ToneProfile::Warm, "Spain", "nervous");

        assert_eq!(profile.display_name, "Ana");
        assert_eq!(profile.locale, "Spain");
        assert_eq!(profile.mood_before, "nervous");
        assert!(profile.mood_after.is_empty());
        assert!(profile.is_warm());
    }

    #[test]
    fn test_blank_name_and_locale_are_defaulted() {
        let profile = UserProfile::new("   ", ToneProfile::Sarcastic, "", "");

        assert_eq!(profile.display_name, DEFAULT_DISPLAY_NAME);
        assert_eq!(profile.locale, DEFAULT_LOCALE);
        assert!(!profile.is_warm());
    }

    #[test]
    fn test_tone_profile_serializes_snake_case() {
        let json = serde_json::to_string(&ToneProfile::Sarcastic).expect("tone should serialize");
        assert_eq!(json, "\"sarcastic\"");

        let parsed: ToneProfile = serde_json::from_str("\"warm\"").expect("tone should parse");
        assert_eq!(parsed, ToneProfile::Warm);
    }

    #[test]
    fn test_tone_profile_rejects_unknown_variant() {
        let parsed = serde_json::from_str::<ToneProfile>("\"neutral\"");

        assert!(parsed.is_err());
    }
}
