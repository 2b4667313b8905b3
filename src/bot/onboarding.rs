use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::ChatId;
use tokio::sync::Mutex;

use crate::models::domain::{SessionEvent, ToneProfile};

/// Which onboarding answer the bot is waiting for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormStage {
    #[default]
    Name,
    Tone,
    Locale,
    Mood,
}

/// Onboarding answers collected one message at a time and submitted as a single profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OnboardingForm {
    pub stage: FormStage,
    name: String,
    tone: ToneProfile,
    locale: String,
}

/// What the bot should do after feeding the form one answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormStep {
    AskTone,
    AskLocale(ToneProfile),
    AskMood,
    Complete(SessionEvent),
    /// The answer does not fit the current stage.
    Rejected,
}

impl OnboardingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept_text(&mut self, text: &str) -> FormStep {
        match self.stage {
            FormStage::Name => {
                self.name = text.trim().to_string();
                self.stage = FormStage::Tone;
                FormStep::AskTone
            }
            FormStage::Tone => FormStep::Rejected,
            FormStage::Locale => {
                self.locale = text.trim().to_string();
                self.stage = FormStage::Mood;
                FormStep::AskMood
            }
            FormStage::Mood => FormStep::Complete(SessionEvent::SubmitProfile {
                name: self.name.clone(),
                tone_profile: self.tone,
                locale: self.locale.clone(),
                mood_before: text.trim().to_string(),
            }),
        }
    }

    pub fn accept_tone(&mut self, tone: ToneProfile) -> FormStep {
        if self.stage != FormStage::Tone {
            return FormStep::Rejected;
        }
        self.tone = tone;
        self.stage = FormStage::Locale;
        FormStep::AskLocale(tone)
    }
}

/// In-progress onboarding forms keyed by chat.
#[derive(Clone, Default)]
pub struct FormStore {
    forms: Arc<Mutex<HashMap<ChatId, OnboardingForm>>>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self, chat: ChatId) {
        self.forms.lock().await.insert(chat, OnboardingForm::new());
    }

    pub async fn discard(&self, chat: ChatId) {
        self.forms.lock().await.remove(&chat);
    }

    pub async fn is_open(&self, chat: ChatId) -> bool {
        self.forms.lock().await.contains_key(&chat)
    }

    /// Applies `f` to the open form for `chat`. A completed form is removed.
    pub async fn update<F>(&self, chat: ChatId, f: F) -> Option<FormStep>
    where
        F: FnOnce(&mut OnboardingForm) -> FormStep,
    {
        let mut forms = self.forms.lock().await;
        let form = forms.get_mut(&chat)?;
        let step = f(form);
        if matches!(step, FormStep::Complete(_)) {
            forms.remove(&chat);
        }
        Some(step)
    }
}
