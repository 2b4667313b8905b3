use std::fmt;
use std::str::FromStr;

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::constants::messages;
use crate::models::domain::{ChoiceKey, FollowupKind, ToneProfile};

/// Everything an inline button can ask for, encoded in its callback data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    Tone(ToneProfile),
    Answer(ChoiceKey),
    Next,
    StartQuiz,
    Chat,
    Followup(FollowupKind),
    PlayAgain,
    StartOver,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Start => write!(f, "start"),
            Action::Tone(tone) => write!(f, "tone:{}", tone),
            Action::Answer(key) => write!(f, "answer:{}", key),
            Action::Next => write!(f, "next"),
            Action::StartQuiz => write!(f, "quiz"),
            Action::Chat => write!(f, "chat"),
            Action::Followup(kind) => write!(f, "followup:{}", kind),
            Action::PlayAgain => write!(f, "play_again"),
            Action::StartOver => write!(f, "start_over"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || format!("unknown button: {}", s);
        match s.split_once(':') {
            None => match s {
                "start" => Ok(Action::Start),
                "next" => Ok(Action::Next),
                "quiz" => Ok(Action::StartQuiz),
                "chat" => Ok(Action::Chat),
                "play_again" => Ok(Action::PlayAgain),
                "start_over" => Ok(Action::StartOver),
                _ => Err(unknown()),
            },
            Some(("tone", "warm")) => Ok(Action::Tone(ToneProfile::Warm)),
            Some(("tone", "sarcastic")) => Ok(Action::Tone(ToneProfile::Sarcastic)),
            Some(("answer", key)) => key.parse().map(Action::Answer).map_err(|_| unknown()),
            Some(("followup", "daily_message")) => Ok(Action::Followup(FollowupKind::DailyMessage)),
            Some(("followup", "night_message")) => Ok(Action::Followup(FollowupKind::NightMessage)),
            Some(("followup", "special_message")) => {
                Ok(Action::Followup(FollowupKind::SpecialMessage))
            }
            _ => Err(unknown()),
        }
    }
}

fn button(label: &str, action: Action) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.to_string())
}

pub fn start() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("🚀 Start", Action::Start)]])
}

pub fn tone() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button(messages::TONE_WARM_LABEL, Action::Tone(ToneProfile::Warm)),
        button(messages::TONE_SARCASTIC_LABEL, Action::Tone(ToneProfile::Sarcastic)),
    ]])
}

pub fn answers() -> InlineKeyboardMarkup {
    let letters = [ChoiceKey::A, ChoiceKey::B, ChoiceKey::C, ChoiceKey::D]
        .into_iter()
        .map(|key| button(key.as_str(), Action::Answer(key)))
        .collect();
    InlineKeyboardMarkup::new(vec![letters, vec![button("⏭ Pass", Action::Answer(ChoiceKey::E))]])
}

pub fn next() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("➡️ Next", Action::Next)]])
}

pub fn quiz_or_chat() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("💬 Chat from PDF", Action::Chat),
        button("📝 Start quiz", Action::StartQuiz),
    ]])
}

pub fn resume() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("📝 Back to quiz", Action::StartQuiz)]])
}

pub fn results_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button("☀️ Daily message", Action::Followup(FollowupKind::DailyMessage)),
            button("🌙 Night message", Action::Followup(FollowupKind::NightMessage)),
        ],
        vec![button("✨ Special message", Action::Followup(FollowupKind::SpecialMessage))],
        vec![
            button("🔁 Play again", Action::PlayAgain),
            button("🏠 Start over", Action::StartOver),
        ],
    ])
}
