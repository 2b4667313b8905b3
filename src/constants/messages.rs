use crate::models::domain::{ScoreReport, ToneProfile};

pub const GREETING: &str = "📚 Study Buddy\n\nTap Start to begin 💕";
pub const ASK_NAME: &str = "What should I call you?";
pub const ASK_TONE: &str = "How should I treat you?";
pub const TONE_WARM_LABEL: &str = "😍 Spoil me";
pub const TONE_SARCASTIC_LABEL: &str = "😒 Roast me";
pub const ASK_MOOD_BEFORE: &str = "How do you feel right now? 💭";
pub const ASK_DOCUMENT: &str = "📄 Now send your study PDF… ❤️";
pub const ASK_MOOD_AFTER: &str = "How do you feel now? (Type your answer)";
pub const USE_BUTTONS: &str = "Use the buttons please 💕";
pub const DOCUMENT_RECEIVED: &str = "Got it. Reading your PDF and preparing your quiz… ⏳";
pub const ONLY_PDF: &str = "Please send a PDF document.";
pub const CHOOSE_OPTION: &str = "Choose an option:";
pub const QUIZ_OR_CHAT: &str = "Ready when you are. Start the quiz or ask me anything about your PDF.";
pub const RESUME_HINT: &str = "You can go back to your quiz anytime ❤️";
pub const ADVICE_HEADING: &str = "📚 What You Should Study More:";
pub const NIGHT_SIGN_OFF: &str = "Good night 🌙";
pub const RESTARTED: &str = "Restarted.";
pub const ASK_FREEFORM: &str = "Ask me anything about your PDF 💬";
pub const PREPARING_NEW_QUIZ: &str = "Preparing a fresh quiz from the same PDF… ⏳";

pub fn ask_locale(tone: ToneProfile) -> &'static str {
    match tone {
        ToneProfile::Warm => "💕 Aww… where were you born? 🌍",
        ToneProfile::Sarcastic => "😒 Okay… where were you born? 🌍",
    }
}

pub fn rest_reminder(tone: ToneProfile) -> &'static str {
    match tone {
        ToneProfile::Warm => "💖 Remember, my love, rest is just as important as study! Take care of yourself. 👑",
        ToneProfile::Sarcastic => "Don't pretend to study all night 😒",
    }
}

/// Tone-specific opening line for the results screen.
pub fn results_headline(tone: ToneProfile, name: &str, report: &ScoreReport) -> String {
    match tone {
        ToneProfile::Warm => format!(
            "🎉 Quiz Completed!\n\nMy love {}… you scored {}/{} ({:.1}%). I'm so proud of you 🥺💗",
            name, report.score, report.total, report.percent
        ),
        ToneProfile::Sarcastic => format!(
            "🎉 Quiz Completed!\n\n{}… {}/{} ({:.1}%). Honestly… I expected you to do worse 😒",
            name, report.score, report.total, report.percent
        ),
    }
}
