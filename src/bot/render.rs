use teloxide::types::InlineKeyboardMarkup;

use crate::bot::keyboards;
use crate::constants::messages;
use crate::models::domain::{FollowupKind, SessionStep, StudyGuidance};
use crate::models::dto::{SessionOutput, SessionReply};

/// One Telegram message, with an optional keyboard under it.
#[derive(Clone, Debug, PartialEq)]
pub struct OutgoingMessage {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Splits `text` into chunks of at most `max_chars` characters, preferring line boundaries.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();
        if current_len + line_len + 1 > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if line_len > max_chars {
                let chars: Vec<char> = line.chars().collect();
                for piece in chars.chunks(max_chars) {
                    chunks.push(piece.iter().collect());
                }
                continue;
            }
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn guidance_text(summary: &str, guidance: &StudyGuidance) -> String {
    let mut text = format!("{}\n\n📘 {}", summary, guidance.overview);
    if !guidance.key_topics.is_empty() {
        text.push_str("\n\n🔑 Key topics:");
        for topic in &guidance.key_topics {
            text.push_str(&format!("\n• {}", topic));
        }
    }
    for note in &guidance.topic_notes {
        text.push_str(&format!(
            "\n\n📌 {}\n{}\n{}",
            note.topic, note.nuance, note.importance
        ));
    }
    if !guidance.exam_strategy.is_empty() {
        text.push_str(&format!("\n\n🎯 {}", guidance.exam_strategy));
    }
    text
}

fn render_output(output: &SessionOutput) -> Vec<OutgoingMessage> {
    match output {
        SessionOutput::StudyPackageReady { summary, guidance } => vec![
            OutgoingMessage::text(guidance_text(summary, guidance)),
            OutgoingMessage::with_keyboard(messages::QUIZ_OR_CHAT, keyboards::quiz_or_chat()),
        ],
        SessionOutput::QuestionPrompt {
            number,
            total,
            intro,
            text,
            options,
        } => {
            let mut body = format!("Question {}/{}\n\n", number, total);
            if !intro.is_empty() {
                body.push_str(&format!("{}\n\n", intro));
            }
            body.push_str(text);
            for option in options {
                body.push_str(&format!("\n\n{}) {}", option.key, option.text));
            }
            vec![OutgoingMessage::with_keyboard(body, keyboards::answers())]
        }
        SessionOutput::AnswerFeedback { text, .. } => {
            vec![OutgoingMessage::with_keyboard(text.clone(), keyboards::next())]
        }
        SessionOutput::ResultsSummary { headline, .. } => vec![
            OutgoingMessage::text(headline.clone()),
            OutgoingMessage::text(messages::ASK_MOOD_AFTER),
        ],
        SessionOutput::FollowupMessage { kind, text } => {
            let text = match kind {
                FollowupKind::PostQuizAdvice => format!("{}\n\n{}", messages::ADVICE_HEADING, text),
                FollowupKind::NightMessage => format!("{}\n\n{}", text, messages::NIGHT_SIGN_OFF),
                FollowupKind::DailyMessage | FollowupKind::SpecialMessage => text.clone(),
            };
            vec![OutgoingMessage::with_keyboard(text, keyboards::results_menu())]
        }
        SessionOutput::FreeformAnswer { text } => vec![
            OutgoingMessage::text(text.clone()),
            OutgoingMessage::with_keyboard(messages::RESUME_HINT, keyboards::resume()),
        ],
        SessionOutput::ErrorNotice { message, .. } => vec![OutgoingMessage::text(message.clone())],
    }
}

/// Turns a session reply into Telegram messages.
///
/// Messages that only carry an error get the keyboard that fits the step the session landed in.
/// A freshly studied document stops at the quiz-or-chat choice; the first question waits for
/// "Start Quiz".
pub fn render_reply(reply: &SessionReply) -> Vec<OutgoingMessage> {
    let fresh_package = reply
        .outputs
        .iter()
        .any(|output| matches!(output, SessionOutput::StudyPackageReady { .. }));
    let mut rendered: Vec<OutgoingMessage> = reply
        .outputs
        .iter()
        .filter(|output| !(fresh_package && matches!(output, SessionOutput::QuestionPrompt { .. })))
        .flat_map(render_output)
        .collect();

    if reply.has_error() {
        match reply.step {
            SessionStep::AwaitingDocument => rendered.push(OutgoingMessage::text(messages::ASK_DOCUMENT)),
            SessionStep::ResultsMenu => rendered.push(OutgoingMessage::with_keyboard(
                messages::CHOOSE_OPTION,
                keyboards::results_menu(),
            )),
            SessionStep::Presenting(_) | SessionStep::ShowingFeedback(_) if reply.freeform => {
                rendered.push(OutgoingMessage::with_keyboard(
                    messages::RESUME_HINT,
                    keyboards::resume(),
                ))
            }
            _ => {}
        }
    }

    rendered
}

/// Applies the chunking limit; the keyboard stays on the last chunk.
pub fn into_chunks(messages: Vec<OutgoingMessage>, max_chars: usize) -> Vec<OutgoingMessage> {
    let mut out = Vec::new();
    for message in messages {
        let mut chunks = split_message(&message.text, max_chars);
        let last = chunks.pop().unwrap_or_default();
        out.extend(chunks.into_iter().map(OutgoingMessage::text));
        out.push(OutgoingMessage {
            text: last,
            keyboard: message.keyboard,
        });
    }
    out
}
