use teloxide::{
    net::Download,
    prelude::*,
    types::{ChatAction, Document},
    utils::command::BotCommands,
};

use crate::bot::keyboards::{self, Action};
use crate::bot::onboarding::FormStep;
use crate::bot::render::{into_chunks, render_reply, OutgoingMessage};
use crate::bot::BotContext;
use crate::constants::messages;
use crate::errors::AppResult;
use crate::models::domain::{SessionEvent, SessionId, SessionStep};
use crate::models::dto::SessionReply;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "start from the beginning.")]
    Start,
}

async fn send_all(bot: &Bot, chat: ChatId, outgoing: Vec<OutgoingMessage>, limit: usize) -> HandlerResult {
    for message in into_chunks(outgoing, limit) {
        if message.text.trim().is_empty() {
            continue;
        }
        let request = bot.send_message(chat, message.text);
        match message.keyboard {
            Some(keyboard) => request.reply_markup(keyboard).await?,
            None => request.await?,
        };
    }
    Ok(())
}

async fn say(bot: &Bot, chat: ChatId, text: &str) -> HandlerResult {
    bot.send_message(chat, text).await?;
    Ok(())
}

/// Runs one event and sends whatever it produced. A rejected event is reported, not propagated.
async fn apply(bot: &Bot, ctx: &BotContext, chat: ChatId, event: SessionEvent) -> HandlerResult {
    match dispatch(ctx, chat, event).await {
        Ok(reply) => send_all(bot, chat, render_reply(&reply), ctx.message_limit).await,
        Err(e) => {
            log::warn!("Chat {} event rejected: {}", chat.0, e);
            say(bot, chat, &e.to_string()).await
        }
    }
}

async fn dispatch(ctx: &BotContext, chat: ChatId, event: SessionEvent) -> AppResult<SessionReply> {
    let id = SessionId::telegram(chat.0);
    ctx.sessions.open_session(&id).await?;
    ctx.sessions.handle_event(&id, event).await
}

async fn begin_onboarding(bot: &Bot, ctx: &BotContext, chat: ChatId) -> HandlerResult {
    if let Err(e) = dispatch(ctx, chat, SessionEvent::StartOver).await {
        log::error!("Chat {} could not be reset: {}", chat.0, e);
    }
    ctx.forms.begin(chat).await;
    say(bot, chat, messages::ASK_NAME).await
}

pub async fn on_command(bot: Bot, msg: Message, cmd: Command, ctx: BotContext) -> HandlerResult {
    match cmd {
        Command::Start => {
            let chat = msg.chat.id;
            ctx.forms.discard(chat).await;
            if let Err(e) = dispatch(&ctx, chat, SessionEvent::StartOver).await {
                log::error!("Chat {} could not be reset: {}", chat.0, e);
            }
            log::info!("Chat {} {}", chat.0, messages::RESTARTED);
            bot.send_message(chat, messages::GREETING)
                .reply_markup(keyboards::start())
                .await?;
        }
    }
    Ok(())
}

pub async fn on_message(bot: Bot, msg: Message, ctx: BotContext) -> HandlerResult {
    let chat = msg.chat.id;

    if let Some(document) = msg.document() {
        return on_document(&bot, &ctx, chat, document).await;
    }

    let Some(text) = msg.text() else {
        return say(&bot, chat, messages::USE_BUTTONS).await;
    };

    if ctx.forms.is_open(chat).await {
        return on_form_text(&bot, &ctx, chat, text).await;
    }

    let id = SessionId::telegram(chat.0);
    ctx.sessions.open_session(&id).await?;
    let snapshot = ctx.sessions.snapshot(&id).await?;

    match snapshot.step {
        SessionStep::Onboarding => {
            bot.send_message(chat, messages::GREETING)
                .reply_markup(keyboards::start())
                .await?;
            Ok(())
        }
        SessionStep::AwaitingDocument => say(&bot, chat, messages::ASK_DOCUMENT).await,
        SessionStep::Results => {
            bot.send_chat_action(chat, ChatAction::Typing).await.ok();
            apply(&bot, &ctx, chat, SessionEvent::SubmitMoodAfter { text: text.to_string() }).await
        }
        SessionStep::Presenting(_) | SessionStep::ShowingFeedback(_) => {
            if !snapshot.freeform {
                if let Err(e) = dispatch(&ctx, chat, SessionEvent::EnterFreeformMode).await {
                    log::warn!("Chat {} could not enter free-form mode: {}", chat.0, e);
                    return say(&bot, chat, messages::USE_BUTTONS).await;
                }
            }
            bot.send_chat_action(chat, ChatAction::Typing).await.ok();
            apply(&bot, &ctx, chat, SessionEvent::FreeformQuery { text: text.to_string() }).await
        }
        _ => say(&bot, chat, messages::USE_BUTTONS).await,
    }
}

async fn on_form_text(bot: &Bot, ctx: &BotContext, chat: ChatId, text: &str) -> HandlerResult {
    match ctx.forms.update(chat, |form| form.accept_text(text)).await {
        Some(FormStep::AskTone) => {
            bot.send_message(chat, messages::ASK_TONE)
                .reply_markup(keyboards::tone())
                .await?;
            Ok(())
        }
        Some(FormStep::AskMood) => say(bot, chat, messages::ASK_MOOD_BEFORE).await,
        Some(FormStep::Complete(event)) => match dispatch(ctx, chat, event).await {
            Ok(_) => say(bot, chat, messages::ASK_DOCUMENT).await,
            Err(e) => {
                log::warn!("Chat {} profile rejected: {}", chat.0, e);
                say(bot, chat, &e.to_string()).await
            }
        },
        Some(FormStep::AskLocale(_)) | Some(FormStep::Rejected) | None => {
            say(bot, chat, messages::USE_BUTTONS).await
        }
    }
}

fn is_pdf(document: &Document) -> bool {
    document
        .mime_type
        .as_ref()
        .map_or(false, |mime| mime.essence_str().ends_with("pdf"))
}

async fn on_document(bot: &Bot, ctx: &BotContext, chat: ChatId, document: &Document) -> HandlerResult {
    if !is_pdf(document) {
        return say(bot, chat, messages::ONLY_PDF).await;
    }

    say(bot, chat, messages::DOCUMENT_RECEIVED).await?;
    bot.send_chat_action(chat, ChatAction::Typing).await.ok();

    let file = bot.get_file(&document.file.id).await?;
    let mut bytes = Vec::new();
    bot.download_file(&file.path, &mut bytes).await?;
    log::info!("Chat {} uploaded {} bytes", chat.0, bytes.len());

    apply(bot, ctx, chat, SessionEvent::SubmitDocument { bytes }).await
}

pub async fn on_callback(bot: Bot, q: CallbackQuery, ctx: BotContext) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(chat) = q.message.as_ref().map(|m| m.chat.id) else {
        return Ok(());
    };
    let action = match q.data.as_deref().map(str::parse::<Action>) {
        Some(Ok(action)) => action,
        Some(Err(e)) => {
            log::warn!("Chat {} sent {}", chat.0, e);
            return say(&bot, chat, messages::USE_BUTTONS).await;
        }
        None => return Ok(()),
    };

    match action {
        Action::Start | Action::StartOver => begin_onboarding(&bot, &ctx, chat).await,
        Action::Tone(tone) => match ctx.forms.update(chat, |form| form.accept_tone(tone)).await {
            Some(FormStep::AskLocale(tone)) => say(&bot, chat, messages::ask_locale(tone)).await,
            _ => say(&bot, chat, messages::USE_BUTTONS).await,
        },
        Action::Answer(key) => {
            bot.send_chat_action(chat, ChatAction::Typing).await.ok();
            apply(&bot, &ctx, chat, SessionEvent::SubmitAnswer { key }).await
        }
        Action::Next => apply(&bot, &ctx, chat, SessionEvent::Advance).await,
        Action::StartQuiz => apply(&bot, &ctx, chat, SessionEvent::ResumeQuiz).await,
        Action::Chat => match dispatch(&ctx, chat, SessionEvent::EnterFreeformMode).await {
            Ok(_) => say(&bot, chat, messages::ASK_FREEFORM).await,
            Err(e) => say(&bot, chat, &e.to_string()).await,
        },
        Action::Followup(kind) => {
            bot.send_chat_action(chat, ChatAction::Typing).await.ok();
            apply(&bot, &ctx, chat, SessionEvent::RequestFollowup { kind }).await
        }
        Action::PlayAgain => {
            say(&bot, chat, messages::PREPARING_NEW_QUIZ).await?;
            apply(&bot, &ctx, chat, SessionEvent::PlayAgain).await
        }
    }
}
