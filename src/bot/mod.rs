//! Telegram front end. Each chat drives its own session, `tg:{chat_id}`.

pub mod handlers;
pub mod keyboards;
pub mod onboarding;
pub mod render;

use std::sync::Arc;

use teloxide::{error_handlers::LoggingErrorHandler, prelude::*};

use crate::services::SessionService;
use onboarding::FormStore;

/// Shared state injected into every bot handler.
#[derive(Clone)]
pub struct BotContext {
    pub sessions: Arc<SessionService>,
    pub forms: FormStore,
    pub message_limit: usize,
}

impl BotContext {
    pub fn new(sessions: Arc<SessionService>, message_limit: usize) -> Self {
        Self {
            sessions,
            forms: FormStore::new(),
            message_limit,
        }
    }
}

/// Polls Telegram until Ctrl-C.
pub async fn run(bot: Bot, ctx: BotContext) {
    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<handlers::Command>()
                        .endpoint(handlers::on_command),
                )
                .branch(dptree::endpoint(handlers::on_message)),
        )
        .branch(Update::filter_callback_query().endpoint(handlers::on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|update| async move {
            log::debug!("Ignoring update {:?}", update.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error occurred in the bot dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
