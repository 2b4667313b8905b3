use secrecy::ExposeSecret;
use teloxide::Bot;

use study_buddy_server::{
    app_state::AppState,
    bot::{self, BotContext},
    config::Config,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let token = match config.require_telegram_token() {
        Ok(token) => token.expose_secret().to_string(),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let message_limit = config.telegram_message_limit;

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Starting study bot...");
    bot::run(
        Bot::new(token),
        BotContext::new(state.session_service.clone(), message_limit),
    )
    .await;
}
