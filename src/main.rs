use std::sync::Arc;

use dotenvy::dotenv;
use gptquizbot::{
    commands::Command,
    config::Config,
    gpt::ChatGpt,
    runner::QuizRunner,
    schema::schema,
    state::ChatState,
    talk::TalkRunner,
    topics::TopicStore,
};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    error_handlers::IgnoringErrorHandlerSafe,
    prelude::*,
    update_listeners::webhooks::{self, Options},
    utils::command::BotCommands,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .with_span_events(FmtSpan::ENTER)
        .with_line_number(true)
        .with_target(false)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            std::process::exit(1);
        }
    };

    let gateway = match ChatGpt::new(&config.openai) {
        Ok(gateway) => Arc::new(gateway),
        Err(err) => {
            error!(%err, "failed to build the completion client");
            std::process::exit(1);
        }
    };
    info!(model = gateway.model(), "completion client ready");

    let bot = Bot::new(&config.bot_token);
    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(%err, "failed to register bot commands");
    }

    let quiz = Arc::new(
        QuizRunner::new(bot.clone(), gateway.clone(), Arc::new(TopicStore::builtin()))
            .with_menu_image(config.assets.quiz_image.clone()),
    );
    let talk = Arc::new(
        TalkRunner::new(bot.clone(), gateway, config.assets.characters_dir.clone())
            .with_menu_image(config.assets.talk_image.clone()),
    );

    info!("Starting bot...");
    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![InMemStorage::<ChatState>::new(), quiz, talk])
        .enable_ctrlc_handler()
        .build();

    match config.webhook {
        Some(webhook) => {
            let listener = match webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await {
                Ok(listener) => listener,
                Err(err) => {
                    error!(%err, "failed to build a webhook listener");
                    std::process::exit(1);
                }
            };
            dispatcher
                .dispatch_with_listener(listener, Arc::new(IgnoringErrorHandlerSafe))
                .await
        }
        None => dispatcher.dispatch().await,
    }
}
