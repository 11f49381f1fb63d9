use clap::Parser;

mod app;
mod chat;
mod cli;
mod commands;
mod config;
mod core;
mod display;
mod input;
mod prompt;
mod providers;
mod session;
mod utils;

use crate::app::Application;
use crate::chat::ChatService;
use crate::cli::Args;
use crate::commands::{ChatState, create_command_registry};
use crate::config::Config;
use crate::core::error::AssistError;
use crate::core::telemetry;
use crate::session::SessionStore;

#[tokio::main]
async fn main() -> Result<(), AssistError> {
    let args = Args::parse();
    telemetry::init_tracing(args.verbose);

    let config = Config::load()?;
    let mut settings = config.assistant.clone();
    if let Some(provider) = &args.provider {
        settings.provider = provider.clone();
    }
    if let Some(model) = &args.model {
        settings.model_name = Some(model.clone());
    }

    let user = config.user_name(args.user.as_deref());
    let store = SessionStore::open(Config::session_store_path(&user))?;
    tracing::debug!(%user, sessions = store.len(), "starting assistant");

    let state = ChatState::new(store, ChatService::new(settings));
    let command_dispatcher = create_command_registry();

    let mut app = Application::new(args, state, command_dispatcher);
    app.run().await
}
