use crate::chat::Turn;
use crate::cli::Args;
use crate::commands::{ChatState, dispatcher::CommandDispatcher};
use crate::core::error::AssistError;
use crate::display;
use crate::input;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use tracing::warn;

pub struct Application {
    pub args: Args,
    pub state: ChatState,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(args: Args, state: ChatState, command_dispatcher: CommandDispatcher) -> Self {
        Self {
            args,
            state,
            command_dispatcher,
        }
    }

    pub async fn run(&mut self) -> Result<(), AssistError> {
        let context = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AssistError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer).filter(|b| !b.trim().is_empty())
        } else {
            None
        };

        if self.args.new {
            self.state.store.create_session();
            self.persist();
        }

        if self.args.chat {
            self.handle_continuous_chat_mode().await
        } else {
            self.handle_single_question(context).await
        }
    }

    fn persist(&self) {
        if let Err(e) = self.state.store.save() {
            warn!(error = %e, "failed to save chat sessions");
            display::display_error(&format!("Could not save chats: {}", e));
        }
    }

    fn show_turn(turn: &Turn) {
        match &turn.error {
            None => display::display_response(&turn.reply),
            Some(e) => display::display_fallback(&turn.reply, &failure_note(e)),
        }
    }

    async fn submit(&mut self, text: &str) -> Result<Turn, AssistError> {
        let ChatState { store, service, .. } = &mut self.state;
        let result = service.submit(store, text).await;
        self.persist();
        result
    }

    async fn handle_single_question(&mut self, context: Option<String>) -> Result<(), AssistError> {
        let final_query = match (self.args.query.as_deref(), context) {
            (Some(arg_q), Some(stdin_ctx)) => format!("{}\n\n{}", stdin_ctx.trim_end(), arg_q),
            (None, Some(stdin_ctx)) => stdin_ctx,
            (Some(arg_q), None) => arg_q.to_string(),
            (None, None) => {
                return Err(AssistError::Input(
                    "No question provided. Pass one as an argument or use --chat".to_string(),
                ));
            }
        };

        let turn = self.submit(&final_query).await?;
        Self::show_turn(&turn);
        Ok(())
    }

    async fn handle_continuous_chat_mode(&mut self) -> Result<(), AssistError> {
        {
            let ChatState { store, service, .. } = &mut self.state;
            service.ensure_active_session(store);
        }
        self.persist();

        println!(
            "Installer assistant. Type '/help' for available commands. Press Ctrl+D or type /quit to exit."
        );
        if let Some(session) = self.state.store.active_session() {
            println!("\n{}\n", display::format_transcript(session));
        }

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        while self.state.should_continue {
            let input = match input::read_input(&mut editor)? {
                Some(input) => input.trim().to_string(),
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if let Some(command_line) = input.strip_prefix('/') {
                let parts: Vec<&str> = command_line.split_whitespace().collect();
                if let Some((command, args)) = parts.split_first() {
                    match self.command_dispatcher.execute(command, args, &mut self.state) {
                        Ok(Some(output)) => println!("{}", output),
                        Ok(None) => {}
                        Err(e) => display::display_error(&e.to_string()),
                    }
                    self.persist();
                }
                continue;
            }

            match self.submit(&input).await {
                Ok(turn) => Self::show_turn(&turn),
                Err(e) => display::display_error(&e.to_string()),
            }
        }

        input::save_history(&mut editor)?;

        Ok(())
    }
}

/// Configuration problems point the user at the settings file; anything
/// else is shown as-is.
fn failure_note(err: &AssistError) -> String {
    if err.is_configuration() {
        format!("{} (check the assistant settings in ~/.iassist/config.yaml)", err)
    } else {
        err.to_string()
    }
}
