use super::ChatState;
use crate::core::error::AssistError;
use crate::display;

pub trait CommandHandler {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, AssistError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct NewCommand;
pub struct ListCommand;
pub struct SwitchCommand;
pub struct DeleteCommand;
pub struct ClearCommand;
pub struct ShowCommand;
pub struct GreetCommand;

fn session_arg(state: &ChatState, args: &[&str], usage: &str) -> Result<String, AssistError> {
    let arg = args
        .first()
        .ok_or_else(|| AssistError::Input(format!("Usage: {}", usage)))?;
    state
        .resolve_session(arg)
        .ok_or_else(|| AssistError::Input(format!("No chat matches '{}'", arg)))
}

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, AssistError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the assistant"
    }
}

impl CommandHandler for NewCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, AssistError> {
        state.store.create_session();
        state.service.greet(&mut state.store);
        let session = state.store.active_session();
        Ok(session.map(display::format_transcript))
    }

    fn help(&self) -> &'static str {
        "/new - Start a new chat"
    }
}

impl CommandHandler for ListCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, AssistError> {
        if state.store.is_empty() {
            return Ok(Some("No chats yet.".to_string()));
        }
        Ok(Some(display::format_session_list(&state.store)))
    }

    fn help(&self) -> &'static str {
        "/list - List saved chats"
    }
}

impl CommandHandler for SwitchCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, AssistError> {
        let id = session_arg(state, args, "/switch <number|id>")?;
        state.store.set_active_session(&id);
        state.service.greet(&mut state.store);
        Ok(state.store.active_session().map(display::format_transcript))
    }

    fn help(&self) -> &'static str {
        "/switch <number|id> - Continue another chat"
    }
}

impl CommandHandler for DeleteCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, AssistError> {
        let id = session_arg(state, args, "/delete <number|id>")?;
        let title = state
            .store
            .get(&id)
            .map(|s| s.title.clone())
            .unwrap_or_default();
        state.store.delete_session(&id);

        let now_active = match state.store.active_session() {
            Some(session) => format!(" Active chat: {}", session.title),
            None => String::new(),
        };
        Ok(Some(format!("Deleted chat '{}'.{}", title, now_active)))
    }

    fn help(&self) -> &'static str {
        "/delete <number|id> - Delete a chat"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, AssistError> {
        let Some(id) = state.store.active_session_id().map(str::to_string) else {
            return Ok(Some("No active chat.".to_string()));
        };
        state.store.clear_session(&id);
        Ok(Some("Chat history cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear - Clear the messages of the active chat"
    }
}

impl CommandHandler for ShowCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, AssistError> {
        Ok(Some(
            state
                .store
                .active_session()
                .map(display::format_transcript)
                .unwrap_or_else(|| "No active chat.".to_string()),
        ))
    }

    fn help(&self) -> &'static str {
        "/show - Print the active chat"
    }
}

impl CommandHandler for GreetCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, AssistError> {
        if state.service.greet(&mut state.store) {
            Ok(state.store.active_session().map(display::format_transcript))
        } else {
            Ok(Some("This chat has already been greeted.".to_string()))
        }
    }

    fn help(&self) -> &'static str {
        "/greet - Show the welcome message in a fresh chat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatService;
    use crate::config::AssistantSettings;
    use crate::providers::Message;
    use crate::session::SessionStore;

    fn state() -> ChatState {
        let settings = AssistantSettings {
            global_greeting_message: "Hello installer".to_string(),
            ..AssistantSettings::default()
        };
        ChatState::new(SessionStore::in_memory(), ChatService::new(settings))
    }

    #[test]
    fn new_creates_a_greeted_active_chat() {
        let mut state = state();
        let out = NewCommand.execute(&mut state, &[]).unwrap().unwrap();

        assert_eq!(state.store.len(), 1);
        assert!(out.contains("Hello installer"));
        assert!(state.store.active_session().unwrap().has_welcome_message);
    }

    #[test]
    fn switch_and_delete_accept_list_positions() {
        let mut state = state();
        let older = state.store.create_session();
        let newer = state.store.create_session();

        SwitchCommand.execute(&mut state, &["2"]).unwrap();
        assert_eq!(state.store.active_session_id(), Some(older.as_str()));

        DeleteCommand.execute(&mut state, &["2"]).unwrap();
        assert!(!state.store.contains(&older));
        assert_eq!(state.store.active_session_id(), Some(newer.as_str()));
    }

    #[test]
    fn switch_accepts_id_prefix() {
        let mut state = state();
        let target = state.store.create_session();
        state.store.create_session();

        SwitchCommand.execute(&mut state, &[&target[..8]]).unwrap();
        assert_eq!(state.store.active_session_id(), Some(target.as_str()));
    }

    #[test]
    fn switch_without_match_is_an_error() {
        let mut state = state();
        assert!(SwitchCommand.execute(&mut state, &["99"]).is_err());
        assert!(SwitchCommand.execute(&mut state, &[]).is_err());
    }

    #[test]
    fn clear_keeps_the_chat_but_drops_messages() {
        let mut state = state();
        NewCommand.execute(&mut state, &[]).unwrap();
        state.store.append_message(Message::user("q"));

        ClearCommand.execute(&mut state, &[]).unwrap();
        assert_eq!(state.store.len(), 1);
        assert!(state.store.active_session().unwrap().messages.is_empty());

        let out = GreetCommand.execute(&mut state, &[]).unwrap().unwrap();
        assert!(out.contains("already"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut state = state();
        QuitCommand.execute(&mut state, &[]).unwrap();
        assert!(!state.should_continue);
    }
}
