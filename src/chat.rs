use crate::config::AssistantSettings;
use crate::core::error::AssistError;
use crate::prompt::{build_history, compose_system_prompt};
use crate::providers::Message;
use crate::providers::factory::ProviderFactory;
use crate::session::SessionStore;
use tracing::{debug, warn};

/// Shown in place of a reply when the provider round trip fails.
pub const APOLOGY_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// Outcome of one submitted user message.
#[derive(Debug)]
pub struct Turn {
    /// Text appended to the session as the assistant's message.
    pub reply: String,
    /// Why the provider call failed, when `reply` is the apology.
    pub error: Option<AssistError>,
}

/// Drives one conversation turn: user message in, assistant message out.
pub struct ChatService {
    settings: AssistantSettings,
    factory: ProviderFactory,
}

impl ChatService {
    pub fn new(settings: AssistantSettings) -> Self {
        Self {
            settings,
            factory: ProviderFactory::new(),
        }
    }

    /// Makes sure a session is active and greeted. Returns its id.
    pub fn ensure_active_session(&self, store: &mut SessionStore) -> String {
        let id = match store.active_session_id() {
            Some(id) => id.to_string(),
            None => store.create_session(),
        };
        self.greet(store);
        id
    }

    /// Seeds the configured greeting into the active session, if it is new.
    pub fn greet(&self, store: &mut SessionStore) -> bool {
        let greeting = &self.settings.global_greeting_message;
        if greeting.trim().is_empty() {
            return false;
        }
        store.seed_welcome_message(greeting)
    }

    /// One round trip with the configured provider.
    pub async fn dispatch(&self, history: &[Message]) -> Result<String, AssistError> {
        let provider = self.factory.create(&self.settings)?;
        debug!(provider = provider.name(), messages = history.len(), "dispatching chat history");
        provider.get_response(history).await
    }

    /// Appends `text` as a user message, asks the provider, and appends the
    /// reply. Provider failures never escape: the apology is appended instead.
    pub async fn submit(&self, store: &mut SessionStore, text: &str) -> Result<Turn, AssistError> {
        if text.trim().is_empty() {
            return Err(AssistError::Input("Message is empty".to_string()));
        }
        if !self.settings.enabled {
            return Err(AssistError::Config("The AI assistant is disabled".to_string()));
        }

        self.ensure_active_session(store);
        store.append_message(Message::user(text));

        let history = match store.active_session() {
            Some(session) => build_history(compose_system_prompt(&self.settings), &session.messages),
            None => return Err(AssistError::Input("No active chat session".to_string())),
        };

        let turn = match self.dispatch(&history).await {
            Ok(reply) => Turn { reply, error: None },
            Err(e) => {
                warn!(error = %e, "assistant reply failed, using apology");
                Turn {
                    reply: APOLOGY_TEXT.to_string(),
                    error: Some(e),
                }
            }
        };

        store.append_message(Message::assistant(turn.reply.clone()));
        Ok(turn)
    }
}
