pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::chat::ChatService;
use crate::session::SessionStore;
pub use dispatcher::create_command_registry;

pub struct ChatState {
    pub store: SessionStore,
    pub service: ChatService,
    pub should_continue: bool,
}

impl ChatState {
    pub fn new(store: SessionStore, service: ChatService) -> Self {
        Self {
            store,
            service,
            should_continue: true,
        }
    }

    /// Resolves a 1-based position from `/list` or a unique id prefix.
    pub fn resolve_session(&self, arg: &str) -> Option<String> {
        if let Ok(index) = arg.parse::<usize>() {
            if index >= 1 {
                if let Some(session) = self.store.sessions().get(index - 1) {
                    return Some(session.id.clone());
                }
            }
        }
        self.store.find_by_prefix(arg).map(|s| s.id.clone())
    }
}
