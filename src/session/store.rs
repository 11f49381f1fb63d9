use super::ChatSession;
use crate::core::error::AssistError;
use crate::providers::Message;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreState {
    #[serde(default)]
    chats: Vec<ChatSession>,
    #[serde(default)]
    active_chat: Option<String>,
}

/// The signed-in user's chat sessions, newest first, plus the active pointer.
///
/// Mutations only touch memory; call [`SessionStore::save`] to persist.
#[derive(Debug)]
pub struct SessionStore {
    state: StoreState,
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self {
            state: StoreState::default(),
            path: None,
        }
    }

    /// Loads the store persisted at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AssistError> {
        let path = path.as_ref().to_path_buf();

        let mut state = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str::<StoreState>(&contents).map_err(|e| {
                AssistError::Serialization(format!("Parse {}: {}", path.display(), e))
            })?
        } else {
            StoreState::default()
        };

        if let Some(active) = &state.active_chat {
            if !state.chats.iter().any(|c| &c.id == active) {
                warn!(active = %active, "active session missing from store, clearing pointer");
                state.active_chat = None;
            }
        }

        debug!(path = %path.display(), sessions = state.chats.len(), "opened session store");
        Ok(Self {
            state,
            path: Some(path),
        })
    }

    pub fn save(&self) -> Result<(), AssistError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.state)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn create_session(&mut self) -> String {
        let session = ChatSession::new();
        let id = session.id.clone();
        self.state.chats.insert(0, session);
        self.state.active_chat = Some(id.clone());
        info!(session = %id, "created chat session");
        id
    }

    /// Appends to the active session. Without one this does nothing.
    pub fn append_message(&mut self, message: Message) {
        match self.active_session_mut() {
            Some(session) => session.push(message),
            None => debug!("append without an active session ignored"),
        }
    }

    /// Seeds `text` as the sole assistant message of a fresh active session.
    /// Returns whether a message was inserted.
    pub fn seed_welcome_message(&mut self, text: &str) -> bool {
        self.active_session_mut()
            .map(|session| session.seed_welcome(text))
            .unwrap_or(false)
    }

    /// Empties a session's messages. The welcome flag survives, so the
    /// session is not greeted again.
    pub fn clear_session(&mut self, id: &str) -> bool {
        match self.state.chats.iter_mut().find(|c| c.id == id) {
            Some(session) => {
                session.messages.clear();
                session.updated_at = chrono::Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn set_active_session(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.state.active_chat = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn delete_session(&mut self, id: &str) -> bool {
        let before = self.state.chats.len();
        self.state.chats.retain(|c| c.id != id);
        if self.state.chats.len() == before {
            return false;
        }

        if self.state.active_chat.as_deref() == Some(id) {
            self.state.active_chat = self.state.chats.first().map(|c| c.id.clone());
        }
        info!(session = %id, "deleted chat session");
        true
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        let active = self.state.active_chat.as_deref()?;
        self.get(active)
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.state.active_chat.as_deref()
    }

    fn active_session_mut(&mut self) -> Option<&mut ChatSession> {
        let active = self.state.active_chat.as_deref()?;
        self.state.chats.iter_mut().find(|c| c.id == active)
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.state.chats
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.state.chats.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Session whose id starts with `prefix`, if exactly one matches.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&ChatSession> {
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self.state.chats.iter().filter(|c| c.id.starts_with(prefix));
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    pub fn len(&self) -> usize {
        self.state.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.chats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Role;
    use crate::session::PLACEHOLDER_TITLE;

    fn store_with_session() -> (SessionStore, String) {
        let mut store = SessionStore::in_memory();
        let id = store.create_session();
        (store, id)
    }

    #[test]
    fn create_session_is_active_and_first() {
        let mut store = SessionStore::in_memory();
        let first = store.create_session();
        let second = store.create_session();

        assert_eq!(store.sessions()[0].id, second);
        assert_eq!(store.sessions()[1].id, first);
        assert_eq!(store.active_session_id(), Some(second.as_str()));

        let active = store.active_session().unwrap();
        assert_eq!(active.title, PLACEHOLDER_TITLE);
        assert!(active.messages.is_empty());
        assert!(!active.has_welcome_message);
    }

    #[test]
    fn messages_replay_in_append_order() {
        let (mut store, _) = store_with_session();
        let sent = vec![
            Message::user("Panel keeps beeping"),
            Message::assistant("Check the battery"),
            Message::user("Battery is new"),
            Message::assistant("Check the AC fuse"),
            Message::user("Thanks"),
        ];
        for m in &sent {
            store.append_message(m.clone());
        }

        assert_eq!(store.active_session().unwrap().messages, sent);
    }

    #[test]
    fn append_refreshes_updated_at() {
        let (mut store, _) = store_with_session();
        let before = store.active_session().unwrap().updated_at;
        store.append_message(Message::user("hi"));
        assert!(store.active_session().unwrap().updated_at >= before);
    }

    #[test]
    fn append_without_active_session_is_ignored() {
        let mut store = SessionStore::in_memory();
        store.append_message(Message::user("lost"));
        assert!(store.is_empty());
        assert!(store.active_session().is_none());
    }

    #[test]
    fn short_first_user_message_becomes_title() {
        let (mut store, _) = store_with_session();
        store.append_message(Message::user("Hello"));
        assert_eq!(store.active_session().unwrap().title, "Hello");
    }

    #[test]
    fn long_first_user_message_is_truncated() {
        let (mut store, _) = store_with_session();
        let message = "Which detector suits a warehouse roof?xx".to_string();
        assert_eq!(message.chars().count(), 40);

        store.append_message(Message::user(message.clone()));
        let expected = format!("{}...", &message[..30]);
        assert_eq!(store.active_session().unwrap().title, expected);
    }

    #[test]
    fn title_is_set_only_once() {
        let (mut store, _) = store_with_session();
        store.append_message(Message::user("First question"));
        store.append_message(Message::user("Second question"));
        assert_eq!(store.active_session().unwrap().title, "First question");
    }

    #[test]
    fn assistant_messages_never_rename() {
        let (mut store, _) = store_with_session();
        store.append_message(Message::assistant("Greetings"));
        assert_eq!(store.active_session().unwrap().title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn welcome_message_is_seeded_once() {
        let (mut store, _) = store_with_session();
        assert!(store.seed_welcome_message("Hi! How can I help you today?"));
        assert!(!store.seed_welcome_message("Hi! How can I help you today?"));

        let session = store.active_session().unwrap();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, Role::Assistant);
        assert!(session.has_welcome_message);
    }

    #[test]
    fn cleared_session_is_not_greeted_again() {
        let (mut store, id) = store_with_session();
        store.seed_welcome_message("Hi");
        store.append_message(Message::user("q"));

        assert!(store.clear_session(&id));
        assert!(!store.seed_welcome_message("Hi"));
        assert!(store.active_session().unwrap().messages.is_empty());
    }

    #[test]
    fn welcome_is_not_seeded_over_existing_messages() {
        let (mut store, _) = store_with_session();
        store.append_message(Message::user("already talking"));
        assert!(!store.seed_welcome_message("Hi"));
        assert_eq!(store.active_session().unwrap().messages.len(), 1);
    }

    #[test]
    fn set_active_session_ignores_unknown_ids() {
        let (mut store, id) = store_with_session();
        assert!(!store.set_active_session("nope"));
        assert_eq!(store.active_session_id(), Some(id.as_str()));

        let other = store.create_session();
        assert!(store.set_active_session(&id));
        assert_eq!(store.active_session_id(), Some(id.as_str()));
        assert!(store.contains(&other));
    }

    #[test]
    fn deleting_active_session_selects_a_remaining_one() {
        let mut store = SessionStore::in_memory();
        let a = store.create_session();
        let b = store.create_session();
        let c = store.create_session();
        assert_eq!(store.active_session_id(), Some(c.as_str()));

        assert!(store.delete_session(&c));
        assert!(!store.contains(&c));
        assert_eq!(store.len(), 2);

        let active = store.active_session_id().unwrap();
        assert!(active == a || active == b);
        assert_eq!(active, b);
    }

    #[test]
    fn deleting_inactive_session_keeps_pointer() {
        let mut store = SessionStore::in_memory();
        let a = store.create_session();
        let b = store.create_session();

        assert!(store.delete_session(&a));
        assert_eq!(store.active_session_id(), Some(b.as_str()));
        assert!(!store.delete_session(&a));
    }

    #[test]
    fn deleting_last_session_clears_pointer() {
        let (mut store, id) = store_with_session();
        store.delete_session(&id);
        assert!(store.active_session().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn prefix_lookup_requires_a_unique_match() {
        let (store, id) = store_with_session();
        assert_eq!(store.find_by_prefix(&id[..8]).unwrap().id, id);
        assert!(store.find_by_prefix("").is_none());
        assert!(store.find_by_prefix("zzzz").is_none());
    }

    #[test]
    fn persisted_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions").join("alice.json");

        let mut store = SessionStore::open(&path).unwrap();
        assert!(store.is_empty());
        let first = store.create_session();
        store.seed_welcome_message("Hi!");
        store.append_message(Message::user("Where is the tamper switch?"));
        let second = store.create_session();
        store.append_message(Message::user("Second chat"));
        store.set_active_session(&first);
        store.save().unwrap();

        let reloaded = SessionStore::open(&path).unwrap();
        assert_eq!(reloaded.sessions(), store.sessions());
        assert_eq!(reloaded.active_session_id(), Some(first.as_str()));
        assert!(reloaded.contains(&second));
        assert!(reloaded.get(&first).unwrap().has_welcome_message);
    }

    #[test]
    fn persisted_blob_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bob.json");
        let mut store = SessionStore::open(&path).unwrap();
        store.create_session();
        store.save().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"activeChat\""));
        assert!(raw.contains("\"hasWelcomeMessage\""));
        assert!(raw.contains("\"createdAt\""));
    }

    #[test]
    fn dangling_active_pointer_is_cleared_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carol.json");
        fs::write(&path, r#"{"chats":[],"activeChat":"gone"}"#).unwrap();

        let store = SessionStore::open(&path).unwrap();
        assert!(store.active_session_id().is_none());
    }

    #[test]
    fn corrupt_store_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = SessionStore::open(&path).unwrap_err();
        assert!(matches!(err, AssistError::Serialization(_)));
    }
}
