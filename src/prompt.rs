use crate::config::{AssistantSettings, Personality};
use crate::providers::Message;

const PROFESSIONAL: &str = "You are professional and precise";
const FRIENDLY: &str = "You are warm, approachable, and conversational";
const FUNNY: &str = "You are funny and talk like you're down with the kids";

pub fn personality_text(settings: &AssistantSettings) -> &str {
    match settings.personality_type {
        Personality::Professional => PROFESSIONAL,
        Personality::Friendly => FRIENDLY,
        Personality::Funny => FUNNY,
        Personality::Custom => &settings.custom_personality,
    }
}

pub fn compose_system_prompt(settings: &AssistantSettings) -> String {
    format!(
        "{}\n\nPersonality: {}",
        settings.global_prompt_template,
        personality_text(settings)
    )
}

/// System message first, then the session's turns in order.
pub fn build_history(system_prompt: String, turns: &[Message]) -> Vec<Message> {
    let mut history = Vec::with_capacity(turns.len() + 1);
    history.push(Message::system(system_prompt));
    history.extend(turns.iter().cloned());
    history
}
