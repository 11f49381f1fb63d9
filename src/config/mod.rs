use crate::core::error::AssistError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are a helpful security system installation \
assistant. Use the provided manuals and standards to answer questions accurately.";
pub const DEFAULT_GREETING: &str = "Hi! How can I help you today?";
const DEFAULT_USER: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAI,
    Ollama,
    Flowise,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAI),
            "ollama" => Some(Provider::Ollama),
            "flowise" => Some(Provider::Flowise),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OpenAI",
            Provider::Ollama => "Ollama",
            Provider::Flowise => "Flowise",
        }
    }
}

/// Unknown names fall back to `Professional`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Personality {
    #[default]
    Professional,
    Friendly,
    Funny,
    Custom,
}

impl From<String> for Personality {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "friendly" => Personality::Friendly,
            "funny" => Personality::Funny,
            "custom" => Personality::Custom,
            _ => Personality::Professional,
        }
    }
}

impl From<Personality> for String {
    fn from(p: Personality) -> Self {
        match p {
            Personality::Professional => "professional",
            Personality::Friendly => "friendly",
            Personality::Funny => "funny",
            Personality::Custom => "custom",
        }
        .to_string()
    }
}

/// Assistant settings as an administrator would configure them.
///
/// `provider` stays a raw string: an unknown value is only an error once a
/// message is dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub enabled: bool,
    pub provider: String,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub openai_base_url: Option<String>,
    pub api_url: Option<String>,
    pub flowise_api_host: Option<String>,
    pub flowise_chatflow_id: Option<String>,
    pub global_prompt_template: String,
    pub global_greeting_message: String,
    pub personality_type: Personality,
    pub custom_personality: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "openai".to_string(),
            api_key: None,
            model_name: None,
            openai_base_url: None,
            api_url: None,
            flowise_api_host: None,
            flowise_chatflow_id: None,
            global_prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            global_greeting_message: DEFAULT_GREETING.to_string(),
            personality_type: Personality::Professional,
            custom_personality: String::new(),
        }
    }
}

impl AssistantSettings {
    pub fn resolve_provider(&self) -> Result<Provider, AssistError> {
        Provider::from_str(&self.provider)
            .ok_or_else(|| AssistError::InvalidProvider(self.provider.clone()))
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_user: Option<String>,
    #[serde(default)]
    pub assistant: AssistantSettings,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn app_dir() -> PathBuf {
        Self::config_dir().join(".iassist")
    }

    fn config_path() -> PathBuf {
        Self::app_dir().join("config.yaml")
    }

    pub fn load() -> Result<Config, AssistError> {
        let path = Self::config_path();

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| AssistError::Config(format!("Parse {}: {}", path.display(), e)))?;
            debug!(path = %path.display(), "loaded configuration");
            return Ok(config);
        }

        let config = Config::default();
        let _ = config.save();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), AssistError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(&path, yaml_content)?;
        Ok(())
    }

    /// Name the session store is scoped to.
    pub fn user_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.default_user.clone())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string())
    }

    pub fn session_store_path(user: &str) -> PathBuf {
        let file_name: String = user
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        Self::app_dir()
            .join("sessions")
            .join(format!("{}.json", file_name))
    }

    pub fn input_history_path() -> PathBuf {
        Self::app_dir().join("input_history.txt")
    }
}
