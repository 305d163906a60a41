use crate::conversation::{ConversationError, ConversationFlow};
use crate::speech::{InteractionMode, VoiceSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub const CONFIG_ENV: &str = "SAHELI_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "saheli.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Invalid conversation prompts: {0}")]
    Prompts(#[from] ConversationError),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub assistant: AssistantConfig,
    pub speech: SpeechConfig,
    pub backend: BackendConfig,
    pub timing: TimingConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssistantConfig {
    pub name: String,
    pub default_mode: InteractionMode,
    /// Replaces the built-in walkthrough; must hold five questions plus the
    /// terminal message.
    pub prompts: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    /// `None` disables speech output.
    pub synthesis_program: Option<String>,
    /// Recognizer command and arguments; `{locale}` is substituted.
    pub capture_command: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub save_profile_path: String,
    pub match_path: String,
    pub request_timeout_seconds: u64,
    pub check_health: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub greeting_delay_ms: u64,
    pub prompt_delay_ms: u64,
    pub search_delay_ms: u64,
    pub reveal_delay_ms: u64,
    pub card_stagger_ms: u64,
    pub voice_chat_delay_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "Saheli".to_string(),
            default_mode: InteractionMode::VoiceChat,
            prompts: None,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        let voice = VoiceSettings::default();
        Self {
            locale: voice.locale,
            rate: voice.rate,
            pitch: voice.pitch,
            synthesis_program: Some("espeak-ng".to_string()),
            capture_command: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            save_profile_path: "api/save_profile".to_string(),
            match_path: "match-user".to_string(),
            request_timeout_seconds: 10,
            check_health: true,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            greeting_delay_ms: 1000,
            prompt_delay_ms: 1000,
            search_delay_ms: 2000,
            reveal_delay_ms: 500,
            card_stagger_ms: 200,
            voice_chat_delay_ms: 1000,
        }
    }
}

impl SpeechConfig {
    pub fn voice(&self) -> VoiceSettings {
        VoiceSettings {
            locale: self.locale.clone(),
            rate: self.rate,
            pitch: self.pitch,
        }
    }
}

impl BackendConfig {
    /// Base URL with a trailing slash so relative joins keep its path.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::Invalid(format!("backend.base_url {:?}: {}", self.base_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Invalid(format!(
                "backend.base_url must be http or https, got {}",
                other
            ))),
        }
    }
}

impl TimingConfig {
    pub fn greeting_delay(&self) -> Duration {
        Duration::from_millis(self.greeting_delay_ms)
    }

    pub fn prompt_delay(&self) -> Duration {
        Duration::from_millis(self.prompt_delay_ms)
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn card_stagger(&self) -> Duration {
        Duration::from_millis(self.card_stagger_ms)
    }

    pub fn voice_chat_delay(&self) -> Duration {
        Duration::from_millis(self.voice_chat_delay_ms)
    }
}

impl AppConfig {
    /// `.env`, then the TOML file (if any), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            });

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No configuration file, using defaults");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Applies `SAHELI_BACKEND_URL`, `SAHELI_MODE` and `SAHELI_LOCALE`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SAHELI_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(mode) = lookup("SAHELI_MODE") {
            self.assistant.default_mode = mode.parse().map_err(ConfigError::Invalid)?;
        }
        if let Some(locale) = lookup("SAHELI_LOCALE") {
            self.speech.locale = locale;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.base_url()?;

        if self.backend.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "backend.request_timeout_seconds must be > 0".to_string(),
            ));
        }
        for (key, value) in [("speech.rate", self.speech.rate), ("speech.pitch", self.speech.pitch)] {
            if !(value > 0.0 && value <= 2.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within (0, 2], got {}",
                    key, value
                )));
            }
        }
        if self.assistant.name.trim().is_empty() {
            return Err(ConfigError::Invalid("assistant.name must not be empty".to_string()));
        }
        self.flow()?;
        Ok(())
    }

    pub fn flow(&self) -> Result<ConversationFlow, ConfigError> {
        match &self.assistant.prompts {
            Some(prompts) => Ok(ConversationFlow::new(prompts.clone())?),
            None => Ok(ConversationFlow::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.speech.voice(), VoiceSettings::default());
        assert_eq!(config.timing.prompt_delay(), Duration::from_secs(1));
        assert_eq!(config.timing.search_delay(), Duration::from_secs(2));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[backend]
base_url = "https://saheli.example.com/v1"
request_timeout_seconds = 3

[assistant]
default_mode = "chat-chat"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.backend.request_timeout_seconds, 3);
        assert_eq!(config.backend.match_path, "match-user");
        assert_eq!(config.assistant.default_mode, InteractionMode::ChatChat);
        assert_eq!(config.assistant.name, "Saheli");
        assert_eq!(
            config.backend.base_url().unwrap().as_str(),
            "https://saheli.example.com/v1/"
        );
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend\nbase_url = 1").unwrap();
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("SAHELI_BACKEND_URL", "http://10.0.0.2:8080"),
            ("SAHELI_MODE", "chat"),
            ("SAHELI_LOCALE", "hi-IN"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.backend.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.assistant.default_mode, InteractionMode::ChatChat);
        assert_eq!(config.speech.locale, "hi-IN");
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = AppConfig::default();
        config.backend.base_url = "ftp://files.example.com".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.speech.rate = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.backend.request_timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.assistant.prompts = Some(vec!["Hello?".into()]);
        assert!(matches!(config.validate(), Err(ConfigError::Prompts(_))));
    }
}
