//! Voice capture and speech synthesis behind capability traits.
//!
//! The adapters own the event contract (`Begin` is always followed by `End`,
//! synthesis `Start` by `End`) and report through channels, so the session
//! never blocks on a capability and tests can script one deterministically.

pub mod command;
pub mod input;
pub mod output;

pub use command::{CommandCapture, EspeakSynthesizer};
pub use input::SpeechInputAdapter;
pub use output::SpeechOutputAdapter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    #[serde(rename = "voice-chat")]
    VoiceChat,
    /// Typed only; nothing is spoken.
    #[serde(rename = "chat-chat")]
    ChatChat,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionMode::VoiceChat => "voice-chat",
            InteractionMode::ChatChat => "chat-chat",
        }
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, InteractionMode::ChatChat)
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "voice-chat" | "voice" => Ok(InteractionMode::VoiceChat),
            "chat-chat" | "chat" => Ok(InteractionMode::ChatChat),
            other => Err(format!("Invalid interaction mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    VoiceCapture,
    SpeechSynthesis,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::VoiceCapture => f.write_str("Speech recognition"),
            Capability::SpeechSynthesis => f.write_str("Speech synthesis"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            locale: "en-IN".to_string(),
            rate: 0.9,
            pitch: 1.1,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CaptureEvent {
    Begin,
    Transcript(String),
    End,
    Error(Arc<CaptureError>),
}

impl PartialEq for CaptureEvent {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CaptureEvent::Begin, CaptureEvent::Begin) | (CaptureEvent::End, CaptureEvent::End) => true,
            (CaptureEvent::Transcript(a), CaptureEvent::Transcript(b)) => a == b,
            // Errors compare by what they report.
            (CaptureEvent::Error(a), CaptureEvent::Error(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisEvent {
    Start,
    End,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureStartError {
    #[error("Voice capture is not available")]
    Unavailable,
    #[error("Voice capture is already running")]
    AlreadyActive,
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to launch recognizer: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Recognizer exited with {status}: {stderr}")]
    Recognizer { status: String, stderr: String },
    #[error("Recognizer output is not valid UTF-8")]
    NotUtf8,
}

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Failed to launch synthesizer: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Synthesis interrupted: {0}")]
    Interrupted(String),
}

/// Single-utterance voice capture.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    fn is_available(&self) -> bool;

    /// Records one utterance. `Ok(None)` means nothing was heard.
    async fn capture_utterance(&self, locale: &str) -> Result<Option<String>, CaptureError>;
}

#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    fn is_available(&self) -> bool;

    /// Resolves once the utterance has finished playing.
    async fn synthesize(&self, text: &str, settings: &VoiceSettings) -> Result<(), SynthesisError>;
}
