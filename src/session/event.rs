use crate::matching::{MatchOutcome, SubmissionError};
use crate::speech::{CaptureEvent, InteractionMode, SynthesisEvent};
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum SessionEvent {
    /* ---------- front end ---------- */
    UserText(String),
    ToggleMic,
    SetMode(InteractionMode),
    StartVoiceChat,
    Shutdown,

    /* ---------- capabilities ---------- */
    Capture(CaptureEvent),
    Synthesis(SynthesisEvent),

    /* ---------- timers and network ---------- */
    PresentPrompt { step: usize, text: String },
    PresentTerminal { text: String },
    BeginCapture,
    BeginMatching,
    MatchesReady(Result<MatchOutcome, SubmissionError>),
    /// Index into the shown results.
    RevealCard(usize),
}

/// Cloneable entry point for the front end.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { tx }
    }

    /// `false` once the session has shut down.
    pub fn send(&self, event: SessionEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn send_message(&self, text: impl Into<String>) -> bool {
        self.send(SessionEvent::UserText(text.into()))
    }

    pub fn toggle_mic(&self) -> bool {
        self.send(SessionEvent::ToggleMic)
    }

    pub fn set_mode(&self, mode: InteractionMode) -> bool {
        self.send(SessionEvent::SetMode(mode))
    }

    pub fn start_voice_chat(&self) -> bool {
        self.send(SessionEvent::StartVoiceChat)
    }

    pub fn shutdown(&self) -> bool {
        self.send(SessionEvent::Shutdown)
    }
}
