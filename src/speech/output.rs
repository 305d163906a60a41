use super::{InteractionMode, SynthesisBackend, SynthesisEvent, VoiceSettings};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Speaks assistant messages. Each call runs independently; overlap is left
/// to the backend.
pub struct SpeechOutputAdapter {
    backend: Option<Arc<dyn SynthesisBackend>>,
    settings: VoiceSettings,
    events: mpsc::UnboundedSender<SynthesisEvent>,
}

impl SpeechOutputAdapter {
    pub fn new(
        backend: Option<Arc<dyn SynthesisBackend>>,
        settings: VoiceSettings,
        events: mpsc::UnboundedSender<SynthesisEvent>,
    ) -> Self {
        Self {
            backend,
            settings,
            events,
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.as_ref().map_or(false, |b| b.is_available())
    }

    pub fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    /// Returns whether anything was queued for synthesis.
    pub fn speak(&self, mode: InteractionMode, text: &str) -> bool {
        if mode.is_silent() {
            return false;
        }
        let backend = match &self.backend {
            Some(backend) if backend.is_available() => Arc::clone(backend),
            _ => {
                debug!("Speech synthesis unavailable, not speaking");
                return false;
            }
        };

        let events = self.events.clone();
        let settings = self.settings.clone();
        let text = text.to_string();

        tokio::spawn(async move {
            let _ = events.send(SynthesisEvent::Start);
            if let Err(e) = backend.synthesize(&text, &settings).await {
                warn!(error = %e, "Speech synthesis failed");
            }
            let _ = events.send(SynthesisEvent::End);
        });
        true
    }
}
