use super::{CaptureBackend, CaptureEvent, CaptureStartError};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

struct ActiveCapture {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

/// Wraps a capture capability and turns each `start()` into one
/// `Begin .. End` run of events.
pub struct SpeechInputAdapter {
    backend: Option<Arc<dyn CaptureBackend>>,
    locale: String,
    events: mpsc::UnboundedSender<CaptureEvent>,
    active: Option<ActiveCapture>,
}

impl SpeechInputAdapter {
    pub fn new(
        backend: Option<Arc<dyn CaptureBackend>>,
        locale: impl Into<String>,
        events: mpsc::UnboundedSender<CaptureEvent>,
    ) -> Self {
        Self {
            backend,
            locale: locale.into(),
            events,
            active: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.as_ref().map_or(false, |b| b.is_available())
    }

    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .map_or(false, |active| !active.task.is_finished())
    }

    pub fn start(&mut self) -> Result<(), CaptureStartError> {
        let backend = match &self.backend {
            Some(backend) if backend.is_available() => Arc::clone(backend),
            _ => return Err(CaptureStartError::Unavailable),
        };
        if self.is_active() {
            return Err(CaptureStartError::AlreadyActive);
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let events = self.events.clone();
        let locale = self.locale.clone();

        let task = tokio::spawn(async move {
            let _ = events.send(CaptureEvent::Begin);

            tokio::select! {
                result = backend.capture_utterance(&locale) => match result {
                    Ok(Some(text)) if !text.trim().is_empty() => {
                        let _ = events.send(CaptureEvent::Transcript(text));
                    }
                    Ok(_) => debug!("No speech detected"),
                    Err(e) => {
                        warn!(error = %e, "Speech capture failed");
                        let _ = events.send(CaptureEvent::Error(Arc::new(e)));
                    }
                },
                _ = stop_rx => debug!("Speech capture stopped early"),
            }

            let _ = events.send(CaptureEvent::End);
        });

        self.active = Some(ActiveCapture {
            stop: Some(stop_tx),
            task,
        });
        Ok(())
    }

    /// Ends an in-flight capture. `End` still follows. Returns `false` when
    /// there was nothing left to stop.
    pub fn stop(&mut self) -> bool {
        match self.active.as_mut().and_then(|active| active.stop.take()) {
            Some(stop) => stop.send(()).is_ok(),
            None => false,
        }
    }

    /// Stops a running capture, otherwise starts one. A capture that has
    /// already finished listening but not yet exited counts as stopped.
    pub fn toggle(&mut self) -> Result<(), CaptureStartError> {
        if let Some(active) = self.active.as_mut() {
            if !active.task.is_finished() {
                match active.stop.take() {
                    // Stop already requested.
                    None => return Ok(()),
                    Some(stop) => {
                        if stop.send(()).is_ok() {
                            return Ok(());
                        }
                    }
                }
            }
        }
        self.active = None;
        self.start()
    }
}
