use super::{SessionEvent, SessionHandle};
use crate::config::{AppConfig, ConfigError, SpeechConfig, TimingConfig};
use crate::conversation::{Advance, ConversationError, ConversationStateMachine, ProfileRecord};
use crate::error::SessionError;
use crate::matching::{
    ConfettiBurst, MatchBackend, MatchOutcome, MatchRetriever, ResultsView, SubmissionError,
};
use crate::speech::{
    Capability, CaptureBackend, CaptureEvent, CaptureStartError, CommandCapture,
    EspeakSynthesizer, InteractionMode, SpeechInputAdapter, SpeechOutputAdapter,
    SynthesisBackend, SynthesisEvent,
};
use crate::view::status::{listening_label, speaking_label};
use crate::view::{Sender, StatusIndicator, StatusKind, Surface, Transcript};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Capabilities and remote services a session runs against.
pub struct SessionBackends {
    pub capture: Option<Arc<dyn CaptureBackend>>,
    pub synthesis: Option<Arc<dyn SynthesisBackend>>,
    pub matches: Arc<dyn MatchBackend>,
}

impl SessionBackends {
    /// Process-backed speech capabilities as configured.
    pub fn new(speech: &SpeechConfig, matches: Arc<dyn MatchBackend>) -> Self {
        let capture = speech
            .capture_command
            .as_deref()
            .and_then(CommandCapture::new)
            .map(|c| Arc::new(c) as Arc<dyn CaptureBackend>);
        let synthesis = speech
            .synthesis_program
            .as_ref()
            .map(|p| Arc::new(EspeakSynthesizer::new(p.clone())) as Arc<dyn SynthesisBackend>);

        Self {
            capture,
            synthesis,
            matches,
        }
    }
}

/// Owns the one conversation of this run. Every state change happens in
/// `handle`; timers, capabilities and network calls only post events.
pub struct SessionController<S: Surface> {
    id: Uuid,
    assistant: String,
    machine: ConversationStateMachine,
    transcript: Transcript,
    status: StatusIndicator,
    mode: InteractionMode,
    surface: S,
    input: SpeechInputAdapter,
    output: SpeechOutputAdapter,
    retriever: MatchRetriever,
    timing: TimingConfig,
    results: Option<ResultsView>,
    matching_started: bool,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    capture_rx: mpsc::UnboundedReceiver<CaptureEvent>,
    synthesis_rx: mpsc::UnboundedReceiver<SynthesisEvent>,
}

impl<S: Surface> SessionController<S> {
    pub fn new(config: &AppConfig, surface: S, backends: SessionBackends) -> Result<Self, ConfigError> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (capture_tx, capture_rx) = mpsc::unbounded_channel();
        let (synthesis_tx, synthesis_rx) = mpsc::unbounded_channel();

        let voice = config.speech.voice();
        let input = SpeechInputAdapter::new(backends.capture, voice.locale.clone(), capture_tx);
        let output = SpeechOutputAdapter::new(backends.synthesis, voice, synthesis_tx);

        let id = Uuid::new_v4();
        info!(
            session = %id,
            voice_capture = input.is_available(),
            speech_synthesis = output.is_available(),
            "Session created"
        );

        Ok(Self {
            id,
            assistant: config.assistant.name.clone(),
            machine: ConversationStateMachine::new(config.flow()?),
            transcript: Transcript::new(),
            status: StatusIndicator::default(),
            mode: config.assistant.default_mode,
            surface,
            input,
            output,
            retriever: MatchRetriever::new(backends.matches),
            timing: config.timing.clone(),
            results: None,
            matching_started: false,
            events_tx,
            events_rx,
            capture_rx,
            synthesis_rx,
        })
    }

    pub fn handle_for_front_end(&self) -> SessionHandle {
        SessionHandle::new(self.events_tx.clone())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn status(&self) -> &StatusIndicator {
        &self.status
    }

    pub fn profile(&self) -> &ProfileRecord {
        self.machine.profile()
    }

    pub fn current_step(&self) -> usize {
        self.machine.current_step()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn results(&self) -> Option<&ResultsView> {
        self.results.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Schedules the greeting.
    pub fn start(&mut self) {
        self.surface.set_mode(self.mode);
        let text = self.machine.greeting();
        self.schedule(
            self.timing.greeting_delay(),
            SessionEvent::PresentPrompt { step: 0, text },
        );
    }

    pub async fn run(mut self) {
        self.start();
        while let Some(event) = self.next_event().await {
            if self.handle(event).is_break() {
                break;
            }
        }
        info!(
            session = %self.id,
            messages = self.transcript.len(),
            step = self.machine.current_step(),
            "Session closed"
        );
    }

    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        tokio::select! {
            Some(event) = self.events_rx.recv() => Some(event),
            Some(event) = self.capture_rx.recv() => Some(SessionEvent::Capture(event)),
            Some(event) = self.synthesis_rx.recv() => Some(SessionEvent::Synthesis(event)),
            else => None,
        }
    }

    pub fn handle(&mut self, event: SessionEvent) -> ControlFlow<()> {
        match event {
            SessionEvent::UserText(text) => self.submit_input(&text),
            SessionEvent::ToggleMic => self.toggle_mic(),
            SessionEvent::SetMode(mode) => self.set_mode(mode),
            SessionEvent::StartVoiceChat => {
                self.schedule(self.timing.voice_chat_delay(), SessionEvent::BeginCapture)
            }
            SessionEvent::BeginCapture => match self.input.start() {
                Ok(()) => {}
                Err(CaptureStartError::Unavailable) => {
                    info!("Voice chat requested without a capture capability")
                }
                Err(e) => debug!(error = %e, "Voice chat capture not started"),
            },
            SessionEvent::Capture(event) => self.on_capture(event),
            SessionEvent::Synthesis(event) => self.on_synthesis(event),
            SessionEvent::PresentPrompt { step, text } => {
                debug!(step, "Presenting prompt");
                self.say(&text);
            }
            SessionEvent::PresentTerminal { text } => {
                self.say(&text);
                self.schedule(self.timing.search_delay(), SessionEvent::BeginMatching);
            }
            SessionEvent::BeginMatching => self.begin_matching(),
            SessionEvent::MatchesReady(result) => self.show_matches(result),
            SessionEvent::RevealCard(index) => {
                if let Some(card) = self.results.as_ref().and_then(|r| r.cards.get(index)) {
                    self.surface.reveal_card(card);
                }
            }
            SessionEvent::Shutdown => {
                self.input.stop();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn schedule(&self, delay: Duration, event: SessionEvent) {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        });
    }

    fn submit_input(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank input");
            return;
        }

        self.add_message(text, Sender::User);

        match self.machine.submit_input(text) {
            Ok(Advance::Prompt { step, text }) => {
                self.schedule(self.timing.prompt_delay(), SessionEvent::PresentPrompt { step, text })
            }
            Ok(Advance::Terminal { text }) => {
                info!(session = %self.id, "All questions answered");
                self.schedule(self.timing.prompt_delay(), SessionEvent::PresentTerminal { text })
            }
            Ok(Advance::Complete) => debug!("Conversation already complete"),
            Err(ConversationError::EmptyInput) => {}
            Err(e) => warn!(error = %e, "Conversation could not advance"),
        }
    }

    fn toggle_mic(&mut self) {
        match self.input.toggle() {
            Ok(()) => {}
            Err(CaptureStartError::Unavailable) => {
                self.report(SessionError::CapabilityUnavailable(Capability::VoiceCapture))
            }
            Err(e) => debug!(error = %e, "Mic toggle ignored"),
        }
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        info!(mode = %mode, "Interaction mode changed");
        self.mode = mode;
        self.surface.set_mode(mode);
    }

    fn on_capture(&mut self, event: CaptureEvent) {
        match event {
            CaptureEvent::Begin => {
                self.surface.set_recording(true);
                self.show_status(StatusKind::Listening, listening_label());
            }
            CaptureEvent::Transcript(text) => self.submit_input(&text),
            CaptureEvent::End => {
                self.surface.set_recording(false);
                self.hide_status();
            }
            CaptureEvent::Error(error) => {
                self.hide_status();
                self.report(SessionError::Capture(error));
            }
        }
    }

    fn on_synthesis(&mut self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::Start => {
                let label = speaking_label(&self.assistant);
                self.show_status(StatusKind::Speaking, label);
            }
            SynthesisEvent::End => self.hide_status(),
        }
    }

    fn add_message(&mut self, text: &str, sender: Sender) {
        let message = self.transcript.add_message(text, sender);
        self.surface.show_message(message);
    }

    fn say(&mut self, text: &str) {
        self.add_message(text, Sender::Assistant);
        self.output.speak(self.mode, text);
    }

    fn show_status(&mut self, kind: StatusKind, label: String) {
        let status = self.status.show(kind, label);
        self.surface.show_status(Some(status));
    }

    fn hide_status(&mut self) {
        self.status.hide();
        self.surface.show_status(None);
    }

    fn begin_matching(&mut self) {
        if self.matching_started {
            debug!("Matching already started");
            return;
        }
        self.matching_started = true;

        let retriever = self.retriever.clone();
        let profile = self.machine.profile().clone();
        let tx = self.events_tx.clone();
        info!(session = %self.id, "Submitting profile for matching");

        tokio::spawn(async move {
            let result = retriever.find_matches(&profile).await;
            let _ = tx.send(SessionEvent::MatchesReady(result));
        });
    }

    fn show_matches(&mut self, result: Result<MatchOutcome, SubmissionError>) {
        let mut outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report(SessionError::Submission(e));
                return;
            }
        };

        if let Some(reason) = outcome.fallback_reason.take() {
            self.report(SessionError::Retrieval(reason));
        }

        let confetti = ConfettiBurst::generate(&mut rand::thread_rng());
        let results = ResultsView::new(
            outcome,
            confetti,
            self.timing.reveal_delay(),
            self.timing.card_stagger(),
        );
        info!(
            session = %self.id,
            cards = results.cards.len(),
            source = ?results.source,
            "Showing matches"
        );

        self.surface.show_results(&results);
        for (index, card) in results.cards.iter().enumerate() {
            self.schedule(
                results.reveal_after + card.reveal_delay,
                SessionEvent::RevealCard(index),
            );
        }
        self.results = Some(results);
    }

    fn report(&mut self, error: SessionError) {
        warn!(session = %self.id, error = %error, "Session error");
        if let Some(notice) = error.notice() {
            self.surface.notify(&notice);
        }
    }
}
