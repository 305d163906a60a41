//! Presentation: the transcript and status models plus the `Surface` the
//! session draws on.

pub mod status;
pub mod terminal;
pub mod transcript;

pub use status::{Status, StatusIndicator, StatusKind};
pub use terminal::TerminalSurface;
pub use transcript::{Message, Sender, Transcript};

use crate::matching::{MatchCard, ResultsView};
use crate::speech::InteractionMode;

/// Sink for everything the user sees. Implementations only render; all
/// state lives in the session.
pub trait Surface: Send {
    fn show_message(&mut self, message: &Message);

    /// `None` hides the indicator.
    fn show_status(&mut self, status: Option<&Status>);

    fn set_recording(&mut self, recording: bool);

    fn set_mode(&mut self, mode: InteractionMode);

    /// Non-blocking, user-visible alert.
    fn notify(&mut self, notice: &str);

    /// Headline and confetti; the results region is scrolled into view.
    fn show_results(&mut self, results: &ResultsView);

    /// Called once per card, in order, as each reveal delay elapses.
    fn reveal_card(&mut self, card: &MatchCard);
}
