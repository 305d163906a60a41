use super::{Message, Sender, Status, StatusKind, Surface};
use crate::matching::{ConfettiBurst, MatchCard, ResultsView};
use crate::speech::InteractionMode;
use std::fmt;
use std::io::{self, Write};
use tracing::debug;

const CONFETTI_WIDTH: usize = 60;

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// One text row with a coloured glyph per confetti piece.
fn confetti_row(burst: &ConfettiBurst, color: bool) -> String {
    let mut cells: Vec<Option<&str>> = vec![None; CONFETTI_WIDTH];
    for piece in &burst.pieces {
        let column = ((piece.left_percent / 100.0) * CONFETTI_WIDTH as f32) as usize;
        cells[column.min(CONFETTI_WIDTH - 1)] = Some(piece.color);
    }

    cells
        .into_iter()
        .map(|cell| match (cell, color) {
            (None, _) => " ".to_string(),
            (Some(hex), true) => match hex_to_rgb(hex) {
                Some((r, g, b)) => format!("\x1b[38;2;{};{};{}m✦\x1b[0m", r, g, b),
                None => "✦".to_string(),
            },
            (Some(_), false) => "✦".to_string(),
        })
        .collect()
}

/// Renders the session as plain lines on a terminal (or any writer).
pub struct TerminalSurface<W: Write + Send> {
    out: W,
    assistant: String,
    color: bool,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout(assistant: impl Into<String>) -> Self {
        Self::new(io::stdout(), assistant, true)
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W, assistant: impl Into<String>, color: bool) -> Self {
        Self {
            out,
            assistant: assistant.into(),
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.write_all(b"\n")) {
            debug!(error = %e, "Terminal write failed");
        }
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> Surface for TerminalSurface<W> {
    fn show_message(&mut self, message: &Message) {
        let speaker = match message.sender {
            Sender::User => "You".to_string(),
            Sender::Assistant => self.assistant.clone(),
        };
        self.line(format_args!(
            "[{}] {}: {}",
            message.sent_at.format("%H:%M:%S"),
            speaker,
            message.text
        ));
    }

    fn show_status(&mut self, status: Option<&Status>) {
        if let Some(status) = status {
            let tag = match status.kind {
                StatusKind::Listening => "listening",
                StatusKind::Speaking => "speaking",
            };
            self.line(format_args!("  ({}) {}", tag, status.label));
        }
    }

    fn set_recording(&mut self, recording: bool) {
        if recording {
            self.line(format_args!("  ● mic on"));
        } else {
            self.line(format_args!("  ○ mic off"));
        }
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        self.line(format_args!("  mode: {}", mode));
    }

    fn notify(&mut self, notice: &str) {
        self.line(format_args!("  ! {}", notice));
    }

    fn show_results(&mut self, results: &ResultsView) {
        let row = confetti_row(&results.confetti, self.color);
        self.line(format_args!(""));
        self.line(format_args!("{}", row));
        self.line(format_args!("{}", results.headline));
    }

    fn reveal_card(&mut self, card: &MatchCard) {
        self.line(format_args!(
            "  {}  {} · {} · 📍 {} · {}",
            card.avatar,
            card.name,
            card.profession,
            card.city,
            card.compatibility_label()
        ));
    }
}
