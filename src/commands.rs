use crate::session::SessionHandle;
use crate::speech::InteractionMode;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

pub const HELP: &str = "\
Type an answer and press enter.
  /mic    start or stop listening
  /start  start voice chat
  /voice  speak replies aloud
  /chat   typed replies only
  /quit   leave";

/* ---------- 1.  PARSING ---------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    ToggleMic,
    SetMode(InteractionMode),
    StartVoiceChat,
    Help,
    Quit,
}

impl Command {
    /// `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let command = match line {
            "/mic" => Command::ToggleMic,
            "/start" => Command::StartVoiceChat,
            "/voice" => Command::SetMode(InteractionMode::VoiceChat),
            "/chat" => Command::SetMode(InteractionMode::ChatChat),
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            text => Command::Send(text.to_string()),
        };
        Some(command)
    }
}

/* ---------- 2.  DISPATCH ---------- */

/// Forwards one command. Returns `false` once the session is gone or the
/// user asked to leave.
pub fn dispatch(handle: &SessionHandle, command: Command) -> bool {
    match command {
        Command::Send(text) => handle.send_message(text),
        Command::ToggleMic => handle.toggle_mic(),
        Command::SetMode(mode) => handle.set_mode(mode),
        Command::StartVoiceChat => handle.start_voice_chat(),
        Command::Help => {
            println!("{}", HELP);
            true
        }
        Command::Quit => {
            handle.shutdown();
            false
        }
    }
}

/* ---------- 3.  INPUT LOOP ---------- */

/// Reads commands line by line until EOF, `/quit` or session shutdown.
pub async fn read_commands<R>(reader: R, handle: SessionHandle) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };
        debug!(?command, "Front-end command");
        if !dispatch(&handle, command) {
            return Ok(());
        }
    }

    info!("Input closed");
    handle.shutdown();
    Ok(())
}
