//! Capabilities backed by external programs.

use super::{CaptureBackend, CaptureError, SynthesisBackend, SynthesisError, VoiceSettings};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

const LOCALE_PLACEHOLDER: &str = "{locale}";
const ESPEAK_BASE_WPM: f32 = 175.0;
const ESPEAK_BASE_PITCH: f32 = 50.0;

fn resolve_program(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

fn not_found(program: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", program))
}

/// Runs a recognizer command that records one utterance and prints the
/// transcript on stdout.
#[derive(Debug, Clone)]
pub struct CommandCapture {
    program: String,
    args: Vec<String>,
    resolved: Option<PathBuf>,
}

impl CommandCapture {
    /// `command` is the program followed by its arguments.
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            resolved: resolve_program(program),
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn args_for(&self, locale: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(LOCALE_PLACEHOLDER, locale))
            .collect()
    }
}

#[async_trait]
impl CaptureBackend for CommandCapture {
    fn is_available(&self) -> bool {
        self.resolved.is_some()
    }

    #[instrument(skip(self), fields(program = %self.program))]
    async fn capture_utterance(&self, locale: &str) -> Result<Option<String>, CaptureError> {
        let program = self.resolved.as_ref().ok_or_else(|| not_found(&self.program))?;

        let output = Command::new(program)
            .args(self.args_for(locale))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(CaptureError::Recognizer {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| CaptureError::NotUtf8)?;
        let text = text.trim();
        debug!(chars = text.len(), "Recognizer finished");
        Ok((!text.is_empty()).then(|| text.to_string()))
    }
}

/// Speaks through `espeak-ng`.
#[derive(Debug, Clone)]
pub struct EspeakSynthesizer {
    program: String,
    resolved: Option<PathBuf>,
}

impl EspeakSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            resolved: resolve_program(&program),
            program,
        }
    }

    pub fn args(settings: &VoiceSettings, text: &str) -> Vec<String> {
        let wpm = (ESPEAK_BASE_WPM * settings.rate).round().max(1.0) as u32;
        let pitch = (ESPEAK_BASE_PITCH * settings.pitch).round().clamp(0.0, 99.0) as u32;
        vec![
            "-v".to_string(),
            settings.locale.to_lowercase(),
            "-s".to_string(),
            wpm.to_string(),
            "-p".to_string(),
            pitch.to_string(),
            "--".to_string(),
            text.to_string(),
        ]
    }
}

#[async_trait]
impl SynthesisBackend for EspeakSynthesizer {
    fn is_available(&self) -> bool {
        self.resolved.is_some()
    }

    async fn synthesize(&self, text: &str, settings: &VoiceSettings) -> Result<(), SynthesisError> {
        let program = self.resolved.as_ref().ok_or_else(|| not_found(&self.program))?;

        let status = Command::new(program)
            .args(Self::args(settings, text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(SynthesisError::Interrupted(status.to_string()))
        }
    }
}
