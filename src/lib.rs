//! Saheli: a guided roommate-matching conversation with voice or typed replies.

pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod matching;
pub mod session;
pub mod speech;
pub mod telemetry;
pub mod view;

use crate::config::AppConfig;
use crate::matching::MatchClient;
use crate::session::{SessionBackends, SessionController};
use crate::view::TerminalSurface;
use anyhow::Context;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};

/// Runs one interactive session on the terminal.
pub async fn run() -> anyhow::Result<()> {
    telemetry::init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let client = MatchClient::new(&config.backend).context("failed to build backend client")?;
    info!(backend = %client.base_url(), mode = %config.assistant.default_mode, "Starting Saheli");

    if config.backend.check_health {
        let checker = client.clone();
        tokio::spawn(async move {
            match checker.health().await {
                Ok(true) => {}
                Ok(false) => warn!("Backend reported unhealthy; matches may fall back"),
                Err(e) => warn!(error = %e, "Backend unreachable; matches will fall back"),
            }
        });
    }

    let backends = SessionBackends::new(&config.speech, Arc::new(client));
    let surface = TerminalSurface::stdout(config.assistant.name.clone());
    let controller = SessionController::new(&config, surface, backends)
        .context("failed to create session")?;
    let handle = controller.handle_for_front_end();

    println!("{}", commands::HELP);
    let mut session = tokio::spawn(controller.run());
    let input = commands::read_commands(BufReader::new(tokio::io::stdin()), handle);

    tokio::select! {
        joined = &mut session => joined.context("session task failed")?,
        read = input => {
            read.context("failed to read input")?;
            session.await.context("session task failed")?;
        }
    }
    Ok(())
}
