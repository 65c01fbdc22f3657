//! Dicta: voice dictation with a transcription-service backend.

mod app;
mod config;
mod elapsed;
mod error;
mod machine;
mod mic_lease;
mod recorder_phase;
mod session;
mod session_command;
#[cfg(test)]
mod tests;
mod transcribe;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
    mic_lease::{MicGuard, MicrophoneLease},
    recorder_phase::RecorderPhase,
    session::DictationSession,
    session_command::SessionCommand,
    transcribe::TranscriptionClient,
};

use crate::config::Config;

use std::sync::Arc;

use tracing::error;

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("dicta=debug")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let lease = MicrophoneLease::new();
        let client = Arc::new(TranscriptionClient::new(&config.transcription));

        let (session, transcripts) =
            DictationSession::spawn(lease, client, config.audio.target_sample_rate);

        let app = App {
            session,
            transcripts,
        };

        if let Err(e) = app.run().await {
            error!(error = ?e, "App error");
        }
    });
}
