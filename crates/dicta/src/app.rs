//! Terminal front end for a single dictation composer.
//!
//! Reads commands from stdin, forwards them to one [`DictationSession`],
//! and prints phase transitions and adopted transcripts. This is the
//! simplest possible subscriber to the session's state; a graphical
//! composer would consume the same channels.

use crate::{
    AppResult, RecorderPhase, SessionCommand, elapsed::format_elapsed, session::SessionHandle,
};

use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

/// Main application: one composer driven from the terminal.
pub struct App {
    pub(crate) session: SessionHandle,
    pub(crate) transcripts: mpsc::Receiver<String>,
}

impl App {
    /// Run the interactive loop until the user quits or stdin closes.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Dicta starting");

        println!("commands: start | stop | cancel | retry | reset | quit");

        // Stdin forwarding via single persistent blocking task. std::io
        // line reads block, so they live on the blocking pool and feed the
        // async loop over a channel.
        //
        // Shutdown: when line_rx is dropped (main loop breaks), the next
        // line_tx.blocking_send() fails, breaking the blocking loop.
        let (line_tx, mut line_rx) = mpsc::channel::<String>(8);
        let stdin_handle = tokio::task::spawn_blocking(move || {
            let mut line = String::new();
            loop {
                line.clear();
                match std::io::stdin().read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if line_tx.blocking_send(line.trim().to_string()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let mut phase_rx = self.session.phase_rx();

        loop {
            tokio::select! {
                line = line_rx.recv() => {
                    let Some(line) = line else {
                        info!("Stdin closed, shutting down");
                        let _ = self.session.command(SessionCommand::Shutdown).await;
                        break;
                    };
                    let command = match line.as_str() {
                        "start" => SessionCommand::Start,
                        "stop" => SessionCommand::Stop,
                        "cancel" => SessionCommand::Cancel,
                        "retry" => SessionCommand::Retry,
                        "reset" => SessionCommand::Reset,
                        "quit" | "exit" => {
                            let _ = self.session.command(SessionCommand::Shutdown).await;
                            break;
                        }
                        "" => continue,
                        other => {
                            warn!(input = %other, "Unknown command");
                            continue;
                        }
                    };
                    self.session.command(command).await?;
                }

                changed = phase_rx.changed() => {
                    if changed.is_err() {
                        info!("Session ended");
                        break;
                    }
                    let phase = phase_rx.borrow_and_update().clone();
                    print_phase(&phase);
                }

                Some(text) = self.transcripts.recv() => {
                    println!("> {}", text);
                }
            }
        }

        drop(line_rx);

        match tokio::time::timeout(std::time::Duration::from_secs(1), stdin_handle).await {
            Ok(Ok(())) => info!("Stdin forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Stdin forwarder task panicked"),
            Err(_) => info!(
                "Stdin forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        info!("Dicta shut down successfully");

        Ok(())
    }
}

fn print_phase(phase: &RecorderPhase) {
    match phase {
        RecorderPhase::Idle => println!("[idle]"),
        RecorderPhase::Recording { elapsed_ms } => {
            println!("[recording {}]", format_elapsed(*elapsed_ms));
        }
        RecorderPhase::Processing => println!("[processing...]"),
        RecorderPhase::Error { message, can_retry } => {
            if *can_retry {
                println!("[error] {} (retry or cancel)", message);
            } else {
                println!("[error] {} (cancel to dismiss)", message);
            }
        }
    }
}
