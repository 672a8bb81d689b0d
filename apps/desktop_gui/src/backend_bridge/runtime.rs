//! Runtime bridge: a dedicated thread running a tokio runtime that owns the
//! registration controller and drains the UI command queue.

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use registration_core::{RegistrationClient, RegistrationController};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Fixed registration host; the `/register` path is appended by the client.
pub const DEFAULT_SERVER_URL: &str = "https://haider7791.pythonanywhere.com";

pub fn spawn_backend_thread(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    std::thread::spawn(move || {
        if let Err(err) = run_backend(cmd_rx, ui_tx.clone()) {
            tracing::error!("backend bridge stopped: {err:#}");
            let _ = ui_tx.try_send(UiEvent::BackendFailed(format!("{err:#}")));
        }
    });
}

fn run_backend(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build backend runtime")?;

    runtime.block_on(async move {
        let client = RegistrationClient::new(DEFAULT_SERVER_URL)
            .context("invalid registration endpoint URL")?;
        let mut controller = RegistrationController::new(client);

        // Forward every state transition to the UI, including `Submitting`
        // while a call is pending.
        let mut events = controller.subscribe();
        let event_tx = ui_tx.clone();
        tokio::spawn(async move {
            while let Ok(state) = events.recv().await {
                let _ = event_tx.try_send(UiEvent::Submission(state));
            }
        });

        // The UI disables its submit trigger while a call is in flight, so
        // draining commands one at a time matches the screen's contract.
        while let Ok(command) = cmd_rx.recv() {
            match command {
                BackendCommand::SubmitRegistration { username, email } => {
                    controller.submit(&username, &email).await;
                }
            }
        }

        Ok(())
    })
}
