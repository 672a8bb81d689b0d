//! Command orchestration helpers from UI actions to the backend queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    bridge_notice: &mut Option<String>,
) {
    let cmd_name = match &cmd {
        BackendCommand::SubmitRegistration { .. } => "submit_registration",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *bridge_notice = Some("A submission is still being processed; please retry".to_string());
        }
        Err(TrySendError::Disconnected(_)) => {
            *bridge_notice = Some(
                "Backend command processor disconnected (possible startup failure); restart the app"
                    .to_string(),
            );
        }
    }
}
