//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    reducer::{TrackerState, UiAction},
};

/// Queues one command; a refused command is fed back into `state` as an error
/// so `loading` and the save guard do not stay stuck.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    state: &mut TrackerState,
) {
    let cmd_name = cmd.name();
    let context = match &cmd {
        BackendCommand::LoadAnimals => UiErrorContext::LoadAnimals,
        BackendCommand::CreateAnimal { .. } | BackendCommand::UpdateAnimal { .. } => {
            UiErrorContext::SaveAnimal
        }
    };

    let reason = match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            return;
        }
        Err(TrySendError::Full(_)) => "UI command queue is full; please retry",
        Err(TrySendError::Disconnected(_)) => {
            "Backend command processor disconnected (possible startup/runtime failure)"
        }
    };
    tracing::warn!(command = cmd_name, "{reason}");
    let follow_up = state.apply_event(UiEvent::Error(UiError::from_message(context, reason)));
    debug_assert!(follow_up.is_empty());
}

/// Applies a user action and queues whatever commands it produced.
pub fn perform(cmd_tx: &Sender<BackendCommand>, state: &mut TrackerState, action: UiAction) {
    for cmd in state.apply(action) {
        dispatch_backend_command(cmd_tx, cmd, state);
    }
}

/// Applies a backend event and queues any follow-up commands (the reload after a save).
pub fn handle_event(cmd_tx: &Sender<BackendCommand>, state: &mut TrackerState, event: UiEvent) {
    for cmd in state.apply_event(event) {
        dispatch_backend_command(cmd_tx, cmd, state);
    }
}
