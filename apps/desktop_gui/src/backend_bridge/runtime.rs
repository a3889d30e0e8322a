//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::SharedEntityClient;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{SaveKind, UiError, UiErrorContext, UiEvent};

/// Spawns the backend worker thread.
///
/// Every command becomes its own task, so responses may arrive in any order
/// and nothing is cancelled once queued. Results wait for room in the UI
/// queue rather than being dropped.
pub fn launch(
    client: SharedEntityClient,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                let client = client.clone();
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let name = cmd.name();
                    let event = execute_command(client.as_ref(), cmd).await;
                    if tokio::task::block_in_place(|| ui_tx.send(event)).is_err() {
                        tracing::debug!(command = name, "ui queue closed; discarding result");
                    }
                });
            }
            tracing::info!("backend command queue closed; worker exiting");
        });
    })
}

/// Runs one command against the entity client and maps the outcome to a UI event.
pub async fn execute_command(
    client: &dyn client_core::EntityClient,
    cmd: BackendCommand,
) -> UiEvent {
    match cmd {
        BackendCommand::LoadAnimals => match client.list().await {
            Ok(response) => UiEvent::AnimalsLoaded(response),
            Err(err) => UiEvent::LoadFailed(UiError::from_client_error(
                UiErrorContext::LoadAnimals,
                &err,
            )),
        },
        BackendCommand::CreateAnimal { fields } => match client.create(&fields).await {
            Ok(response) => UiEvent::SaveCompleted {
                kind: SaveKind::Create,
                response,
            },
            Err(err) => UiEvent::SaveFailed(UiError::from_client_error(
                UiErrorContext::SaveAnimal,
                &err,
            )),
        },
        BackendCommand::UpdateAnimal { id, fields } => match client.update(&id, &fields).await {
            Ok(response) => UiEvent::SaveCompleted {
                kind: SaveKind::Update,
                response,
            },
            Err(err) => UiEvent::SaveFailed(UiError::from_client_error(
                UiErrorContext::SaveAnimal,
                &err,
            )),
        },
    }
}
