//! Tracker view state machine.
//!
//! The UI thread owns one [`TrackerState`]. User intents go through
//! [`TrackerState::apply`], backend results through
//! [`TrackerState::apply_event`]; both return the backend commands to queue.
//! Late responses are applied to whatever the current state is.

use shared::domain::{Animal, AnimalId};
use tracing::{info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{SaveKind, UiError, UiErrorContext, UiEvent},
    form::AnimalForm,
    notifications::NotificationQueue,
    table::TableState,
};

pub const ANIMAL_ADDED: &str = "Animal added successfully";
pub const ANIMAL_UPDATED: &str = "Animal updated successfully";
pub const ANIMAL_DELETED: &str = "Animal deleted successfully";
pub const DELETE_CONFIRM_TITLE: &str = "Are you sure you want to delete this animal?";

/// Modal visibility; `Edit` carries the editing buffer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Create,
    Edit(Animal),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    pub fn editing(&self) -> Option<&Animal> {
        match self {
            ModalState::Edit(animal) => Some(animal),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ModalState::Edit(_) => "Edit Animal",
            _ => "Add New Animal",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            ModalState::Edit(_) => "Update Animal",
            _ => "Add Animal",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Mount,
    Reload,
    OpenCreate,
    Edit(Animal),
    Cancel,
    Submit,
    RequestDelete(AnimalId),
    ConfirmDelete,
    DismissDelete,
}

#[derive(Debug)]
pub struct TrackerState {
    /// Snapshot of the last successful `list()`; replaced wholesale, never patched.
    pub animals: Vec<Animal>,
    pub loading: bool,
    pub form: AnimalForm,
    pub table: TableState,
    pub notifications: NotificationQueue,
    pub status: String,
    modal: ModalState,
    pending_delete: Option<AnimalId>,
    save_in_flight: bool,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::new(TableState::default())
    }
}

impl TrackerState {
    pub fn new(table: TableState) -> Self {
        Self {
            animals: Vec::new(),
            loading: false,
            form: AnimalForm::default(),
            table,
            notifications: NotificationQueue::default(),
            status: String::new(),
            modal: ModalState::Closed,
            pending_delete: None,
            save_in_flight: false,
        }
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn pending_delete(&self) -> Option<&AnimalId> {
        self.pending_delete.as_ref()
    }

    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    pub fn apply(&mut self, action: UiAction) -> Vec<BackendCommand> {
        match action {
            UiAction::Mount | UiAction::Reload => self.begin_load(),
            UiAction::OpenCreate => {
                self.form.reset();
                self.modal = ModalState::Create;
                Vec::new()
            }
            UiAction::Edit(animal) => {
                self.form = AnimalForm::from_animal(&animal);
                self.modal = ModalState::Edit(animal);
                Vec::new()
            }
            UiAction::Cancel => {
                self.close_modal();
                Vec::new()
            }
            UiAction::Submit => self.submit(),
            UiAction::RequestDelete(id) => {
                self.pending_delete = Some(id);
                Vec::new()
            }
            UiAction::ConfirmDelete => match self.pending_delete.take() {
                // No remote delete exists; confirming only acknowledges and reloads.
                Some(id) => {
                    info!(%id, "delete confirmed");
                    self.notifications.success(ANIMAL_DELETED);
                    self.begin_load()
                }
                None => Vec::new(),
            },
            UiAction::DismissDelete => {
                self.pending_delete = None;
                Vec::new()
            }
        }
    }

    pub fn apply_event(&mut self, event: UiEvent) -> Vec<BackendCommand> {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
                Vec::new()
            }
            UiEvent::AnimalsLoaded(response) => {
                self.loading = false;
                if response.success {
                    info!(count = response.data.len(), "animals loaded");
                    self.animals = response.data;
                } else {
                    let detail = response
                        .error
                        .map(|err| err.message)
                        .unwrap_or_else(|| "list resolved with success=false".to_string());
                    self.report(UiError::from_message(UiErrorContext::LoadAnimals, detail));
                }
                Vec::new()
            }
            UiEvent::LoadFailed(err) => {
                self.loading = false;
                self.report(err);
                Vec::new()
            }
            UiEvent::SaveCompleted { kind, response } => {
                self.save_in_flight = false;
                if !response.success {
                    warn!(
                        ?kind,
                        error = ?response.error,
                        "save resolved with success=false; treating as saved"
                    );
                }
                self.notifications.success(match kind {
                    SaveKind::Create => ANIMAL_ADDED,
                    SaveKind::Update => ANIMAL_UPDATED,
                });
                self.close_modal();
                self.begin_load()
            }
            UiEvent::SaveFailed(err) => {
                self.save_in_flight = false;
                self.report(err);
                Vec::new()
            }
            UiEvent::Error(err) => {
                match err.context() {
                    UiErrorContext::LoadAnimals => self.loading = false,
                    UiErrorContext::SaveAnimal => self.save_in_flight = false,
                    _ => {}
                }
                self.report(err);
                Vec::new()
            }
        }
    }

    fn begin_load(&mut self) -> Vec<BackendCommand> {
        self.loading = true;
        vec![BackendCommand::LoadAnimals]
    }

    fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
        self.form.reset();
    }

    fn submit(&mut self) -> Vec<BackendCommand> {
        if !self.modal.is_open() {
            return Vec::new();
        }
        if self.save_in_flight {
            warn!("save already in flight; ignoring submit");
            return Vec::new();
        }
        let Ok(fields) = self.form.validate() else {
            return Vec::new();
        };

        self.save_in_flight = true;
        match &self.modal {
            ModalState::Edit(animal) => vec![BackendCommand::UpdateAnimal {
                id: animal.id.clone(),
                fields,
            }],
            _ => vec![BackendCommand::CreateAnimal { fields }],
        }
    }

    fn report(&mut self, err: UiError) {
        tracing::error!(
            context = ?err.context(),
            category = ?err.category(),
            "{}",
            err.message()
        );
        self.notifications.error(err.user_message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{
        form::{FormField, NAME_REQUIRED},
        notifications::ToastLevel,
    };
    use shared::{
        domain::AnimalFields,
        error::{ApiError, ErrorCode},
        protocol::{ListResponse, MutationResponse},
    };

    fn rex() -> Animal {
        let mut animal = Animal::new(AnimalId::new("1"), "Rex", "Dog");
        animal.age = Some(3.0);
        animal.health = Some("Healthy".to_string());
        animal
    }

    fn milo() -> Animal {
        Animal::new(AnimalId::new("2"), "Milo", "Cat")
    }

    fn loaded_state() -> TrackerState {
        let mut state = TrackerState::default();
        state.apply(UiAction::Mount);
        state.apply_event(UiEvent::AnimalsLoaded(ListResponse::ok(vec![rex(), milo()])));
        state
    }

    fn toast_messages(state: &TrackerState) -> Vec<(ToastLevel, String)> {
        state
            .notifications
            .toasts()
            .iter()
            .map(|toast| (toast.level, toast.message.clone()))
            .collect()
    }

    #[test]
    fn mount_requests_full_list_and_replaces_snapshot() {
        let mut state = TrackerState::default();
        assert_eq!(state.apply(UiAction::Mount), vec![BackendCommand::LoadAnimals]);
        assert!(state.loading);

        state.apply_event(UiEvent::AnimalsLoaded(ListResponse::ok(vec![rex(), milo()])));
        assert!(!state.loading);
        assert_eq!(state.animals, vec![rex(), milo()]);

        state.apply_event(UiEvent::AnimalsLoaded(ListResponse::ok(vec![milo()])));
        assert_eq!(state.animals, vec![milo()]);
    }

    #[test]
    fn failed_load_keeps_previous_snapshot_and_clears_loading() {
        let mut state = loaded_state();
        state.apply(UiAction::Reload);
        state.apply_event(UiEvent::LoadFailed(UiError::from_message(
            UiErrorContext::LoadAnimals,
            "connection refused",
        )));
        assert!(!state.loading);
        assert_eq!(state.animals, vec![rex(), milo()]);
        assert_eq!(
            toast_messages(&state),
            vec![(ToastLevel::Error, "Failed to load animals".to_string())]
        );
    }

    #[test]
    fn unsuccessful_list_is_treated_like_a_rejection() {
        let mut state = loaded_state();
        state.apply(UiAction::Reload);
        state.apply_event(UiEvent::AnimalsLoaded(ListResponse::failed(ApiError::new(
            ErrorCode::Internal,
            "db down",
        ))));
        assert!(!state.loading);
        assert_eq!(state.animals.len(), 2);
        assert_eq!(toast_messages(&state).len(), 1);
    }

    #[test]
    fn submitting_create_without_name_issues_no_command() {
        let mut state = loaded_state();
        state.apply(UiAction::OpenCreate);
        state.form.species = "Dog".to_string();

        assert!(state.apply(UiAction::Submit).is_empty());
        assert_eq!(state.modal(), &ModalState::Create);
        assert_eq!(state.form.error_for(FormField::Name), Some(NAME_REQUIRED));
        assert!(!state.save_in_flight());
    }

    #[test]
    fn edit_prefills_and_cancel_discards_without_commands() {
        let mut state = loaded_state();
        assert!(state.apply(UiAction::Edit(rex())).is_empty());
        assert_eq!(state.modal().editing(), Some(&rex()));
        assert_eq!(state.form, AnimalForm::from_animal(&rex()));
        assert_eq!(state.modal().title(), "Edit Animal");

        state.form.name = "Rexy".to_string();
        assert!(state.apply(UiAction::Cancel).is_empty());
        assert_eq!(state.modal(), &ModalState::Closed);
        assert_eq!(state.form, AnimalForm::default());
        assert_eq!(state.animals[0].name, "Rex");
    }

    #[test]
    fn open_create_clears_previous_buffer() {
        let mut state = loaded_state();
        state.apply(UiAction::Edit(rex()));
        state.apply(UiAction::OpenCreate);
        assert_eq!(state.modal(), &ModalState::Create);
        assert_eq!(state.modal().submit_label(), "Add Animal");
        assert_eq!(state.form, AnimalForm::default());
    }

    #[test]
    fn successful_create_closes_modal_and_reloads_once() {
        let mut state = loaded_state();
        state.apply(UiAction::OpenCreate);
        state.form.name = "Pip".to_string();
        state.form.species = "Bird".to_string();

        let commands = state.apply(UiAction::Submit);
        assert_eq!(
            commands,
            vec![BackendCommand::CreateAnimal {
                fields: AnimalFields::new("Pip", "Bird")
            }]
        );
        assert!(state.save_in_flight());

        let created = Animal::from_fields(AnimalId::new("3"), AnimalFields::new("Pip", "Bird"));
        let commands = state.apply_event(UiEvent::SaveCompleted {
            kind: SaveKind::Create,
            response: MutationResponse::ok(created),
        });
        assert_eq!(commands, vec![BackendCommand::LoadAnimals]);
        assert_eq!(state.modal(), &ModalState::Closed);
        assert!(state.loading);
        assert!(!state.save_in_flight());
        assert_eq!(
            toast_messages(&state),
            vec![(ToastLevel::Success, ANIMAL_ADDED.to_string())]
        );
    }

    #[test]
    fn successful_update_targets_buffer_id() {
        let mut state = loaded_state();
        state.apply(UiAction::Edit(rex()));
        state.form.set_age(Some(4.0));

        let commands = state.apply(UiAction::Submit);
        let [BackendCommand::UpdateAnimal { id, fields }] = commands.as_slice() else {
            panic!("expected one update command, got {commands:?}");
        };
        assert_eq!(id, &AnimalId::new("1"));
        assert_eq!(fields.age, Some(Some(4.0)));
        assert_eq!(fields.health, Some(Some("Healthy".to_string())));

        let commands = state.apply_event(UiEvent::SaveCompleted {
            kind: SaveKind::Update,
            response: MutationResponse::ok(rex()),
        });
        assert_eq!(commands, vec![BackendCommand::LoadAnimals]);
        assert_eq!(state.modal(), &ModalState::Closed);
        assert_eq!(
            toast_messages(&state),
            vec![(ToastLevel::Success, ANIMAL_UPDATED.to_string())]
        );
    }

    #[test]
    fn unchecked_success_flag_still_closes_and_reloads() {
        let mut state = loaded_state();
        state.apply(UiAction::Edit(rex()));
        state.apply(UiAction::Submit);

        let commands = state.apply_event(UiEvent::SaveCompleted {
            kind: SaveKind::Update,
            response: MutationResponse::failed(ApiError::new(ErrorCode::Validation, "nope")),
        });
        assert_eq!(commands, vec![BackendCommand::LoadAnimals]);
        assert_eq!(state.modal(), &ModalState::Closed);
        assert_eq!(toast_messages(&state)[0].0, ToastLevel::Success);
    }

    #[test]
    fn rejected_save_keeps_modal_and_buffer_for_retry() {
        let mut state = loaded_state();
        state.apply(UiAction::Edit(rex()));
        state.form.notes = "limping".to_string();
        state.apply(UiAction::Submit);

        let commands = state.apply_event(UiEvent::SaveFailed(UiError::from_message(
            UiErrorContext::SaveAnimal,
            "connection reset",
        )));
        assert!(commands.is_empty());
        assert_eq!(state.modal().editing(), Some(&rex()));
        assert_eq!(state.form.notes, "limping");
        assert!(!state.save_in_flight());
        assert_eq!(
            toast_messages(&state),
            vec![(ToastLevel::Error, "Failed to save animal".to_string())]
        );

        assert_eq!(state.apply(UiAction::Submit).len(), 1);
    }

    #[test]
    fn double_submit_issues_a_single_save() {
        let mut state = loaded_state();
        state.apply(UiAction::OpenCreate);
        state.form.name = "Pip".to_string();
        state.form.species = "Bird".to_string();

        assert_eq!(state.apply(UiAction::Submit).len(), 1);
        assert!(state.apply(UiAction::Submit).is_empty());
    }

    #[test]
    fn confirmed_delete_toasts_and_reloads_without_remote_delete() {
        let mut state = loaded_state();
        assert!(state.apply(UiAction::RequestDelete(AnimalId::new("1"))).is_empty());
        assert_eq!(state.pending_delete(), Some(&AnimalId::new("1")));

        let commands = state.apply(UiAction::ConfirmDelete);
        assert_eq!(commands, vec![BackendCommand::LoadAnimals]);
        assert_eq!(state.pending_delete(), None);
        assert_eq!(
            toast_messages(&state),
            vec![(ToastLevel::Success, ANIMAL_DELETED.to_string())]
        );
    }

    #[test]
    fn dismissed_delete_does_nothing() {
        let mut state = loaded_state();
        state.apply(UiAction::RequestDelete(AnimalId::new("2")));
        assert!(state.apply(UiAction::DismissDelete).is_empty());
        assert!(state.apply(UiAction::ConfirmDelete).is_empty());
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn stale_save_response_closes_whatever_modal_is_open() {
        let mut state = loaded_state();
        state.apply(UiAction::OpenCreate);
        state.form.name = "Pip".to_string();
        state.form.species = "Bird".to_string();
        state.apply(UiAction::Submit);
        state.apply(UiAction::Cancel);
        state.apply(UiAction::Edit(milo()));

        state.apply_event(UiEvent::SaveCompleted {
            kind: SaveKind::Create,
            response: MutationResponse::ok(milo()),
        });
        assert_eq!(state.modal(), &ModalState::Closed);
    }

    #[test]
    fn dispatch_error_unsticks_loading_and_saving() {
        let mut state = loaded_state();
        state.apply(UiAction::Reload);
        state.apply_event(UiEvent::Error(UiError::from_message(
            UiErrorContext::LoadAnimals,
            "Backend command processor disconnected",
        )));
        assert!(!state.loading);
    }
}
