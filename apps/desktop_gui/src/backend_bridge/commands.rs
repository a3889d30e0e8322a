//! Backend commands queued from UI to backend worker.

use shared::domain::{AnimalFields, AnimalId};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    LoadAnimals,
    CreateAnimal { fields: AnimalFields },
    UpdateAnimal { id: AnimalId, fields: AnimalFields },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadAnimals => "load_animals",
            BackendCommand::CreateAnimal { .. } => "create_animal",
            BackendCommand::UpdateAnimal { .. } => "update_animal",
        }
    }
}
