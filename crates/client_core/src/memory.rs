//! Process-local entity store used for offline runs and tests.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use shared::{
    domain::{Animal, AnimalFields, AnimalId},
    error::{ApiError, ErrorCode},
    protocol::{ListResponse, MutationResponse},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::{ClientError, ClientResult},
    EntityClient,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityOperation {
    List,
    Create,
    Update,
}

impl EntityOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityOperation::List => "list",
            EntityOperation::Create => "create",
            EntityOperation::Update => "update",
        }
    }
}

/// One call observed by [`InMemoryEntityClient`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityCall {
    List,
    Create(AnimalFields),
    Update(AnimalId, AnimalFields),
}

#[derive(Debug, Clone)]
enum Injected {
    Reject(String),
    Unsuccessful(String),
}

#[derive(Default)]
struct MemoryState {
    records: Vec<Animal>,
    calls: Vec<EntityCall>,
    injected: HashMap<EntityOperation, VecDeque<Injected>>,
}

impl MemoryState {
    fn take_injected(&mut self, op: EntityOperation) -> Option<Injected> {
        self.injected.get_mut(&op).and_then(VecDeque::pop_front)
    }
}

#[derive(Default)]
pub struct InMemoryEntityClient {
    state: Mutex<MemoryState>,
}

impl InMemoryEntityClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Animal>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records,
                ..MemoryState::default()
            }),
        }
    }

    pub async fn records(&self) -> Vec<Animal> {
        self.state.lock().await.records.clone()
    }

    pub async fn calls(&self) -> Vec<EntityCall> {
        self.state.lock().await.calls.clone()
    }

    /// The next `op` call fails as if the store were unreachable.
    pub async fn reject_next(&self, op: EntityOperation, message: impl Into<String>) {
        self.inject(op, Injected::Reject(message.into())).await;
    }

    /// The next `op` call resolves with `success: false`.
    pub async fn fail_next(&self, op: EntityOperation, message: impl Into<String>) {
        self.inject(op, Injected::Unsuccessful(message.into())).await;
    }

    async fn inject(&self, op: EntityOperation, injected: Injected) {
        self.state
            .lock()
            .await
            .injected
            .entry(op)
            .or_default()
            .push_back(injected);
    }
}

#[async_trait]
impl EntityClient for InMemoryEntityClient {
    async fn list(&self) -> ClientResult<ListResponse<Animal>> {
        let mut state = self.state.lock().await;
        state.calls.push(EntityCall::List);
        match state.take_injected(EntityOperation::List) {
            Some(Injected::Reject(message)) => Err(ClientError::Unavailable {
                operation: EntityOperation::List.as_str(),
                message,
            }),
            Some(Injected::Unsuccessful(message)) => Ok(ListResponse::failed(ApiError::new(
                ErrorCode::Internal,
                message,
            ))),
            None => Ok(ListResponse::ok(state.records.clone())),
        }
    }

    async fn create(&self, fields: &AnimalFields) -> ClientResult<MutationResponse<Animal>> {
        let mut state = self.state.lock().await;
        state.calls.push(EntityCall::Create(fields.clone()));
        match state.take_injected(EntityOperation::Create) {
            Some(Injected::Reject(message)) => Err(ClientError::Unavailable {
                operation: EntityOperation::Create.as_str(),
                message,
            }),
            Some(Injected::Unsuccessful(message)) => Ok(MutationResponse::failed(
                ApiError::new(ErrorCode::Validation, message),
            )),
            None => {
                let id = AnimalId::new(Uuid::new_v4().to_string());
                let animal = Animal::from_fields(id, fields.clone());
                state.records.push(animal.clone());
                Ok(MutationResponse::ok(animal))
            }
        }
    }

    async fn update(
        &self,
        id: &AnimalId,
        fields: &AnimalFields,
    ) -> ClientResult<MutationResponse<Animal>> {
        let mut state = self.state.lock().await;
        state.calls.push(EntityCall::Update(id.clone(), fields.clone()));
        match state.take_injected(EntityOperation::Update) {
            Some(Injected::Reject(message)) => Err(ClientError::Unavailable {
                operation: EntityOperation::Update.as_str(),
                message,
            }),
            Some(Injected::Unsuccessful(message)) => Ok(MutationResponse::failed(
                ApiError::new(ErrorCode::Validation, message),
            )),
            None => match state.records.iter_mut().find(|animal| &animal.id == id) {
                Some(animal) => {
                    animal.apply_fields(fields);
                    Ok(MutationResponse::ok(animal.clone()))
                }
                None => Ok(MutationResponse::failed(ApiError::new(
                    ErrorCode::NotFound,
                    format!("animal {id} not found"),
                ))),
            },
        }
    }
}
