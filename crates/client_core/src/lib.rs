use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{Animal, AnimalFields, AnimalId},
    protocol::{ListResponse, MutationResponse},
};

pub mod error;
mod memory;
pub mod transport;

pub use error::{ClientError, ClientResult};
pub use memory::{EntityCall, EntityOperation, InMemoryEntityClient};
pub use transport::{HttpEntityClient, DEFAULT_REQUEST_TIMEOUT};

/// Data-access contract of the external animal entity store.
///
/// `Err` means the call was rejected (network, status, decode); a resolved
/// envelope may still carry `success: false`.
#[async_trait]
pub trait EntityClient: Send + Sync {
    async fn list(&self) -> ClientResult<ListResponse<Animal>>;
    async fn create(&self, fields: &AnimalFields) -> ClientResult<MutationResponse<Animal>>;
    async fn update(
        &self,
        id: &AnimalId,
        fields: &AnimalFields,
    ) -> ClientResult<MutationResponse<Animal>>;
}

pub type SharedEntityClient = Arc<dyn EntityClient>;

/// Stand-in used when no real client could be configured; every call rejects.
pub struct MissingEntityClient {
    reason: String,
}

impl MissingEntityClient {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable<T>(&self, operation: &'static str) -> ClientResult<T> {
        Err(ClientError::Unavailable {
            operation,
            message: self.reason.clone(),
        })
    }
}

#[async_trait]
impl EntityClient for MissingEntityClient {
    async fn list(&self) -> ClientResult<ListResponse<Animal>> {
        self.unavailable("list")
    }

    async fn create(&self, _fields: &AnimalFields) -> ClientResult<MutationResponse<Animal>> {
        self.unavailable("create")
    }

    async fn update(
        &self,
        _id: &AnimalId,
        _fields: &AnimalFields,
    ) -> ClientResult<MutationResponse<Animal>> {
        self.unavailable("update")
    }
}

#[async_trait]
impl<T> EntityClient for Arc<T>
where
    T: EntityClient + ?Sized,
{
    async fn list(&self) -> ClientResult<ListResponse<Animal>> {
        (**self).list().await
    }

    async fn create(&self, fields: &AnimalFields) -> ClientResult<MutationResponse<Animal>> {
        (**self).create(fields).await
    }

    async fn update(
        &self,
        id: &AnimalId,
        fields: &AnimalFields,
    ) -> ClientResult<MutationResponse<Animal>> {
        (**self).update(id, fields).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
