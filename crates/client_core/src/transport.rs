//! JSON-over-HTTP entity client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Animal, AnimalFields, AnimalId},
    protocol::{ListResponse, MutationResponse},
};
use tracing::debug;
use url::Url;

use crate::{
    error::{ClientError, ClientResult},
    EntityClient,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Talks to `{base}/entities/{entity}` on an external entity store.
#[derive(Debug, Clone)]
pub struct HttpEntityClient {
    http: Client,
    base_url: Url,
    entity: String,
}

impl HttpEntityClient {
    pub fn new(base_url: &str, entity: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, entity, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        entity: impl Into<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let base_url = parse_base_url(base_url)?;
        let entity = entity.into();
        let trimmed = entity.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(ClientError::InvalidEntityName(entity));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Builder)?;

        Ok(Self {
            http,
            base_url,
            entity: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub(crate) fn collection_url(&self) -> ClientResult<Url> {
        self.entity_url(None)
    }

    pub(crate) fn record_url(&self, id: &AnimalId) -> ClientResult<Url> {
        self.entity_url(Some(id))
    }

    fn entity_url(&self, id: Option<&AnimalId>) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|()| ClientError::InvalidBaseUrl {
                        url: self.base_url.to_string(),
                        reason: "url cannot carry a path".to_string(),
                    })?;
            segments.pop_if_empty().push("entities").push(&self.entity);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|err| ClientError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: "url cannot carry a path".to_string(),
        });
    }

    Ok(url)
}

#[async_trait]
impl EntityClient for HttpEntityClient {
    async fn list(&self) -> ClientResult<ListResponse<Animal>> {
        let url = self.collection_url()?;
        debug!(entity = %self.entity, %url, "listing entities");
        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<ListResponse<Animal>>()
            .await?;
        Ok(response)
    }

    async fn create(&self, fields: &AnimalFields) -> ClientResult<MutationResponse<Animal>> {
        let url = self.collection_url()?;
        debug!(entity = %self.entity, %url, "creating entity");
        let response = self
            .http
            .post(url)
            .json(fields)
            .send()
            .await?
            .error_for_status()?
            .json::<MutationResponse<Animal>>()
            .await?;
        Ok(response)
    }

    async fn update(
        &self,
        id: &AnimalId,
        fields: &AnimalFields,
    ) -> ClientResult<MutationResponse<Animal>> {
        let url = self.record_url(id)?;
        debug!(entity = %self.entity, %id, %url, "updating entity");
        let response = self
            .http
            .put(url)
            .json(fields)
            .send()
            .await?
            .error_for_status()?
            .json::<MutationResponse<Animal>>()
            .await?;
        Ok(response)
    }
}
