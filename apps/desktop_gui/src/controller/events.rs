//! Backend-to-UI events and error modeling for the tracker controller.

use client_core::ClientError;
use shared::{
    domain::Animal,
    protocol::{ListResponse, MutationResponse},
};

/// Which kind of save a backend response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Create,
    Update,
}

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    AnimalsLoaded(ListResponse<Animal>),
    LoadFailed(UiError),
    SaveCompleted {
        kind: SaveKind,
        response: MutationResponse<Animal>,
    },
    SaveFailed(UiError),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadAnimals,
    SaveAnimal,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("decode")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("500")
            || message_lower.contains("502")
            || message_lower.contains("503")
            || message_lower.contains("server error")
        {
            UiErrorCategory::Server
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::InvalidBaseUrl { .. } | ClientError::InvalidEntityName(_) => {
                UiErrorCategory::Validation
            }
            ClientError::Transport(inner) if inner.is_status() => UiErrorCategory::Server,
            ClientError::Transport(inner) if inner.is_decode() => UiErrorCategory::Validation,
            ClientError::Transport(_) | ClientError::Unavailable { .. } => {
                UiErrorCategory::Transport
            }
            ClientError::Builder(_) => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Generic text shown to the user; the detailed message goes to the log.
    pub fn user_message(&self) -> &'static str {
        match self.context {
            UiErrorContext::BackendStartup => "Backend worker failed to start",
            UiErrorContext::LoadAnimals => "Failed to load animals",
            UiErrorContext::SaveAnimal => "Failed to save animal",
        }
    }
}
