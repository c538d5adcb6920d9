//! Failure taxonomy and user-facing messages.

use crate::store::StoreError;
use crate::transport::TransportError;
use thiserror::Error;

pub const UNREACHABLE_MESSAGE: &str = "Cannot reach server. Check your connection and try again.";
pub const TIMEOUT_MESSAGE: &str = "Connection timeout. Please try again.";

/// Coarse classification used for the Error message. Never changes control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unreachable,
    TimedOut,
    RemoteRejected,
    Unexpected,
}

/// Response body did not match the endpoint's schema.
#[derive(Error, Debug)]
#[error("Failed to decode response from {endpoint}: {reason}")]
pub struct DecodeError {
    pub endpoint: String,
    pub reason: String,
}

impl DecodeError {
    pub fn new(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Server rejected request (HTTP {status})")]
    RemoteRejected {
        status: u16,
        message: Option<String>,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Local validation failed before anything was sent.
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Unexpected(String),
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Transport(TransportError::Unreachable(_)) => FailureKind::Unreachable,
            ClientError::Transport(TransportError::TimedOut) => FailureKind::TimedOut,
            ClientError::RemoteRejected { .. } => FailureKind::RemoteRejected,
            _ => FailureKind::Unexpected,
        }
    }

    /// Short, human-readable text for the Error state. Never empty.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(TransportError::Unreachable(_)) => UNREACHABLE_MESSAGE.into(),
            ClientError::Transport(TransportError::TimedOut) => TIMEOUT_MESSAGE.into(),
            ClientError::RemoteRejected { status, message } => match message {
                Some(message) if !message.trim().is_empty() => message.clone(),
                _ => format!("Request failed (HTTP {status})."),
            },
            ClientError::Invalid(message) if !message.trim().is_empty() => message.clone(),
            other => format!("Something went wrong: {other}"),
        }
    }
}
