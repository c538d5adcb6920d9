//! Transport seam. The HTTP implementation lives in `artlens-api`.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Logical backend, each with its own base endpoint and timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceArea {
    Auth,
    Media,
    Notifications,
    Generation,
}

impl ServiceArea {
    pub const ALL: [ServiceArea; 4] = [
        ServiceArea::Auth,
        ServiceArea::Media,
        ServiceArea::Notifications,
        ServiceArea::Generation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceArea::Auth => "auth",
            ServiceArea::Media => "media",
            ServiceArea::Notifications => "notifications",
            ServiceArea::Generation => "generation",
        }
    }
}

impl fmt::Display for ServiceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestBody {
    pub content_type: String,
    pub bytes: Bytes,
}

impl RequestBody {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content_type: "application/json".to_string(),
            bytes: Bytes::from(serde_json::to_vec(value)?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub service: ServiceArea,
    pub method: Method,
    /// Path relative to the service base URL, starting with `/`.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl TransportRequest {
    pub fn new(service: ServiceArea, method: Method, path: impl Into<String>) -> Self {
        Self {
            service,
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Error, Debug, Clone)]
pub enum TransportError {
    #[error("Host unreachable: {0}")]
    Unreachable(String),

    #[error("Request timed out")]
    TimedOut,

    #[error("Transport failure: {0}")]
    Io(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;
}
