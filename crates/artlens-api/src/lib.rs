//! # ArtLens API
//!
//! HTTP transport, endpoint DTOs, and one view model per user action.

pub mod client;
pub mod dto;
pub mod http;
pub mod state;
pub mod viewmodel;

pub use client::ApiClient;
pub use http::HttpTransport;
pub use state::AppState;

#[cfg(test)]
pub(crate) mod test_support;
