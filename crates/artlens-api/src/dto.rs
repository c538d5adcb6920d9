//! Request and response envelopes per endpoint.
//!
//! Required fields are plain, optional ones carry `#[serde(default)]`. A body
//! that does not fit is a [`DecodeError`], never a half-filled struct.

use artlens_core::DecodeError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

// ============================================================================
// Media
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub author: String,
    pub image_url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub likes: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryList {
    pub stories: Vec<Story>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadStoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub image_base64: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SketchQuery {
    pub image_base64: String,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SketchMatch {
    pub id: String,
    pub image_url: String,
    pub score: f32,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SketchMatches {
    pub matches: Vec<SketchMatch>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistList {
    pub artists: Vec<Artist>,
}

// ============================================================================
// Generation
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CritiqueRequest {
    pub image_base64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Critique {
    pub summary: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image_base64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedImage {
    pub image_url: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
}

// ============================================================================
// Helpers
// ============================================================================

pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(body).map_err(|e| DecodeError::new(endpoint, e))
}

/// Pull a human-readable message out of an error body, if the server sent one.
/// Accepts `{"message": ..}`, `{"detail": ..}` or `{"error": ..}`.
pub fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .find_map(|key| value.get(key)?.as_str().map(str::to_string))
        .filter(|m| !m.trim().is_empty())
}

pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
