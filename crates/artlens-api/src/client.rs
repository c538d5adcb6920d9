//! Typed endpoint calls on top of a [`Transport`].
//!
//! Reads the stored token before each authenticated call and turns non-2xx
//! responses into `RemoteRejected` with the server's message when it has one.

use crate::dto::{self, *};
use artlens_core::{
    ClientError, CredentialStore, Method, RawResponse, RequestBody, ServiceArea, Transport,
    TransportRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub service: ServiceArea,
    pub method: Method,
    pub path: &'static str,
    pub authenticated: bool,
}

impl Endpoint {
    const fn new(service: ServiceArea, method: Method, path: &'static str, authenticated: bool) -> Self {
        Self {
            service,
            method,
            path,
            authenticated,
        }
    }
}

pub const LOGIN: Endpoint = Endpoint::new(ServiceArea::Auth, Method::Post, "/api/v1/auth/login", false);
pub const LOGOUT: Endpoint = Endpoint::new(ServiceArea::Auth, Method::Post, "/api/v1/auth/logout", true);
pub const STORIES: Endpoint = Endpoint::new(ServiceArea::Media, Method::Get, "/api/v1/stories", true);
pub const UPLOAD_STORY: Endpoint = Endpoint::new(ServiceArea::Media, Method::Post, "/api/v1/stories", true);
pub const SKETCH_SEARCH: Endpoint =
    Endpoint::new(ServiceArea::Media, Method::Post, "/api/v1/sketches/search", true);
pub const ARTISTS: Endpoint = Endpoint::new(ServiceArea::Media, Method::Get, "/api/v1/artists", true);
pub const CRITIC_ANALYZE: Endpoint =
    Endpoint::new(ServiceArea::Generation, Method::Post, "/api/v1/critic/analyze", true);
pub const GENERATE: Endpoint = Endpoint::new(ServiceArea::Generation, Method::Post, "/api/v1/generate", true);
pub const NOTIFICATIONS: Endpoint =
    Endpoint::new(ServiceArea::Notifications, Method::Get, "/api/v1/notifications", true);

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: CredentialStore,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, credentials: CredentialStore) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.call(LOGIN, Some(request)).await
    }

    /// Tells the server the session is over. The response body is ignored.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.send(LOGOUT, None).await.map(|_| ())
    }

    pub async fn stories(&self) -> Result<Vec<Story>, ClientError> {
        let list: StoryList = self.call(STORIES, None::<&()>).await?;
        Ok(list.stories)
    }

    pub async fn upload_story(&self, request: &UploadStoryRequest) -> Result<Story, ClientError> {
        self.call(UPLOAD_STORY, Some(request)).await
    }

    pub async fn search_sketches(&self, query: &SketchQuery) -> Result<Vec<SketchMatch>, ClientError> {
        let found: SketchMatches = self.call(SKETCH_SEARCH, Some(query)).await?;
        Ok(found.matches)
    }

    pub async fn artists(&self) -> Result<Vec<Artist>, ClientError> {
        let list: ArtistList = self.call(ARTISTS, None::<&()>).await?;
        Ok(list.artists)
    }

    pub async fn analyze(&self, request: &CritiqueRequest) -> Result<Critique, ClientError> {
        self.call(CRITIC_ANALYZE, Some(request)).await
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage, ClientError> {
        self.call(GENERATE, Some(request)).await
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        let list: NotificationList = self.call(NOTIFICATIONS, None::<&()>).await?;
        Ok(list.notifications)
    }

    async fn call<B, R>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = body
            .map(RequestBody::json)
            .transpose()
            .map_err(|e| ClientError::Unexpected(format!("Failed to encode request: {e}")))?;
        let response = self.send(endpoint, body).await?;
        Ok(dto::decode(endpoint.path, &response.body)?)
    }

    async fn send(&self, endpoint: Endpoint, body: Option<RequestBody>) -> Result<RawResponse, ClientError> {
        let mut request = TransportRequest::new(endpoint.service, endpoint.method, endpoint.path)
            .header("Accept", "application/json");

        if endpoint.authenticated {
            match self.credentials.token()? {
                Some(token) => request = request.bearer(&token),
                None => debug!("No stored token for {}", endpoint.path),
            }
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            warn!(
                "{} {} rejected with HTTP {}",
                endpoint.method.as_str(),
                endpoint.path,
                response.status
            );
            return Err(ClientError::RemoteRejected {
                status: response.status,
                message: dto::server_message(&response.body),
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{api_client, json_response, MockTransport};
    use artlens_core::{CredentialRecord, FailureKind, TransportError};
    use serde_json::json;

    #[tokio::test]
    async fn test_bearer_attached_when_logged_in() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.path == "/api/v1/artists"
                    && req.service == ServiceArea::Media
                    && req
                        .headers
                        .iter()
                        .any(|(k, v)| k == "Authorization" && v == "Bearer tok-9")
            })
            .times(1)
            .returning(|_| Ok(json_response(200, json!({"artists": [{"id": "a1", "name": "Hokusai"}]}))));

        let (client, _) = api_client(transport);
        client
            .credentials()
            .save(&CredentialRecord {
                token: "tok-9".into(),
                remember: false,
            })
            .unwrap();

        let artists = client.artists().await.unwrap();
        assert_eq!(artists.len(), 1);
        assert_eq!(artists[0].name, "Hokusai");
    }

    #[tokio::test]
    async fn test_login_never_sends_token() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.service == ServiceArea::Auth
                    && req.body.is_some()
                    && !req.headers.iter().any(|(k, _)| k == "Authorization")
            })
            .times(1)
            .returning(|_| Ok(json_response(200, json!({"access_token": "new"}))));

        let (client, _) = api_client(transport);
        client
            .credentials()
            .save(&CredentialRecord {
                token: "stale".into(),
                remember: true,
            })
            .unwrap();

        let response = client
            .login(&LoginRequest {
                username: "mia".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.access_token, "new");
    }

    #[tokio::test]
    async fn test_rejection_carries_server_message() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json_response(401, json!({"detail": "Token expired"}))));

        let (client, _) = api_client(transport);
        let err = client.stories().await.unwrap_err();

        assert_eq!(err.kind(), FailureKind::RemoteRejected);
        assert_eq!(err.user_message(), "Token expired");
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_decode_error() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json_response(200, json!({"items": []}))));

        let (client, _) = api_client(transport);
        let err = client.notifications().await.unwrap_err();

        assert!(matches!(err, ClientError::Decode(ref e) if e.endpoint == "/api/v1/notifications"));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Err(TransportError::TimedOut));

        let (client, _) = api_client(transport);
        let err = client
            .generate(&GenerationRequest {
                prompt: "a fox".into(),
                style: None,
                source_image_base64: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::TimedOut);
    }
}
