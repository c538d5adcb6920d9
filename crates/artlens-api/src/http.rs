//! reqwest-backed [`Transport`] with one client per service area.

use artlens_core::{Method, RawResponse, ServiceArea, Transport, TransportError, TransportRequest};
use artlens_shared::config::ServicesSettings;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

struct Route {
    base_url: String,
    client: Client,
}

pub struct HttpTransport {
    routes: HashMap<ServiceArea, Route>,
}

impl HttpTransport {
    pub fn new(services: &ServicesSettings) -> Result<Self, TransportError> {
        Self::with_routes([
            (ServiceArea::Auth, services.auth.base_url.as_str(), services.auth.timeout()),
            (ServiceArea::Media, services.media.base_url.as_str(), services.media.timeout()),
            (
                ServiceArea::Notifications,
                services.notifications.base_url.as_str(),
                services.notifications.timeout(),
            ),
            (
                ServiceArea::Generation,
                services.generation.base_url.as_str(),
                services.generation.timeout(),
            ),
        ])
    }

    /// Build from explicit `(area, base_url, timeout)` triples. The timeout
    /// bounds connect, each read, and the whole request.
    pub fn with_routes<'a>(
        routes: impl IntoIterator<Item = (ServiceArea, &'a str, Duration)>,
    ) -> Result<Self, TransportError> {
        let mut map = HashMap::new();
        for (area, base_url, timeout) in routes {
            let client = Client::builder()
                .connect_timeout(timeout)
                .read_timeout(timeout)
                .timeout(timeout)
                .build()
                .map_err(|e| TransportError::Io(format!("Failed to build {area} client: {e}")))?;
            map.insert(
                area,
                Route {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    client,
                },
            );
        }
        Ok(Self { routes: map })
    }

    fn route(&self, area: ServiceArea) -> Result<&Route, TransportError> {
        self.routes
            .get(&area)
            .ok_or_else(|| TransportError::Io(format!("No endpoint configured for {area}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let route = self.route(request.service)?;
        let url = format!("{}{}", route.base_url, request.path);
        debug!("{} {}", request.method.as_str(), url);

        let mut builder = route.client.request(to_reqwest(request.method), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, body.content_type)
                .body(body.bytes);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;
        debug!("{} {} -> {} ({} bytes)", request.method.as_str(), url, status, body.len());

        Ok(RawResponse { status, body })
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Connect-phase timeouts count as timeouts, not unreachable hosts.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut
    } else if err.is_connect() {
        TransportError::Unreachable(err.to_string())
    } else {
        TransportError::Io(err.to_string())
    }
}
