use crate::ApiClient;
use artlens_core::{
    CredentialStore, MemoryStore, RawResponse, Transport, TransportError, TransportRequest,
};
use std::sync::Arc;

mockall::mock! {
    pub Transport {}

    #[async_trait::async_trait]
    impl Transport for Transport {
        async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;
    }
}

pub fn json_response(status: u16, body: serde_json::Value) -> RawResponse {
    RawResponse {
        status,
        body: serde_json::to_vec(&body).unwrap().into(),
    }
}

pub fn api_client(transport: MockTransport) -> (ApiClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let credentials = CredentialStore::new(store.clone());
    (ApiClient::new(Arc::new(transport), credentials), store)
}
