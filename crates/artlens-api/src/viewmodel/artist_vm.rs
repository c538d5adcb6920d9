//! Artist ViewModel

use crate::dto::Artist;
use crate::ApiClient;
use artlens_core::{Operation, OperationState, StateView};
use std::future::Future;
use tokio::sync::broadcast;

pub struct ArtistViewModel {
    listing: Operation<Vec<Artist>>,
    client: ApiClient,
}

impl ArtistViewModel {
    pub fn new(client: ApiClient) -> Self {
        Self {
            listing: Operation::new("artists"),
            client,
        }
    }

    pub fn fetch(&self) -> impl Future<Output = OperationState<Vec<Artist>>> + Send + 'static {
        let client = self.client.clone();
        self.listing.run(move || async move { client.artists().await })
    }

    pub fn state(&self) -> OperationState<Vec<Artist>> {
        self.listing.state()
    }

    pub fn subscribe(&self) -> StateView<Vec<Artist>> {
        self.listing.subscribe()
    }

    pub fn transitions(&self) -> broadcast::Receiver<OperationState<Vec<Artist>>> {
        self.listing.transitions()
    }

    pub fn reset(&self) {
        self.listing.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{api_client, json_response, MockTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_rejected_without_message_gets_generic_text() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json_response(500, json!({}))));
        let (client, _) = api_client(transport);
        let vm = ArtistViewModel::new(client);

        let state = vm.fetch().await;

        assert_eq!(state.error_message(), Some("Request failed (HTTP 500)."));
    }
}
