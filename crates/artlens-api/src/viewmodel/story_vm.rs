//! Story ViewModel
//!
//! Story feed with a local copy of the last good fetch, plus story upload.

use crate::dto::{encode_image, Story, UploadStoryRequest};
use crate::ApiClient;
use artlens_core::{
    ClientError, KeyValueStore, Operation, OperationState, Partition, StateView, StoreError,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

const STORY_CACHE_KEY: &str = "stories.cache";

/// Forget the cached feed so the next user never sees it.
pub(crate) fn invalidate_cache(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.delete(Partition::App, STORY_CACHE_KEY)
}

pub struct StoryViewModel {
    feed: Operation<Vec<Story>>,
    upload: Operation<Story>,
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
}

impl StoryViewModel {
    pub fn new(client: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            feed: Operation::new("stories"),
            upload: Operation::new("upload_story"),
            client,
            store,
        }
    }

    /// Fetch the feed. A successful result also replaces the cached copy;
    /// failing to write the cache does not fail the fetch.
    pub fn fetch(&self) -> impl Future<Output = OperationState<Vec<Story>>> + Send + 'static {
        let client = self.client.clone();
        let store = Arc::clone(&self.store);

        self.feed.run(move || async move {
            let stories = client.stories().await?;
            match serde_json::to_string(&stories) {
                Ok(json) => {
                    if let Err(e) = store.set(Partition::App, STORY_CACHE_KEY, &json) {
                        warn!("Failed to cache stories: {}", e);
                    }
                }
                Err(e) => warn!("Failed to serialize stories for cache: {}", e),
            }
            debug!("Fetched {} stories", stories.len());
            Ok(stories)
        })
    }

    /// Last successfully fetched feed, for showing something while offline.
    pub fn cached(&self) -> Option<Vec<Story>> {
        let json = match self.store.get(Partition::App, STORY_CACHE_KEY) {
            Ok(json) => json?,
            Err(e) => {
                warn!("Failed to read story cache: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(stories) => Some(stories),
            Err(e) => {
                warn!("Discarding unreadable story cache: {}", e);
                None
            }
        }
    }

    pub fn upload(
        &self,
        caption: Option<String>,
        image: Vec<u8>,
    ) -> impl Future<Output = OperationState<Story>> + Send + 'static {
        let client = self.client.clone();

        self.upload.run(move || async move {
            if image.is_empty() {
                return Err(ClientError::Invalid("Pick an image to upload".to_string()));
            }
            let request = UploadStoryRequest {
                caption: caption.filter(|c| !c.trim().is_empty()),
                image_base64: encode_image(&image),
            };
            client.upload_story(&request).await
        })
    }

    pub fn state(&self) -> OperationState<Vec<Story>> {
        self.feed.state()
    }

    pub fn subscribe(&self) -> StateView<Vec<Story>> {
        self.feed.subscribe()
    }

    pub fn transitions(&self) -> broadcast::Receiver<OperationState<Vec<Story>>> {
        self.feed.transitions()
    }

    pub fn upload_state(&self) -> OperationState<Story> {
        self.upload.state()
    }

    pub fn subscribe_upload(&self) -> StateView<Story> {
        self.upload.subscribe()
    }

    pub fn reset(&self) {
        self.feed.reset();
        self.upload.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{api_client, json_response, MockTransport};
    use artlens_core::error::UNREACHABLE_MESSAGE;
    use artlens_core::TransportError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn three_stories() -> serde_json::Value {
        json!({"stories": [
            {"id": "1", "author": "mia", "image_url": "http://img/1"},
            {"id": "2", "author": "leo", "image_url": "http://img/2", "likes": 4},
            {"id": "3", "author": "ana", "image_url": "http://img/3", "caption": "dusk"}
        ]})
    }

    #[tokio::test]
    async fn test_success_then_unreachable() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut transport = MockTransport::new();
        transport.expect_send().times(2).returning(move |_| {
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(json_response(200, three_stories()))
            } else {
                Err(TransportError::Unreachable("no route to host".into()))
            }
        });
        let (client, store) = api_client(transport);
        let vm = StoryViewModel::new(client, store);
        let mut rx = vm.transitions();
        assert!(vm.state().is_idle());

        vm.fetch().await;
        vm.fetch().await;

        assert_eq!(rx.try_recv().unwrap(), OperationState::Loading);
        match rx.try_recv().unwrap() {
            OperationState::Success(stories) => assert_eq!(stories.len(), 3),
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(rx.try_recv().unwrap(), OperationState::Loading);
        assert_eq!(
            rx.try_recv().unwrap(),
            OperationState::Error(UNREACHABLE_MESSAGE.to_string())
        );

        // the failed refresh leaves the last good feed in the cache
        assert_eq!(vm.cached().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_no_cache_before_first_fetch() {
        let (client, store) = api_client(MockTransport::new());
        let vm = StoryViewModel::new(client, store);
        assert!(vm.cached().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_cache() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json_response(200, three_stories())));
        let (client, store) = api_client(transport);
        let vm = StoryViewModel::new(client, store.clone());
        vm.fetch().await;
        assert!(vm.cached().is_some());

        invalidate_cache(store.as_ref()).unwrap();

        assert!(vm.cached().is_none());
        // nothing cached is not an error
        invalidate_cache(store.as_ref()).unwrap();
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_image() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();
        let (client, store) = api_client(transport);
        let vm = StoryViewModel::new(client, store);

        let state = vm.upload(Some("hi".into()), Vec::new()).await;

        assert_eq!(state.error_message(), Some("Pick an image to upload"));
    }

    #[tokio::test]
    async fn test_upload_returns_created_story() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path == "/api/v1/stories" && req.body.is_some())
            .returning(|_| {
                Ok(json_response(
                    201,
                    json!({"id": "9", "author": "mia", "image_url": "http://img/9"}),
                ))
            });
        let (client, store) = api_client(transport);
        let vm = StoryViewModel::new(client, store);

        let state = vm.upload(Some("   ".into()), vec![1, 2, 3]).await;

        assert_eq!(state.value().map(|s| s.id.as_str()), Some("9"));
        assert_eq!(vm.upload_state(), state);
    }
}
