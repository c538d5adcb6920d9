//! Sketch ViewModel
//!
//! Reverse image search from a drawn sketch.

use crate::dto::{encode_image, SketchMatch, SketchQuery};
use crate::ApiClient;
use artlens_core::{ClientError, Operation, OperationState, StateView};
use std::future::Future;
use tokio::sync::broadcast;

pub const DEFAULT_MATCH_LIMIT: u32 = 20;

pub struct SketchViewModel {
    search: Operation<Vec<SketchMatch>>,
    client: ApiClient,
}

impl SketchViewModel {
    pub fn new(client: ApiClient) -> Self {
        Self {
            search: Operation::new("sketch_search"),
            client,
        }
    }

    /// `sketch` is the encoded canvas (PNG). A zero limit falls back to the default.
    pub fn search(
        &self,
        sketch: Vec<u8>,
        limit: u32,
    ) -> impl Future<Output = OperationState<Vec<SketchMatch>>> + Send + 'static {
        let client = self.client.clone();

        self.search.run(move || async move {
            if sketch.is_empty() {
                return Err(ClientError::Invalid("Draw something before searching".to_string()));
            }
            let query = SketchQuery {
                image_base64: encode_image(&sketch),
                limit: if limit == 0 { DEFAULT_MATCH_LIMIT } else { limit },
            };
            client.search_sketches(&query).await
        })
    }

    pub fn state(&self) -> OperationState<Vec<SketchMatch>> {
        self.search.state()
    }

    pub fn subscribe(&self) -> StateView<Vec<SketchMatch>> {
        self.search.subscribe()
    }

    pub fn transitions(&self) -> broadcast::Receiver<OperationState<Vec<SketchMatch>>> {
        self.search.transitions()
    }

    pub fn reset(&self) {
        self.search.reset();
    }
}
