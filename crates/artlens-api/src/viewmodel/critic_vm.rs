//! Critic ViewModel
//!
//! AI art-critic analysis of a single image. Runs on the generation service,
//! so expect long round trips.

use crate::dto::{encode_image, Critique, CritiqueRequest};
use crate::ApiClient;
use artlens_core::{ClientError, Operation, OperationState, StateView};
use std::future::Future;
use tokio::sync::broadcast;

pub struct CriticViewModel {
    analysis: Operation<Critique>,
    client: ApiClient,
}

impl CriticViewModel {
    pub fn new(client: ApiClient) -> Self {
        Self {
            analysis: Operation::new("critic_analyze"),
            client,
        }
    }

    pub fn analyze(
        &self,
        image: Vec<u8>,
        focus: Option<String>,
    ) -> impl Future<Output = OperationState<Critique>> + Send + 'static {
        let client = self.client.clone();

        self.analysis.run(move || async move {
            if image.is_empty() {
                return Err(ClientError::Invalid("Pick an artwork to analyze".to_string()));
            }
            let request = CritiqueRequest {
                image_base64: encode_image(&image),
                focus,
            };
            client.analyze(&request).await
        })
    }

    pub fn state(&self) -> OperationState<Critique> {
        self.analysis.state()
    }

    pub fn subscribe(&self) -> StateView<Critique> {
        self.analysis.subscribe()
    }

    pub fn transitions(&self) -> broadcast::Receiver<OperationState<Critique>> {
        self.analysis.transitions()
    }

    pub fn reset(&self) {
        self.analysis.reset();
    }
}
