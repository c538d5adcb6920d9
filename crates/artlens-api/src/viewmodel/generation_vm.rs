//! Generation ViewModel
//!
//! Prompt-driven image generation, optionally seeded from a source image.

use crate::dto::{encode_image, GeneratedImage, GenerationRequest};
use crate::ApiClient;
use artlens_core::{ClientError, Operation, OperationState, StateView};
use std::future::Future;
use tokio::sync::broadcast;

pub struct GenerationViewModel {
    generation: Operation<GeneratedImage>,
    client: ApiClient,
}

impl GenerationViewModel {
    pub fn new(client: ApiClient) -> Self {
        Self {
            generation: Operation::new("generate"),
            client,
        }
    }

    pub fn generate(
        &self,
        prompt: String,
        style: Option<String>,
        source_image: Option<Vec<u8>>,
    ) -> impl Future<Output = OperationState<GeneratedImage>> + Send + 'static {
        let client = self.client.clone();

        self.generation.run(move || async move {
            let prompt = prompt.trim().to_string();
            if prompt.is_empty() {
                return Err(ClientError::Invalid("Describe the image you want".to_string()));
            }
            let request = GenerationRequest {
                prompt,
                style,
                source_image_base64: source_image
                    .filter(|img| !img.is_empty())
                    .map(|img| encode_image(&img)),
            };
            client.generate(&request).await
        })
    }

    pub fn state(&self) -> OperationState<GeneratedImage> {
        self.generation.state()
    }

    pub fn subscribe(&self) -> StateView<GeneratedImage> {
        self.generation.subscribe()
    }

    pub fn transitions(&self) -> broadcast::Receiver<OperationState<GeneratedImage>> {
        self.generation.transitions()
    }

    pub fn reset(&self) {
        self.generation.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{api_client, MockTransport};
    use artlens_core::error::TIMEOUT_MESSAGE;
    use artlens_core::TransportError;

    #[tokio::test]
    async fn test_timeout_message() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Err(TransportError::TimedOut));
        let (client, _) = api_client(transport);
        let vm = GenerationViewModel::new(client);

        let state = vm.generate("a fox in snow".into(), None, None).await;

        assert_eq!(state.error_message(), Some(TIMEOUT_MESSAGE));
    }

    #[tokio::test]
    async fn test_blank_prompt_is_invalid() {
        let (client, _) = api_client(MockTransport::new());
        let vm = GenerationViewModel::new(client);

        let state = vm.generate("   ".into(), None, None).await;

        assert_eq!(state.error_message(), Some("Describe the image you want"));
    }
}
