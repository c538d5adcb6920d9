//! Notification ViewModel

use crate::dto::Notification;
use crate::ApiClient;
use artlens_core::{Operation, OperationState, StateView};
use std::future::Future;
use tokio::sync::broadcast;

pub struct NotificationViewModel {
    inbox: Operation<Vec<Notification>>,
    client: ApiClient,
}

impl NotificationViewModel {
    pub fn new(client: ApiClient) -> Self {
        Self {
            inbox: Operation::new("notifications"),
            client,
        }
    }

    pub fn fetch(&self) -> impl Future<Output = OperationState<Vec<Notification>>> + Send + 'static {
        let client = self.client.clone();
        self.inbox.run(move || async move { client.notifications().await })
    }

    pub fn unread_count(&self) -> usize {
        self.inbox
            .state()
            .value()
            .map(|items| items.iter().filter(|n| !n.read).count())
            .unwrap_or(0)
    }

    pub fn state(&self) -> OperationState<Vec<Notification>> {
        self.inbox.state()
    }

    pub fn subscribe(&self) -> StateView<Vec<Notification>> {
        self.inbox.subscribe()
    }

    pub fn transitions(&self) -> broadcast::Receiver<OperationState<Vec<Notification>>> {
        self.inbox.transitions()
    }

    pub fn reset(&self) {
        self.inbox.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{api_client, json_response, MockTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_unread_count() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| {
            Ok(json_response(
                200,
                json!({"notifications": [
                    {"id": "n1", "message": "leo liked your story"},
                    {"id": "n2", "message": "new follower", "read": true}
                ]}),
            ))
        });
        let (client, _) = api_client(transport);
        let vm = NotificationViewModel::new(client);
        assert_eq!(vm.unread_count(), 0);

        vm.fetch().await;

        assert_eq!(vm.unread_count(), 1);
        vm.reset();
        assert_eq!(vm.unread_count(), 0);
    }
}
