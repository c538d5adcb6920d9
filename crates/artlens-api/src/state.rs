//! Application state: wires transport, storage, and view models from config.

use crate::viewmodel::*;
use crate::{ApiClient, HttpTransport};
use artlens_core::{ClientError, CredentialStore, FileStore, KeyValueStore, MemoryStore, Transport};
use artlens_shared::config::AppConfig;
use std::sync::Arc;
use tracing::info;

pub struct AppState {
    pub auth: AuthViewModel,
    pub stories: StoryViewModel,
    pub sketches: SketchViewModel,
    pub artists: ArtistViewModel,
    pub critic: CriticViewModel,
    pub generation: GenerationViewModel,
    pub notifications: NotificationViewModel,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let store: Arc<dyn KeyValueStore> = match &config.storage.dir {
            Some(dir) => {
                info!("Using file store at {}", dir);
                Arc::new(FileStore::open(dir)?)
            }
            None => {
                info!("No storage dir configured, using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };
        let transport = Arc::new(HttpTransport::new(&config.services)?);
        Ok(Self::with_parts(transport, store))
    }

    pub fn with_parts(transport: Arc<dyn Transport>, store: Arc<dyn KeyValueStore>) -> Self {
        let client = ApiClient::new(transport, CredentialStore::new(Arc::clone(&store)));

        Self {
            auth: AuthViewModel::new(client.clone(), Arc::clone(&store)),
            stories: StoryViewModel::new(client.clone(), store),
            sketches: SketchViewModel::new(client.clone()),
            artists: ArtistViewModel::new(client.clone()),
            critic: CriticViewModel::new(client.clone()),
            generation: GenerationViewModel::new(client.clone()),
            notifications: NotificationViewModel::new(client),
        }
    }

    /// Leave every screen: all operations back to Idle.
    pub fn reset_all(&self) {
        self.auth.reset();
        self.stories.reset();
        self.sketches.reset();
        self.artists.reset();
        self.critic.reset();
        self.generation.reset();
        self.notifications.reset();
    }
}
