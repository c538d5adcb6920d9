//! # ArtLens Core
//!
//! Request lifecycle for every user action in the client: an [`Operation`]
//! drives one remote call through `Idle → Loading → Success | Error` and
//! publishes each step to read-only observers. Transport and persistence are
//! consumed through the [`Transport`] and [`KeyValueStore`] traits.

pub mod credentials;
pub mod error;
pub mod operation;
pub mod state;
pub mod store;
pub mod transport;

pub use credentials::{CredentialRecord, CredentialStore};
pub use error::{ClientError, DecodeError, FailureKind};
pub use operation::Operation;
pub use state::{OperationState, StateView};
pub use store::{FileStore, KeyValueStore, MemoryStore, Partition, StoreError};
pub use transport::{
    Method, RawResponse, RequestBody, ServiceArea, Transport, TransportError, TransportRequest,
};
