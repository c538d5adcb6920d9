//! Auth ViewModel
//!
//! Login form state plus the login/logout operations.

use super::story_vm::invalidate_cache;
use crate::dto::{LoginRequest, LoginResponse};
use crate::ApiClient;
use artlens_core::{
    ClientError, CredentialRecord, KeyValueStore, Operation, OperationState, StateView, StoreError,
};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

pub const CREDENTIALS_REQUIRED: &str = "Username and password are required";

pub struct AuthViewModel {
    pub username: String,
    pub password: String,
    pub remember: bool,
    login: Operation<LoginResponse>,
    logout: Operation<()>,
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
}

impl AuthViewModel {
    pub fn new(client: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            username: String::with_capacity(100),
            password: String::with_capacity(100),
            remember: false,
            login: Operation::new("login"),
            logout: Operation::new("logout"),
            client,
            store,
        }
    }

    /// Validates inside the operation, so an empty form still goes
    /// Loading → Error. The token is persisted before Success is published.
    pub fn login(&self) -> impl Future<Output = OperationState<LoginResponse>> + Send + 'static {
        let client = self.client.clone();
        let username = self.username.trim().to_string();
        let password = self.password.clone();
        let remember = self.remember;

        self.login.run(move || async move {
            if username.is_empty() || password.is_empty() {
                return Err(ClientError::Invalid(CREDENTIALS_REQUIRED.to_string()));
            }

            let response = client.login(&LoginRequest { username, password }).await?;
            client.credentials().save(&CredentialRecord {
                token: response.access_token.clone(),
                remember,
            })?;
            info!("Login successful");
            Ok(response)
        })
    }

    /// Always ends in `Success(())`. The remote call is best-effort, even
    /// if it panics; the settle step clears local credentials and cached
    /// user data whatever the server says.
    pub fn logout(&self) -> impl Future<Output = OperationState<()>> + Send + 'static {
        let client = self.client.clone();
        let credentials = self.client.credentials().clone();
        let store = Arc::clone(&self.store);

        self.logout.run_with_settle(
            move || async move {
                match AssertUnwindSafe(client.logout()).catch_unwind().await {
                    Ok(Ok(())) => info!("Logged out"),
                    Ok(Err(e)) => {
                        warn!("Remote logout failed, clearing local session anyway: {}", e)
                    }
                    Err(_) => error!("Remote logout panicked, clearing local session anyway"),
                }
                Ok(())
            },
            move || {
                if let Err(e) = credentials.clear() {
                    error!("Failed to clear credentials: {}", e);
                }
                if let Err(e) = invalidate_cache(store.as_ref()) {
                    error!("Failed to clear story cache: {}", e);
                }
            },
        )
    }

    /// Remembered session from a previous launch, if any.
    pub fn restore_session(&self) -> Result<Option<CredentialRecord>, StoreError> {
        self.client.credentials().restore()
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.client.credentials().token(), Ok(Some(_)))
    }

    /// Drop the password once it is no longer needed by the form.
    pub fn clear_password(&mut self) {
        self.password.clear();
        self.password.shrink_to_fit();
    }

    pub fn login_state(&self) -> OperationState<LoginResponse> {
        self.login.state()
    }

    pub fn logout_state(&self) -> OperationState<()> {
        self.logout.state()
    }

    pub fn subscribe_login(&self) -> StateView<LoginResponse> {
        self.login.subscribe()
    }

    pub fn subscribe_logout(&self) -> StateView<()> {
        self.logout.subscribe()
    }

    pub fn login_transitions(&self) -> broadcast::Receiver<OperationState<LoginResponse>> {
        self.login.transitions()
    }

    pub fn logout_transitions(&self) -> broadcast::Receiver<OperationState<()>> {
        self.logout.transitions()
    }

    /// Back to Idle, e.g. when the login screen is left.
    pub fn reset(&self) {
        self.login.reset();
        self.logout.reset();
    }
}
