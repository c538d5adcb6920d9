//! Operation Driver
//!
//! Drives one async remote call per invocation:
//!
//! ```text
//! Idle ──run()──▶ Loading ──ok──▶ Success(value)
//!                         └─err─▶ Error(message)
//! Success | Error ──run()──▶ Loading
//! any ──reset()──▶ Idle
//! ```
//!
//! Overlapping runs are neither serialised nor cancelled; whichever finishes
//! last owns the observable.

use crate::error::ClientError;
use crate::state::{OperationState, StateCell, StateView};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct Operation<T> {
    name: &'static str,
    cell: Arc<StateCell<T>>,
}

impl<T> Operation<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: Arc::new(StateCell::new()),
        }
    }

    pub fn state(&self) -> OperationState<T> {
        self.cell.current()
    }

    pub fn subscribe(&self) -> StateView<T> {
        self.cell.subscribe()
    }

    pub fn transitions(&self) -> broadcast::Receiver<OperationState<T>> {
        self.cell.transitions()
    }

    pub fn run<F, Fut>(&self, thunk: F) -> impl Future<Output = OperationState<T>> + Send + 'static
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        self.run_with_settle(thunk, || {})
    }

    /// Publishes `Loading` before returning; the remote call starts when the
    /// returned future is first polled. `settle` runs exactly once, after the
    /// terminal state is published, whether the thunk succeeded, failed, or
    /// panicked. A future dropped before completion publishes an abandoned
    /// `Error` and still runs `settle`.
    pub fn run_with_settle<F, Fut, S>(
        &self,
        thunk: F,
        settle: S,
    ) -> impl Future<Output = OperationState<T>> + Send + 'static
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
        S: FnOnce() + Send + 'static,
    {
        self.cell.publish(OperationState::Loading);
        debug!(operation = self.name, "loading");

        let name = self.name;
        let mut guard = SettleGuard::new(name, Arc::clone(&self.cell), settle);

        async move {
            let outcome = AssertUnwindSafe(async move { thunk().await })
                .catch_unwind()
                .await;

            let state = match outcome {
                Ok(Ok(value)) => {
                    info!(operation = name, "success");
                    OperationState::Success(value)
                }
                Ok(Err(err)) => failed(name, &err),
                Err(panic) => failed(name, &ClientError::Unexpected(panic_message(&*panic))),
            };

            guard.publish(state.clone());
            drop(guard);
            state
        }
    }

    pub fn spawn<F, Fut>(&self, thunk: F) -> JoinHandle<OperationState<T>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        tokio::spawn(self.run(thunk))
    }

    /// Fire-and-forget variant for UI event handlers. `Loading` is visible
    /// before this returns.
    pub fn spawn_with_settle<F, Fut, S>(&self, thunk: F, settle: S) -> JoinHandle<OperationState<T>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
        S: FnOnce() + Send + 'static,
    {
        tokio::spawn(self.run_with_settle(thunk, settle))
    }

    pub fn reset(&self) {
        self.cell.publish(OperationState::Idle);
        debug!(operation = self.name, "reset");
    }
}

const ABANDONED: &str = "operation abandoned";

fn failed<T>(name: &'static str, err: &ClientError) -> OperationState<T> {
    warn!(operation = name, kind = ?err.kind(), error = %err, "failed");
    OperationState::Error(err.user_message())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "operation panicked".to_string()
    }
}

/// Owns the terminal publish and the settle callback for one run. Dropped
/// without a terminal state, it publishes an abandoned `Error` first.
struct SettleGuard<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: FnOnce(),
{
    name: &'static str,
    cell: Arc<StateCell<T>>,
    settle: Option<S>,
    published: bool,
}

impl<T, S> SettleGuard<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: FnOnce(),
{
    fn new(name: &'static str, cell: Arc<StateCell<T>>, settle: S) -> Self {
        Self {
            name,
            cell,
            settle: Some(settle),
            published: false,
        }
    }

    fn publish(&mut self, state: OperationState<T>) {
        self.cell.publish(state);
        self.published = true;
    }
}

impl<T, S> Drop for SettleGuard<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: FnOnce(),
{
    fn drop(&mut self) {
        if !self.published {
            let abandoned = ClientError::Unexpected(ABANDONED.to_string());
            self.cell.publish(failed(self.name, &abandoned));
        }
        if let Some(settle) = self.settle.take() {
            settle();
        }
    }
}
