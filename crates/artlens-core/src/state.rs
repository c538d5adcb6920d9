//! Observable Operation State
//!
//! Single-writer cell: the owning [`Operation`](crate::Operation) publishes,
//! everyone else reads through a [`StateView`] or the ordered transition stream.
//!
//! The cell itself is private to the crate:
//!
//! ```compile_fail
//! use artlens_core::state::StateCell;
//! ```

use artlens_shared::constants::TRANSITION_CHANNEL_CAPACITY;
use tokio::sync::{broadcast, watch};

/// Lifecycle of one remote call as seen by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> OperationState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Success or Error. Stays terminal until the next run or reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success(_) => "success",
            Self::Error(_) => "error",
        }
    }
}

pub(crate) struct StateCell<T> {
    latest: watch::Sender<OperationState<T>>,
    transitions: broadcast::Sender<OperationState<T>>,
}

impl<T> StateCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        let (latest, _) = watch::channel(OperationState::Idle);
        let (transitions, _) = broadcast::channel(TRANSITION_CHANNEL_CAPACITY);
        Self {
            latest,
            transitions,
        }
    }

    pub(crate) fn publish(&self, state: OperationState<T>) {
        self.latest.send_replace(state.clone());
        // No transition subscribers is the normal case outside tests.
        let _ = self.transitions.send(state);
    }

    pub(crate) fn current(&self) -> OperationState<T> {
        self.latest.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> StateView<T> {
        StateView {
            rx: self.latest.subscribe(),
        }
    }

    /// Every state published from now on, in order. Slow receivers see
    /// `RecvError::Lagged` instead of silently coalesced values.
    pub(crate) fn transitions(&self) -> broadcast::Receiver<OperationState<T>> {
        self.transitions.subscribe()
    }
}

/// Read-only handle on the latest state. Intermediate states may be
/// coalesced; use the transition stream when every step matters.
#[derive(Clone)]
pub struct StateView<T> {
    rx: watch::Receiver<OperationState<T>>,
}

impl<T: Clone> StateView<T> {
    pub fn get(&self) -> OperationState<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next publish. `None` once the owning operation is gone.
    pub async fn changed(&mut self) -> Option<OperationState<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the state is Success or Error.
    pub async fn settled(&mut self) -> Option<OperationState<T>> {
        loop {
            let current = self.rx.borrow_and_update().clone();
            if current.is_terminal() {
                return Some(current);
            }
            self.rx.changed().await.ok()?;
        }
    }
}
