//! ViewModel Module
//!
//! One [`Operation`](artlens_core::Operation) per user action. Each view model
//! owns its operations and only hands out read-only state.

pub mod artist_vm;
pub mod auth_vm;
pub mod critic_vm;
pub mod generation_vm;
pub mod notification_vm;
pub mod sketch_vm;
pub mod story_vm;

pub use artist_vm::ArtistViewModel;
pub use auth_vm::AuthViewModel;
pub use critic_vm::CriticViewModel;
pub use generation_vm::GenerationViewModel;
pub use notification_vm::NotificationViewModel;
pub use sketch_vm::SketchViewModel;
pub use story_vm::StoryViewModel;
