//! # ArtLens Shared
//!
//! Configuration, telemetry, and constants shared by the client crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod telemetry;

pub use error::AppError;
