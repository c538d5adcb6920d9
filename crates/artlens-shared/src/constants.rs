//! Application-wide constants

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
/// AI generation and critic calls hold the connection open far longer.
pub const GENERATION_TIMEOUT_SECONDS: u64 = 300;

pub const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_MEDIA_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_NOTIFICATIONS_BASE_URL: &str = "http://localhost:8082";
pub const DEFAULT_GENERATION_BASE_URL: &str = "http://localhost:8083";

pub const ENV_PREFIX: &str = "ARTLENS";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_FILE_PREFIX: &str = "artlens.log";

/// Buffered transitions per operation before slow subscribers start lagging.
pub const TRANSITION_CHANNEL_CAPACITY: usize = 64;
