//! ArtLens CLI - headless driver for the client core.
//!
//! Runs one user action through its view model and logs every state
//! transition, the same way a screen would observe it.
//!
//! ```text
//! artlens-cli login <username> <password> [--remember]
//! artlens-cli logout
//! artlens-cli stories | artists | notifications
//! ```

use anyhow::{Context, Result};
use artlens_api::AppState;
use artlens_core::{OperationState, StateView};
use artlens_shared::config::AppConfig;
use clap::{Parser, Subcommand};
use std::fmt::Debug;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "artlens-cli")]
#[command(about = "Headless driver for the ArtLens client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Sign in and persist the access token
    Login {
        username: String,
        password: String,
        /// Keep the session across restarts
        #[arg(long)]
        remember: bool,
    },
    /// End the session; local credentials are always cleared
    Logout,
    /// Fetch the story feed
    Stories,
    /// Fetch the artist directory
    Artists,
    /// Fetch notifications
    Notifications,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let _guard = artlens_shared::telemetry::init_telemetry(&config.logging)?;

    info!("ArtLens CLI starting...");
    let mut app = AppState::from_config(&config)?;

    if let Some(session) = app.auth.restore_session()? {
        info!("Restored remembered session (remember={})", session.remember);
    }

    let ok = match cli.command {
        Command::Login {
            username,
            password,
            remember,
        } => {
            app.auth.username = username;
            app.auth.password = password;
            app.auth.remember = remember;
            let watcher = tokio::spawn(watch("login", app.auth.subscribe_login()));
            let state = app.auth.login().await;
            app.auth.clear_password();
            finish(watcher, state).await
        }
        Command::Logout => {
            let watcher = tokio::spawn(watch("logout", app.auth.subscribe_logout()));
            finish(watcher, app.auth.logout().await).await
        }
        Command::Stories => {
            if let Some(cached) = app.stories.cached() {
                info!("{} stories in local cache", cached.len());
            }
            let watcher = tokio::spawn(watch("stories", app.stories.subscribe()));
            finish(watcher, app.stories.fetch().await).await
        }
        Command::Artists => {
            let watcher = tokio::spawn(watch("artists", app.artists.subscribe()));
            finish(watcher, app.artists.fetch().await).await
        }
        Command::Notifications => {
            let watcher = tokio::spawn(watch("notifications", app.notifications.subscribe()));
            let ok = finish(watcher, app.notifications.fetch().await).await;
            info!("{} unread", app.notifications.unread_count());
            ok
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Log each observed state until the operation settles.
async fn watch<T: Clone + Debug + Send + Sync + 'static>(name: &'static str, mut view: StateView<T>) {
    while let Some(state) = view.changed().await {
        info!(operation = name, state = state.label(), "transition");
        if state.is_terminal() {
            break;
        }
    }
}

async fn finish<T: Debug>(watcher: tokio::task::JoinHandle<()>, state: OperationState<T>) -> bool {
    // terminal state is already published, so the watcher is about to exit
    let _ = watcher.await;
    match state {
        OperationState::Success(value) => {
            info!("{:#?}", value);
            true
        }
        OperationState::Error(message) => {
            error!("{}", message);
            false
        }
        other => {
            error!("Operation ended in unexpected state: {}", other.label());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_args() {
        let cli = Cli::try_parse_from(["artlens-cli", "login", "mia", "pw", "--remember"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Login {
                username: "mia".into(),
                password: "pw".into(),
                remember: true,
            }
        );
    }

    #[test]
    fn test_remember_defaults_off() {
        let cli = Cli::try_parse_from(["artlens-cli", "login", "mia", "pw"]).unwrap();
        assert!(matches!(cli.command, Command::Login { remember: false, .. }));
    }

    #[test]
    fn test_rejects_missing_password_and_unknown_command() {
        assert!(Cli::try_parse_from(["artlens-cli", "login", "mia"]).is_err());
        assert!(Cli::try_parse_from(["artlens-cli", "upload"]).is_err());
        assert!(Cli::try_parse_from(["artlens-cli"]).is_err());
    }

    #[test]
    fn test_plain_subcommands() {
        let cli = Cli::try_parse_from(["artlens-cli", "notifications"]).unwrap();
        assert_eq!(cli.command, Command::Notifications);
    }
}
