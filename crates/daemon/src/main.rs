//! Portside - Main Entry Point
//! Pre-flight checks + supervised launch of a local server process

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portside_core::application::{LaunchOrchestrator, StateHandle};
use portside_core::domain::{GameId, LauncherState, StateEvent};
use portside_core::port::id_provider::UuidProvider;
use portside_core::port::time_provider::SystemTimeProvider;
use portside_core::port::{CheckRegistry, GameCatalog, StaticGameCatalog, SystemHostInfo};
use portside_core::AppError;
use portside_infra_system::{OsProcessSpawner, SystemCheckRegistry};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_GAME: GameId = GameId::Minecraft;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("PORTSIDE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("portside=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Portside v{} starting...", VERSION);

    // 2. Load configuration from environment
    let game: GameId = match std::env::var("PORTSIDE_GAME") {
        Ok(s) => s
            .parse()
            .map_err(|e| anyhow::anyhow!("PORTSIDE_GAME: {}", e))?,
        Err(_) => DEFAULT_GAME,
    };
    let command = std::env::var("PORTSIDE_COMMAND").ok();
    let working_dir = std::env::var("PORTSIDE_WORKDIR")
        .ok()
        .map(|d| shellexpand::tilde(&d).into_owned());
    let server_file = std::env::var("PORTSIDE_SERVER_FILE").ok();
    let port_override: Option<u16> = std::env::var("PORTSIDE_PORT")
        .ok()
        .map(|s| s.parse())
        .transpose()
        .map_err(|e| anyhow::anyhow!("PORTSIDE_PORT: {}", e))?;

    // 3. Setup dependencies (DI wiring)
    let catalog = Arc::new(StaticGameCatalog);
    let local_port = port_override.unwrap_or_else(|| catalog.local_port(game));

    let store = StateHandle::new(LauncherState::new(
        game,
        local_port,
        catalog.check_list(game),
        catalog.default_command(game),
    ));

    let registry = Arc::new(SystemCheckRegistry::new(local_port));
    let spawner = Arc::new(OsProcessSpawner::new());
    let host = Arc::new(SystemHostInfo);
    let id_provider = Arc::new(UuidProvider);
    let time_provider = Arc::new(SystemTimeProvider);

    let orchestrator = Arc::new(LaunchOrchestrator::new(
        store.clone(),
        registry.clone(),
        spawner,
        host,
        catalog,
        id_provider,
        time_provider,
    ));

    // 4. Apply configuration overrides
    if let Some(file) = &server_file {
        orchestrator.select_server_file(Path::new(file))?;
    }
    if let Some(command) = &command {
        orchestrator.update_command(command.clone());
    }
    if let Some(dir) = &working_dir {
        orchestrator.update_working_dir(dir);
    }

    let snapshot = store.snapshot();
    for check in &snapshot.checks {
        if !registry.contains(&check.id) {
            warn!(check = %check.id, "No probe registered for configured check");
        }
    }
    info!(
        game = %snapshot.game,
        port = snapshot.port,
        command = ?snapshot.command,
        "Target configured"
    );

    // 5. Mirror state events into the log
    let mut events = store.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                StateEvent::OutputLine { entry } => {
                    info!(channel = %entry.channel, "{}", entry.line);
                }
                StateEvent::CheckSucceeded { id, message } => {
                    info!(check = %id, message = %message, "Check passed");
                }
                StateEvent::CheckFailed { id, message } => {
                    error!(check = %id, message = %message, "Check failed");
                }
                _ => {}
            }
        }
    });

    // 6. Run checks + launch; Ctrl+C kills the supervised process
    info!("Running pre-flight checks...");
    let launcher = Arc::clone(&orchestrator);
    let mut run_task = tokio::spawn(async move { launcher.run_checks_and_launch().await });

    let outcome = tokio::select! {
        result = &mut run_task => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, killing server process...");
            orchestrator.kill().await?;
            run_task.await?
        }
    };

    // 7. Report the terminal outcome
    match outcome {
        Ok(()) => {
            info!("Server process finished successfully");
            Ok(())
        }
        Err(e @ (AppError::Launch(_) | AppError::Check(_))) => {
            error!(error = %e, "Launch aborted");
            Err(e.into())
        }
        Err(e) => {
            // unexpected fault: report as internal, do not crash
            error!(error = %e, "Internal error");
            Err(anyhow::anyhow!("internal error: {}", e))
        }
    }
}
