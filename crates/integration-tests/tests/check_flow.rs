//! Pre-flight check flow tests against the real system check registry

use std::net::TcpListener;
use std::sync::Arc;

use portside_core::application::{LaunchOrchestrator, StateHandle};
use portside_core::domain::{CheckId, CheckStatus, GameId, LauncherState, RunStatus};
use portside_core::port::id_provider::mocks::SequentialIdProvider;
use portside_core::port::time_provider::SystemTimeProvider;
use portside_core::port::{CheckError, StaticGameCatalog, SystemHostInfo};
use portside_core::AppError;
use portside_infra_system::{OsProcessSpawner, SystemCheckRegistry};

/// Reserve an ephemeral port; the listener keeps it busy until dropped
fn reserved_port() -> (TcpListener, u16) {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    (listener, port)
}

fn orchestrator(port: u16, check_ids: Vec<CheckId>, command: Option<&str>) -> LaunchOrchestrator {
    let store = StateHandle::new(LauncherState::new(
        GameId::Custom,
        port,
        check_ids,
        command.map(str::to_string),
    ));
    LaunchOrchestrator::new(
        store,
        Arc::new(SystemCheckRegistry::new(port)),
        Arc::new(OsProcessSpawner::new()),
        Arc::new(SystemHostInfo),
        Arc::new(StaticGameCatalog),
        Arc::new(SequentialIdProvider::new()),
        Arc::new(SystemTimeProvider),
    )
}

#[tokio::test]
async fn test_port_check_passes_on_free_port() {
    let (listener, port) = reserved_port();
    drop(listener);

    let ids = vec![CheckId::new(CheckId::PORT_AVAILABLE)];
    let orchestrator = orchestrator(port, ids.clone(), None);

    orchestrator.run_checks().await.unwrap();

    let state = orchestrator.store().snapshot();
    let check = state.check(&ids[0]).unwrap();
    assert_eq!(check.status, CheckStatus::Succeeded);
    assert!(!check.message.is_empty());
}

#[tokio::test]
async fn test_port_check_failure_blocks_the_launch() {
    let (_listener, port) = reserved_port();

    let ids = vec![CheckId::new(CheckId::PORT_AVAILABLE)];
    let orchestrator = orchestrator(port, ids.clone(), Some("echo should not run"));

    let result = orchestrator.run_checks_and_launch().await;
    assert!(matches!(
        result,
        Err(AppError::Check(CheckError::Failure(_)))
    ));

    let state = orchestrator.store().snapshot();
    assert_eq!(state.check(&ids[0]).unwrap().status, CheckStatus::Failed);
    // the launch never started, so no process and no output
    assert_eq!(state.status, RunStatus::Idle);
    assert!(state.process.is_none());
    assert!(state.messages.is_empty());
}

#[tokio::test]
async fn test_unregistered_check_id_is_a_fault() {
    let (listener, port) = reserved_port();
    drop(listener);

    let bogus = CheckId::new("check-gpu-temperature");
    let orchestrator = orchestrator(port, vec![bogus.clone()], None);

    let result = orchestrator.run_check(&bogus).await;
    assert!(matches!(result, Err(AppError::Check(CheckError::Fault(_)))));

    // a fault is not a check verdict; the status is left as started
    let state = orchestrator.store().snapshot();
    assert_eq!(state.check(&bogus).unwrap().status, CheckStatus::Running);
}

#[tokio::test]
async fn test_select_game_discards_previous_check_results() {
    let (listener, port) = reserved_port();
    drop(listener);

    let ids = vec![CheckId::new(CheckId::PORT_AVAILABLE)];
    let orchestrator = orchestrator(port, ids, None);
    orchestrator.run_checks().await.unwrap();

    orchestrator.select_game(GameId::Factorio);

    let state = orchestrator.store().snapshot();
    assert_eq!(state.game, GameId::Factorio);
    assert_eq!(state.port, 34197);
    assert!(state.checks.iter().all(|c| c.status == CheckStatus::Idle));
}
