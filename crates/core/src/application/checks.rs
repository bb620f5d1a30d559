// Check Runner & Sequencer
// Runs the target's pre-flight checks strictly in configured order,
// short-circuiting on the first failure or fault.

use std::sync::Arc;

use tracing::{error, info};

use crate::application::store::StateHandle;
use crate::domain::{CheckId, DomainError, StateEvent};
use crate::error::{AppError, Result};
use crate::port::{CheckError, CheckRegistry};

/// Sequencer over the current target's check list
pub struct CheckSequencer {
    store: StateHandle,
    registry: Arc<dyn CheckRegistry>,
}

impl CheckSequencer {
    pub fn new(store: StateHandle, registry: Arc<dyn CheckRegistry>) -> Self {
        Self { store, registry }
    }

    /// Run a single check and record its outcome.
    ///
    /// An id that is not in the current check list is a configuration
    /// bug and aborts with DomainError::CheckNotFound rather than
    /// being reported as a check failure.
    ///
    /// A typed probe failure is recorded on the check and returned.
    /// An unexpected fault is re-raised without touching the check's
    /// recorded status; downgrading it would hide real breakage.
    pub async fn run_check(&self, id: &CheckId) -> Result<()> {
        if self.store.snapshot().check(id).is_none() {
            return Err(DomainError::CheckNotFound(id.to_string()).into());
        }

        info!(check = %id, "Running check");
        self.store.apply(StateEvent::CheckStarted { id: id.clone() });

        match self.registry.probe(id).await {
            Ok(message) => {
                info!(check = %id, "Check succeeded");
                self.store.apply(StateEvent::CheckSucceeded {
                    id: id.clone(),
                    message,
                });
                Ok(())
            }
            Err(CheckError::Failure(message)) => {
                error!(check = %id, message = %message, "Check failed");
                self.store.apply(StateEvent::CheckFailed {
                    id: id.clone(),
                    message: message.clone(),
                });
                Err(CheckError::Failure(message).into())
            }
            Err(fault @ CheckError::Fault(_)) => {
                error!(check = %id, fault = %fault, "Check raised unexpected fault");
                Err(fault.into())
            }
        }
    }

    /// Run every check of the current target, in list order, awaiting
    /// each before starting the next.
    ///
    /// The first failure or fault aborts the sequence; later checks
    /// keep whatever status they already had. Never spawns a process.
    pub async fn run_checks(&self) -> Result<()> {
        let check_ids: Vec<CheckId> = self
            .store
            .snapshot()
            .checks
            .iter()
            .map(|c| c.id.clone())
            .collect();

        for id in &check_ids {
            self.run_check(id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CheckStatus, GameId, LauncherState};
    use crate::port::check_registry::mocks::{MockCheckRegistry, MockOutcome};

    fn ids() -> Vec<CheckId> {
        vec![
            CheckId::new("check-one"),
            CheckId::new("check-two"),
            CheckId::new("check-three"),
        ]
    }

    fn store_with(ids: Vec<CheckId>) -> StateHandle {
        StateHandle::new(LauncherState::new(GameId::Custom, 3010, ids, None))
    }

    #[tokio::test]
    async fn test_all_succeeding_checks() {
        let store = store_with(ids());
        let registry = Arc::new(MockCheckRegistry::all_succeeding(&ids()));
        let sequencer = CheckSequencer::new(store.clone(), registry.clone());

        sequencer.run_checks().await.unwrap();

        let state = store.snapshot();
        assert!(state
            .checks
            .iter()
            .all(|c| c.status == CheckStatus::Succeeded));
        // probes ran in configured order
        assert_eq!(registry.probed(), ids());
    }

    #[tokio::test]
    async fn test_second_check_failure_short_circuits() {
        let store = store_with(ids());
        let registry = Arc::new(
            MockCheckRegistry::new()
                .with_outcome(
                    CheckId::new("check-one"),
                    MockOutcome::Succeed("ok".to_string()),
                )
                .with_outcome(
                    CheckId::new("check-two"),
                    MockOutcome::Fail("port already in use".to_string()),
                )
                .with_outcome(
                    CheckId::new("check-three"),
                    MockOutcome::Succeed("ok".to_string()),
                ),
        );
        let sequencer = CheckSequencer::new(store.clone(), registry.clone());

        let result = sequencer.run_checks().await;
        assert!(matches!(
            result,
            Err(AppError::Check(CheckError::Failure(_)))
        ));

        let state = store.snapshot();
        assert_eq!(state.checks[0].status, CheckStatus::Succeeded);
        assert_eq!(state.checks[1].status, CheckStatus::Failed);
        assert_eq!(state.checks[1].message, "port already in use");
        // the third check never ran
        assert_eq!(state.checks[2].status, CheckStatus::Idle);
        assert_eq!(registry.probed().len(), 2);
    }

    #[tokio::test]
    async fn test_fault_is_not_downgraded_to_failure() {
        let store = store_with(vec![CheckId::new("check-one")]);
        let registry = Arc::new(MockCheckRegistry::new().with_outcome(
            CheckId::new("check-one"),
            MockOutcome::Fault("probe machinery broke".to_string()),
        ));
        let sequencer = CheckSequencer::new(store.clone(), registry);

        let result = sequencer.run_checks().await;
        assert!(matches!(result, Err(AppError::Check(CheckError::Fault(_)))));

        // the check is NOT marked failed; the fault aborts the whole
        // operation instead of becoming a reportable check result
        let state = store.snapshot();
        assert_eq!(state.checks[0].status, CheckStatus::Running);
    }

    #[tokio::test]
    async fn test_unknown_check_id_is_fatal() {
        let store = store_with(ids());
        let registry = Arc::new(MockCheckRegistry::all_succeeding(&ids()));
        let sequencer = CheckSequencer::new(store, registry);

        let result = sequencer.run_check(&CheckId::new("check-missing")).await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::CheckNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_rerun_overwrites_previous_result() {
        let id = CheckId::new("check-one");
        let store = store_with(vec![id.clone()]);
        let registry = Arc::new(MockCheckRegistry::new().with_outcome(
            id.clone(),
            MockOutcome::Succeed("second result".to_string()),
        ));
        let sequencer = CheckSequencer::new(store.clone(), registry);

        sequencer.run_check(&id).await.unwrap();
        sequencer.run_check(&id).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.checks[0].status, CheckStatus::Succeeded);
        assert_eq!(state.checks[0].message, "second result");
    }
}
