// Check Registry Port
// Maps a check id to an asynchronous environment probe

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::CheckId;

/// Text payload returned by a successful probe (opaque to the
/// orchestrator; surfaced as the check's message)
pub type CheckResult = String;

/// Probe failure shapes.
///
/// `Failure` is a typed, reportable check failure and is recorded on
/// the check itself. `Fault` is an unexpected error; it is never
/// downgraded to `Failure` and aborts the whole composite operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("{0}")]
    Failure(String),

    #[error("unexpected fault during check: {0}")]
    Fault(String),
}

/// Check registry port
///
/// Implementations:
/// - SystemCheckRegistry (infra-system): real environment probes
/// - mocks::MockCheckRegistry: scriptable outcomes for tests
#[async_trait]
pub trait CheckRegistry: Send + Sync {
    /// Whether a probe is registered for this id
    fn contains(&self, id: &CheckId) -> bool;

    /// Run the probe for `id`
    ///
    /// # Errors
    /// - CheckError::Failure for an expected, reportable failure
    /// - CheckError::Fault for anything unexpected (unknown id,
    ///   probe machinery broke)
    async fn probe(&self, id: &CheckId) -> Result<CheckResult, CheckError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Scripted outcome for one check id
    #[derive(Debug, Clone)]
    pub enum MockOutcome {
        /// Probe resolves with this message
        Succeed(String),
        /// Probe fails with a typed failure
        Fail(String),
        /// Probe raises an unexpected fault
        Fault(String),
    }

    /// Mock CheckRegistry with per-id scripted outcomes
    pub struct MockCheckRegistry {
        outcomes: HashMap<CheckId, MockOutcome>,
        probed: Arc<Mutex<Vec<CheckId>>>,
    }

    impl MockCheckRegistry {
        pub fn new() -> Self {
            Self {
                outcomes: HashMap::new(),
                probed: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn with_outcome(mut self, id: CheckId, outcome: MockOutcome) -> Self {
            self.outcomes.insert(id, outcome);
            self
        }

        /// All-succeeding registry for the given ids
        pub fn all_succeeding(ids: &[CheckId]) -> Self {
            let mut registry = Self::new();
            for id in ids {
                registry.outcomes.insert(
                    id.clone(),
                    MockOutcome::Succeed(format!("{} ok", id)),
                );
            }
            registry
        }

        /// Ids probed so far, in invocation order
        pub fn probed(&self) -> Vec<CheckId> {
            self.probed.lock().unwrap().clone()
        }
    }

    impl Default for MockCheckRegistry {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl CheckRegistry for MockCheckRegistry {
        fn contains(&self, id: &CheckId) -> bool {
            self.outcomes.contains_key(id)
        }

        async fn probe(&self, id: &CheckId) -> Result<CheckResult, CheckError> {
            self.probed.lock().unwrap().push(id.clone());

            match self.outcomes.get(id) {
                Some(MockOutcome::Succeed(msg)) => Ok(msg.clone()),
                Some(MockOutcome::Fail(msg)) => Err(CheckError::Failure(msg.clone())),
                Some(MockOutcome::Fault(msg)) => Err(CheckError::Fault(msg.clone())),
                None => Err(CheckError::Fault(format!("no probe registered: {}", id))),
            }
        }
    }
}
