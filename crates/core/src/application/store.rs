// State Store Handle
// Explicitly owned, injectable handle over the launcher state.
// Mutations go through typed events; each apply is atomic (no torn
// status+message pairs) and published in application order.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::{LauncherState, StateEvent};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Shared handle to the launcher state
#[derive(Clone)]
pub struct StateHandle {
    inner: Arc<Mutex<LauncherState>>,
    events: broadcast::Sender<StateEvent>,
}

impl StateHandle {
    pub fn new(initial: LauncherState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(initial)),
            events,
        }
    }

    /// Apply one event and publish it to subscribers.
    ///
    /// The event is published while the state lock is held so
    /// subscribers observe events in exactly the order they were
    /// applied.
    pub fn apply(&self, event: StateEvent) {
        let mut state = self.inner.lock().unwrap();
        state.apply(&event);
        debug!(event = ?event, status = ?state.status, "State event applied");
        // Send failures only mean there are no subscribers
        let _ = self.events.send(event);
    }

    /// Apply one event only if the predicate holds for the current
    /// state, atomically under the state lock. Returns whether the
    /// event was applied.
    ///
    /// This is the compare-and-set primitive for guards like "start a
    /// launch only if none is running"; a separate snapshot + apply
    /// would leave a window between the read and the write.
    pub fn apply_if<F>(&self, predicate: F, event: StateEvent) -> bool
    where
        F: FnOnce(&LauncherState) -> bool,
    {
        let mut state = self.inner.lock().unwrap();
        if !predicate(&state) {
            return false;
        }
        state.apply(&event);
        debug!(event = ?event, status = ?state.status, "State event applied");
        let _ = self.events.send(event);
        true
    }

    /// Clone of the current state for readers
    pub fn snapshot(&self) -> LauncherState {
        self.inner.lock().unwrap().clone()
    }

    /// Subscribe to the ordered event stream (UI contract)
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CheckId, GameId, RunStatus};

    fn handle() -> StateHandle {
        StateHandle::new(LauncherState::new(
            GameId::Custom,
            3010,
            vec![CheckId::new(CheckId::PORT_AVAILABLE)],
            Some("nc -kl 3010".to_string()),
        ))
    }

    #[test]
    fn test_apply_mutates_snapshot() {
        let store = handle();
        store.apply(StateEvent::LaunchStarted);
        assert_eq!(store.snapshot().status, RunStatus::Running);
    }

    #[test]
    fn test_apply_if_guards_atomically() {
        let store = handle();

        let first = store.apply_if(
            |state| state.status != RunStatus::Running,
            StateEvent::LaunchStarted,
        );
        assert!(first);
        assert_eq!(store.snapshot().status, RunStatus::Running);

        // the same guard now rejects and leaves the state untouched
        let second = store.apply_if(
            |state| state.status != RunStatus::Running,
            StateEvent::LaunchStarted,
        );
        assert!(!second);
        assert_eq!(store.snapshot().status, RunStatus::Running);
    }

    #[test]
    fn test_rejected_apply_if_publishes_nothing() {
        let store = handle();
        let mut rx = store.subscribe();

        store.apply(StateEvent::LaunchStarted);
        store.apply_if(
            |state| state.status != RunStatus::Running,
            StateEvent::LaunchStarted,
        );
        store.apply(StateEvent::LaunchSucceeded);

        assert!(matches!(
            rx.try_recv().unwrap(),
            StateEvent::LaunchStarted
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            StateEvent::LaunchSucceeded
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscribers_observe_events_in_order() {
        let store = handle();
        let mut rx = store.subscribe();

        store.apply(StateEvent::LaunchStarted);
        store.apply(StateEvent::LaunchSucceeded);

        assert!(matches!(rx.recv().await.unwrap(), StateEvent::LaunchStarted));
        assert!(matches!(
            rx.recv().await.unwrap(),
            StateEvent::LaunchSucceeded
        ));
    }
}
