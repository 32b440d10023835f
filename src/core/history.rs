//! Bounded state history with non-destructive rollback.

use super::error::StateError;
use super::state::State;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of states retained by a `StateManager`.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Owns the current state and a bounded, ordered history of past states.
///
/// Rollback only repoints `current`; history is never truncated, so an
/// update after a rollback appends onto the pre-rollback tail and the
/// history is no longer ordered by `sequence_id`. This keeps the full
/// audit trail.
///
/// # Example
///
/// ```rust
/// use flowstate::core::{State, StateManager};
///
/// let mut manager = StateManager::new(State::empty());
/// let first = manager.current().update([("step", 1)]);
/// manager.update(first);
/// let second = manager.current().update([("step", 2)]);
/// manager.update(second);
///
/// let restored = manager.rollback(1).unwrap().clone();
/// assert_eq!(restored.sequence_id(), 1);
/// assert_eq!(manager.history().len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StateManagerRecord")]
pub struct StateManager {
    current: State,
    history: VecDeque<State>,
    max_history: usize,
}

/// Wire shape of `StateManager`, checked before it becomes one.
#[derive(Deserialize)]
struct StateManagerRecord {
    current: State,
    history: VecDeque<State>,
    max_history: usize,
}

impl TryFrom<StateManagerRecord> for StateManager {
    type Error = StateError;

    fn try_from(record: StateManagerRecord) -> Result<Self, Self::Error> {
        if record.max_history == 0 {
            return Err(StateError::Deserialization(
                "max_history must be at least 1".to_string(),
            ));
        }
        if record.history.len() > record.max_history {
            return Err(StateError::Deserialization(format!(
                "history holds {} states, more than max_history {}",
                record.history.len(),
                record.max_history
            )));
        }
        let mut history = record.history;
        if history.is_empty() {
            history.push_back(record.current.clone());
        }
        Ok(Self {
            current: record.current,
            history,
            max_history: record.max_history,
        })
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new(State::empty())
    }
}

impl StateManager {
    /// Create a manager whose history holds only `initial`.
    pub fn new(initial: State) -> Self {
        Self::with_max_history(initial, DEFAULT_MAX_HISTORY)
    }

    /// Create a manager retaining at most `max_history` states (minimum one).
    pub fn with_max_history(initial: State, max_history: usize) -> Self {
        let mut history = VecDeque::new();
        history.push_back(initial.clone());
        Self {
            current: initial,
            history,
            max_history: max_history.max(1),
        }
    }

    pub fn current(&self) -> &State {
        &self.current
    }

    pub fn history(&self) -> &VecDeque<State> {
        &self.history
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Make `new_state` current and append it to history, evicting the
    /// oldest entries beyond `max_history`.
    pub fn update(&mut self, new_state: State) {
        self.history.push_back(new_state.clone());
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
        self.current = new_state;
    }

    /// Repoint `current` to the state `steps` entries before the newest one.
    ///
    /// Fails with `OutOfRange` when `steps >= history.len()`.
    pub fn rollback(&mut self, steps: usize) -> Result<&State, StateError> {
        let available = self.history.len();
        if steps >= available {
            return Err(StateError::OutOfRange { steps, available });
        }
        self.current = self.history[available - 1 - steps].clone();
        Ok(&self.current)
    }

    /// Most recent history entry with the given `sequence_id`.
    pub fn get_at_sequence(&self, sequence_id: u64) -> Option<&State> {
        self.history
            .iter()
            .rev()
            .find(|s| s.sequence_id() == sequence_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn advance(manager: &mut StateManager, step: i64) -> u64 {
        let next = manager.current().update([("step", step)]);
        let id = next.sequence_id();
        manager.update(next);
        id
    }

    #[test]
    fn new_manager_holds_initial_state() {
        let manager = StateManager::default();
        assert_eq!(manager.history().len(), 1);
        assert_eq!(manager.current().sequence_id(), 0);
        assert_eq!(manager.max_history(), DEFAULT_MAX_HISTORY);
    }

    #[test]
    fn update_appends_current_as_last_entry() {
        let mut manager = StateManager::default();
        advance(&mut manager, 1);

        assert_eq!(manager.history().back(), Some(manager.current()));
        assert_eq!(manager.current().get("step"), Some(&json!(1)));
    }

    #[test]
    fn history_evicts_oldest_first() {
        let mut manager = StateManager::with_max_history(State::empty(), 3);
        for step in 1..=5 {
            advance(&mut manager, step);
        }

        let ids: Vec<u64> = manager.history().iter().map(State::sequence_id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert!(manager.get_at_sequence(0).is_none());
    }

    #[test]
    fn zero_max_history_is_clamped_to_one() {
        let mut manager = StateManager::with_max_history(State::empty(), 0);
        advance(&mut manager, 1);
        assert_eq!(manager.history().len(), 1);
        assert_eq!(manager.max_history(), 1);
    }

    #[test]
    fn rollback_is_non_destructive() {
        let mut manager = StateManager::default();
        advance(&mut manager, 1);
        let latest = advance(&mut manager, 2);
        let len_before = manager.history().len();

        let restored = manager.rollback(1).unwrap().sequence_id();

        assert_eq!(restored, 1);
        assert_eq!(manager.current().sequence_id(), 1);
        assert_eq!(manager.history().len(), len_before);
        assert_eq!(
            manager.get_at_sequence(latest).map(State::sequence_id),
            Some(latest)
        );
    }

    #[test]
    fn rollback_zero_steps_returns_newest() {
        let mut manager = StateManager::default();
        let latest = advance(&mut manager, 1);
        assert_eq!(manager.rollback(0).unwrap().sequence_id(), latest);
    }

    #[test]
    fn rollback_beyond_history_fails() {
        let mut manager = StateManager::default();
        advance(&mut manager, 1);

        assert_eq!(
            manager.rollback(2).unwrap_err(),
            StateError::OutOfRange {
                steps: 2,
                available: 2
            }
        );
        assert_eq!(manager.current().sequence_id(), 1);
    }

    #[test]
    fn update_after_rollback_appends_to_pre_rollback_tail() {
        // History is an audit trail: it is not re-sorted after rollback.
        let mut manager = StateManager::default();
        advance(&mut manager, 1);
        advance(&mut manager, 2);
        manager.rollback(2).unwrap();
        advance(&mut manager, 9);

        let ids: Vec<u64> = manager.history().iter().map(State::sequence_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 1]);
        assert_eq!(manager.get_at_sequence(1).unwrap().get("step"), Some(&json!(9)));
    }

    #[test]
    fn manager_serializes_correctly() {
        let mut manager = StateManager::with_max_history(State::empty(), 10);
        advance(&mut manager, 1);

        let json = serde_json::to_string(&manager).unwrap();
        let restored: StateManager = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.history().len(), 2);
        assert_eq!(restored.current(), manager.current());
        assert_eq!(restored.max_history(), 10);
    }

    #[test]
    fn deserialize_rejects_zero_max_history() {
        let mut payload = serde_json::to_value(StateManager::default()).unwrap();
        payload["max_history"] = json!(0);

        let result: Result<StateManager, _> = serde_json::from_value(payload);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("max_history must be at least 1"), "{err}");
    }

    #[test]
    fn deserialize_rejects_history_beyond_bound() {
        let mut manager = StateManager::with_max_history(State::empty(), 3);
        advance(&mut manager, 1);
        let mut payload = serde_json::to_value(&manager).unwrap();
        payload["max_history"] = json!(1);

        let result: Result<StateManager, _> = serde_json::from_value(payload);
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_seeds_empty_history_with_current() {
        let mut payload = serde_json::to_value(StateManager::default()).unwrap();
        payload["history"] = json!([]);

        let restored: StateManager = serde_json::from_value(payload).unwrap();
        assert_eq!(restored.history().len(), 1);
        assert_eq!(restored.history().back(), Some(restored.current()));
    }
}
