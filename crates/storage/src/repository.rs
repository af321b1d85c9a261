use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{OptionIndex, QuestionBank, SessionState, SessionStateError};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of an in-progress session.
///
/// This mirrors the domain `SessionState` so stores can serialize and
/// deserialize without leaking storage concerns into the domain layer.
/// Selections are plain sorted index lists; the completion flag is not
/// persisted, so a restored session always resumes in the answering state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub current: usize,
    pub selections: Vec<Vec<u8>>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            current: state.current(),
            selections: state
                .selections()
                .iter()
                .map(|set| set.iter().map(OptionIndex::value).collect())
                .collect(),
        }
    }

    /// Convert the snapshot back into a validated domain `SessionState`.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` if the snapshot does not fit the bank
    /// (wrong length, out-of-range position, out-of-range selection).
    pub fn into_state(self, bank: &QuestionBank) -> Result<SessionState, SessionStateError> {
        let selections = self
            .selections
            .into_iter()
            .map(|indices| {
                indices
                    .into_iter()
                    .map(OptionIndex::new)
                    .collect::<BTreeSet<_>>()
            })
            .collect();
        SessionState::from_persisted(bank, self.current, selections)
    }
}

/// Store contract for the single in-progress session.
///
/// Semantics follow the browser local-storage model the app replaces:
/// string-keyed, best-effort, and clearable by the outside world at any
/// time. Callers treat `load()` failures as "absent" and ignore `save()`
/// failures; that policy lives in the controller, not here.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the saved session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unreachable or holds data that
    /// cannot be decoded.
    async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError>;

    /// Persist the session, replacing any previous save.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError>;

    /// Remove the saved session so the next `load()` reports absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unreachable.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Simple in-memory store implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    entry: Arc<Mutex<Option<SessionSnapshot>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entry: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        let guard = self
            .entry
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let mut guard = self
            .entry
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(snapshot.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .entry
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates the session store behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        Self { sessions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionBank};

    fn build_bank() -> QuestionBank {
        QuestionBank::new(vec![
            Question::new(
                "Q1",
                vec!["a".into(), "b".into()],
                OptionIndex::new(0),
            )
            .unwrap(),
            Question::new(
                "Q2",
                vec!["c".into(), "d".into(), "e".into()],
                OptionIndex::new(2),
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn snapshot_round_trips_through_the_domain() {
        let bank = build_bank();
        let mut state = SessionState::fresh(&bank);
        state.select_answer(&bank, OptionIndex::new(0));
        state.advance();
        state.select_answer(&bank, OptionIndex::new(2));

        let snapshot = SessionSnapshot::from_state(&state);
        assert_eq!(snapshot.current, 1);
        assert_eq!(snapshot.selections, vec![vec![0], vec![2]]);

        let restored = snapshot.into_state(&bank).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn snapshot_validation_rejects_foreign_data() {
        let bank = build_bank();
        let snapshot = SessionSnapshot {
            current: 0,
            selections: vec![vec![5], vec![]],
        };
        assert!(snapshot.into_state(&bank).is_err());
    }

    #[tokio::test]
    async fn in_memory_store_round_trips_and_clears() {
        let store = InMemorySessionStore::new();
        assert!(store.load().await.unwrap().is_none());

        let snapshot = SessionSnapshot {
            current: 1,
            selections: vec![vec![0], vec![]],
        };
        store.save(&snapshot).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(snapshot));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
