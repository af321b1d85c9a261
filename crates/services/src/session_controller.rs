use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use quiz_core::model::{
    AdvanceOutcome, JumpOutcome, OptionIndex, QuestionBank, SelectionOutcome, SessionState,
};
use storage::repository::{SessionSnapshot, SessionStore};

use crate::error::RestoreError;

/// The quiz session controller.
///
/// Owns the session state for the one active run through the question bank
/// and mirrors every mutation into the injected store. Storage is
/// best-effort: a failed or malformed load falls back to a fresh session,
/// and failed saves are logged and ignored so the quiz never crashes over
/// persistence.
///
/// Operations take `&self`; the state sits behind a mutex so the controller
/// can be shared into UI event handlers. Each mutation holds the async write
/// gate until its save completes, so snapshots reach the store in mutation
/// order even when events arrive from concurrently spawned tasks.
pub struct SessionController {
    bank: Arc<QuestionBank>,
    state: Mutex<SessionState>,
    write_gate: tokio::sync::Mutex<()>,
    store: Arc<dyn SessionStore>,
}

impl SessionController {
    /// Build a controller, resuming the saved session when one exists.
    pub async fn restore(bank: Arc<QuestionBank>, store: Arc<dyn SessionStore>) -> Self {
        let state = match Self::try_restore(&bank, store.as_ref()).await {
            Ok(Some(state)) => state,
            Ok(None) => SessionState::fresh(&bank),
            Err(err) => {
                warn!(error = %err, "discarding saved session, starting fresh");
                SessionState::fresh(&bank)
            }
        };

        Self {
            bank,
            state: Mutex::new(state),
            write_gate: tokio::sync::Mutex::new(()),
            store,
        }
    }

    async fn try_restore(
        bank: &QuestionBank,
        store: &dyn SessionStore,
    ) -> Result<Option<SessionState>, RestoreError> {
        let Some(snapshot) = store.load().await? else {
            return Ok(None);
        };
        Ok(Some(snapshot.into_state(bank)?))
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// A copy of the current session state, for rendering.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock_state().clone()
    }

    /// Number of questions answered correctly so far.
    #[must_use]
    pub fn score(&self) -> usize {
        self.lock_state().score(&self.bank)
    }

    /// Toggle `option` on the current question and persist the result.
    pub async fn select_answer(&self, option: OptionIndex) -> SelectionOutcome {
        let _write = self.write_gate.lock().await;
        let (outcome, snapshot) = {
            let mut state = self.lock_state();
            let outcome = state.select_answer(&self.bank, option);
            (outcome, SessionSnapshot::from_state(&state))
        };
        if !matches!(outcome, SelectionOutcome::Refused) {
            self.persist(&snapshot).await;
        }
        outcome
    }

    /// Move to the next question (or complete the session) and persist.
    pub async fn advance(&self) -> AdvanceOutcome {
        let _write = self.write_gate.lock().await;
        let (outcome, snapshot) = {
            let mut state = self.lock_state();
            let outcome = state.advance();
            (outcome, SessionSnapshot::from_state(&state))
        };
        if !matches!(outcome, AdvanceOutcome::Refused) {
            self.persist(&snapshot).await;
        }
        outcome
    }

    /// Move to the previous question and persist. Returns false when already
    /// on the first question.
    pub async fn go_back(&self) -> bool {
        let _write = self.write_gate.lock().await;
        let (moved, snapshot) = {
            let mut state = self.lock_state();
            let moved = state.go_back();
            (moved, SessionSnapshot::from_state(&state))
        };
        if moved {
            self.persist(&snapshot).await;
        }
        moved
    }

    /// Jump to an already-answered question and persist.
    pub async fn jump_to(&self, question: usize) -> JumpOutcome {
        let _write = self.write_gate.lock().await;
        let (outcome, snapshot) = {
            let mut state = self.lock_state();
            let outcome = state.jump_to(question);
            (outcome, SessionSnapshot::from_state(&state))
        };
        if matches!(outcome, JumpOutcome::Jumped) {
            self.persist(&snapshot).await;
        }
        outcome
    }

    /// Reset to a fresh session and clear the persisted entries.
    pub async fn restart(&self) {
        let _write = self.write_gate.lock().await;
        self.lock_state().reset();
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear saved session");
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn persist(&self, snapshot: &SessionSnapshot) {
        if let Err(err) = self.store.save(snapshot).await {
            warn!(error = %err, "failed to save session, continuing without persistence");
        }
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("bank_len", &self.bank.len())
            .field("state", &self.lock_state())
            .finish_non_exhaustive()
    }
}
