use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use quiz_core::model::{
    AdvanceOutcome, JumpOutcome, OptionIndex, Question, QuestionBank, SelectionOutcome,
};
use services::SessionController;
use storage::repository::{InMemorySessionStore, SessionSnapshot, SessionStore, StorageError};

fn build_bank() -> Arc<QuestionBank> {
    Arc::new(
        QuestionBank::new(vec![
            Question::new(
                "What is the capital of France?",
                vec!["Paris".into(), "London".into()],
                OptionIndex::new(0),
            )
            .unwrap(),
            Question::new(
                "What is 2 + 3?",
                vec!["4".into(), "5".into()],
                OptionIndex::new(1),
            )
            .unwrap(),
        ])
        .unwrap(),
    )
}

/// Store that fails every operation, standing in for unavailable storage.
#[derive(Clone, Default)]
struct UnavailableStore;

#[async_trait]
impl SessionStore for UnavailableStore {
    async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        Err(StorageError::Connection("storage unavailable".into()))
    }

    async fn save(&self, _snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        Err(StorageError::Connection("storage unavailable".into()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Err(StorageError::Connection("storage unavailable".into()))
    }
}

/// Store whose save stalls while the first question is current, giving a
/// later fast save the chance to overtake it if writes are not serialized.
#[derive(Clone, Default)]
struct StallingStore {
    saved: Arc<Mutex<Option<SessionSnapshot>>>,
}

#[async_trait]
impl SessionStore for StallingStore {
    async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        Ok(None)
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        if snapshot.current == 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        *self.saved.lock().unwrap() = Some(snapshot.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[tokio::test]
async fn every_mutation_is_mirrored_into_the_store() {
    let bank = build_bank();
    let store = Arc::new(InMemorySessionStore::new());
    let controller = SessionController::restore(bank, Arc::clone(&store) as Arc<dyn SessionStore>).await;

    controller.select_answer(OptionIndex::new(0)).await;
    assert_eq!(
        store.load().await.unwrap(),
        Some(SessionSnapshot {
            current: 0,
            selections: vec![vec![0], vec![]],
        })
    );

    controller.advance().await;
    assert_eq!(
        store.load().await.unwrap(),
        Some(SessionSnapshot {
            current: 1,
            selections: vec![vec![0], vec![]],
        })
    );

    assert!(controller.go_back().await);
    assert_eq!(store.load().await.unwrap().map(|s| s.current), Some(0));
}

#[tokio::test]
async fn refused_operations_do_not_touch_the_store() {
    let bank = build_bank();
    let store = Arc::new(InMemorySessionStore::new());
    let controller = SessionController::restore(bank, Arc::clone(&store) as Arc<dyn SessionStore>).await;

    // Advancing an unanswered question is refused and nothing is written.
    assert_eq!(controller.advance().await, AdvanceOutcome::Refused);
    assert_eq!(controller.jump_to(1).await, JumpOutcome::Refused);
    assert!(!controller.go_back().await);
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn completed_run_scores_and_restart_clears_persistence() {
    let bank = build_bank();
    let store = Arc::new(InMemorySessionStore::new());
    let controller = SessionController::restore(bank, Arc::clone(&store) as Arc<dyn SessionStore>).await;

    assert_eq!(
        controller.select_answer(OptionIndex::new(0)).await,
        SelectionOutcome::Selected
    );
    assert_eq!(controller.advance().await, AdvanceOutcome::Moved);
    assert_eq!(
        controller.select_answer(OptionIndex::new(1)).await,
        SelectionOutcome::Selected
    );
    assert_eq!(controller.advance().await, AdvanceOutcome::Completed);

    assert!(controller.state().completed());
    assert_eq!(controller.score(), 2);

    controller.restart().await;
    let state = controller.state();
    assert_eq!(state.current(), 0);
    assert!(!state.completed());
    assert!(!state.is_answered(0));
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn saved_session_is_resumed_by_a_new_controller() {
    let bank = build_bank();
    let store = Arc::new(InMemorySessionStore::new());

    {
        let controller =
            SessionController::restore(Arc::clone(&bank), Arc::clone(&store) as Arc<dyn SessionStore>).await;
        controller.select_answer(OptionIndex::new(1)).await;
        controller.advance().await;
    }

    // Same store, fresh controller: picks up where the last run stopped.
    let controller = SessionController::restore(bank, Arc::clone(&store) as Arc<dyn SessionStore>).await;
    let state = controller.state();
    assert_eq!(state.current(), 1);
    assert!(state.is_answered(0));
    assert!(!state.completed());
    assert_eq!(controller.score(), 0);
}

#[tokio::test]
async fn malformed_saved_session_falls_back_to_fresh() {
    let bank = build_bank();
    let store = Arc::new(InMemorySessionStore::new());

    // Three selection lists for a two-question bank.
    store
        .save(&SessionSnapshot {
            current: 0,
            selections: vec![vec![0], vec![1], vec![0]],
        })
        .await
        .unwrap();

    let controller = SessionController::restore(bank, Arc::clone(&store) as Arc<dyn SessionStore>).await;
    let state = controller.state();
    assert_eq!(state.current(), 0);
    assert!(!state.is_answered(0));
}

#[tokio::test]
async fn unavailable_storage_never_fails_an_operation() {
    let bank = build_bank();
    let controller = SessionController::restore(bank, Arc::new(UnavailableStore)).await;

    assert_eq!(
        controller.select_answer(OptionIndex::new(0)).await,
        SelectionOutcome::Selected
    );
    assert_eq!(controller.advance().await, AdvanceOutcome::Moved);
    assert_eq!(controller.state().current(), 1);

    controller.restart().await;
    assert_eq!(controller.state().current(), 0);
}

#[tokio::test]
async fn rapid_events_persist_in_mutation_order() {
    let bank = build_bank();
    let store = Arc::new(StallingStore::default());
    let controller = Arc::new(
        SessionController::restore(bank, Arc::clone(&store) as Arc<dyn SessionStore>).await,
    );

    // First event: its save stalls mid-flight.
    let selecting = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.select_answer(OptionIndex::new(0)).await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Second event arrives while the first save is still in the air. It must
    // not commit ahead of the first, or a stale snapshot would win.
    controller.advance().await;
    selecting.await.unwrap();

    assert_eq!(controller.state().current(), 1);
    assert_eq!(
        *store.saved.lock().unwrap(),
        Some(SessionSnapshot {
            current: 1,
            selections: vec![vec![0], vec![]],
        })
    );
}

#[tokio::test]
async fn second_selection_replaces_and_reports_the_previous_one() {
    let bank = build_bank();
    let store = Arc::new(InMemorySessionStore::new());
    let controller = SessionController::restore(bank, Arc::clone(&store) as Arc<dyn SessionStore>).await;

    controller.select_answer(OptionIndex::new(0)).await;
    let outcome = controller.select_answer(OptionIndex::new(1)).await;
    assert_eq!(
        outcome,
        SelectionOutcome::Replaced {
            previous: OptionIndex::new(0),
        }
    );

    // The store holds only the latest label.
    assert_eq!(
        store.load().await.unwrap(),
        Some(SessionSnapshot {
            current: 0,
            selections: vec![vec![1], vec![]],
        })
    );
}
