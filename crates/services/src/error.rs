//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SessionStateError;
use storage::repository::StorageError;

/// Why a saved session could not be restored.
///
/// Never surfaced to users: the controller logs the cause and falls back to
/// a fresh session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RestoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    State(#[from] SessionStateError),
}
