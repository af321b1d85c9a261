use thiserror::Error;

use crate::model::QuestionError;
use crate::model::SessionStateError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    SessionState(#[from] SessionStateError),
}
