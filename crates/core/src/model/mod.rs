mod ids;
mod question;
mod session;

pub use ids::{OptionIndex, ParseOptionIndexError};
pub use question::{Question, QuestionBank, QuestionError, MAX_OPTIONS};
pub use session::{
    AdvanceOutcome, JumpOutcome, SelectionOutcome, SessionState, SessionStateError,
};
