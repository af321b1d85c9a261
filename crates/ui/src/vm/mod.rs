mod quiz_vm;

pub use quiz_vm::{JumpEntry, OptionRow, QuizVm, ScoreRow, option_letter};
