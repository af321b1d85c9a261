use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{OptionIndex, QuestionBank};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("selection count {len} does not match question bank size {expected}")]
    LengthMismatch { len: usize, expected: usize },

    #[error("current question {current} is out of range for {len} questions")]
    CurrentOutOfRange { current: usize, len: usize },

    #[error("selection {option} is out of range for question {question}")]
    SelectionOutOfRange { question: usize, option: OptionIndex },
}

/// Result of toggling an answer option on the current question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The option was added to an empty selection set.
    Selected,
    /// The option was already selected and has been toggled off.
    Cleared,
    /// A different option was selected; only one answer is permitted, so the
    /// new choice replaced it. The view surfaces an advisory for this case.
    Replaced { previous: OptionIndex },
    /// The score screen is showing; selections are frozen until restart.
    Refused,
}

/// Result of moving forward from the current question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the next question.
    Moved,
    /// The last question was answered; the session is now scored.
    Completed,
    /// The current question has no selection yet (or the session is already
    /// scored); the state is unchanged.
    Refused,
}

/// Result of jumping directly to a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpOutcome {
    Jumped,
    /// Target is out of range, unanswered, or the session is already scored.
    Refused,
}

/// One run through the question bank: current position, per-question
/// selection sets, and whether the score screen is showing.
///
/// The state machine has two macro-states. While `completed` is false the
/// session is answering; `advance()` on the answered last question moves it
/// to scored, and only `reset()` moves it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    current: usize,
    selections: Vec<BTreeSet<OptionIndex>>,
    completed: bool,
}

impl SessionState {
    /// A fresh session positioned on the first question with no selections.
    #[must_use]
    pub fn fresh(bank: &QuestionBank) -> Self {
        Self {
            current: 0,
            selections: vec![BTreeSet::new(); bank.len()],
            completed: false,
        }
    }

    /// Rehydrate a session from persisted storage, validating it against the
    /// bank. A restored session always resumes in the answering state.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` if the selection count does not match the
    /// bank, the current index is out of range, or any selection addresses an
    /// option its question does not have.
    pub fn from_persisted(
        bank: &QuestionBank,
        current: usize,
        selections: Vec<BTreeSet<OptionIndex>>,
    ) -> Result<Self, SessionStateError> {
        if selections.len() != bank.len() {
            return Err(SessionStateError::LengthMismatch {
                len: selections.len(),
                expected: bank.len(),
            });
        }
        if current >= bank.len() {
            return Err(SessionStateError::CurrentOutOfRange {
                current,
                len: bank.len(),
            });
        }
        for (question, set) in selections.iter().enumerate() {
            for option in set {
                let valid = bank
                    .get(question)
                    .is_some_and(|q| q.is_valid_option(*option));
                if !valid {
                    return Err(SessionStateError::SelectionOutOfRange {
                        question,
                        option: *option,
                    });
                }
            }
        }

        Ok(Self {
            current,
            selections,
            completed: false,
        })
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn selections(&self) -> &[BTreeSet<OptionIndex>] {
        &self.selections
    }

    #[must_use]
    pub fn selection(&self, question: usize) -> Option<&BTreeSet<OptionIndex>> {
        self.selections.get(question)
    }

    /// Returns true when the given question has at least one selection.
    #[must_use]
    pub fn is_answered(&self, question: usize) -> bool {
        self.selections
            .get(question)
            .is_some_and(|set| !set.is_empty())
    }

    /// Toggle `option` on the current question.
    ///
    /// Selecting an already-selected option clears it. Selecting a different
    /// option while one is held replaces it (single-answer policy) and
    /// reports the displaced index so the caller can raise the advisory.
    ///
    /// Passing an option the current question does not have is a contract
    /// violation, not a runtime case; it is asserted in debug builds.
    pub fn select_answer(&mut self, bank: &QuestionBank, option: OptionIndex) -> SelectionOutcome {
        debug_assert!(
            bank.get(self.current)
                .is_some_and(|q| q.is_valid_option(option)),
            "option {option} out of range for question {}",
            self.current
        );
        if self.completed {
            return SelectionOutcome::Refused;
        }

        let set = &mut self.selections[self.current];
        if set.contains(&option) {
            set.remove(&option);
            return SelectionOutcome::Cleared;
        }
        if let Some(previous) = set.iter().next().copied() {
            set.clear();
            set.insert(option);
            return SelectionOutcome::Replaced { previous };
        }
        set.insert(option);
        SelectionOutcome::Selected
    }

    /// Move to the next question, or complete the session from the last one.
    ///
    /// Refused while the current question is unanswered, so the current index
    /// never passes an unanswered question and never exceeds the last index.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.completed || !self.is_answered(self.current) {
            return AdvanceOutcome::Refused;
        }
        if self.current < self.selections.len() - 1 {
            self.current += 1;
            AdvanceOutcome::Moved
        } else {
            self.completed = true;
            AdvanceOutcome::Completed
        }
    }

    /// Move to the previous question. Returns false (and leaves the state
    /// unchanged) on the first question or once the session is scored.
    pub fn go_back(&mut self) -> bool {
        if self.completed || self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump directly to `question`. Only already-answered questions are valid
    /// targets, except the current question itself.
    pub fn jump_to(&mut self, question: usize) -> JumpOutcome {
        if self.completed || question >= self.selections.len() {
            return JumpOutcome::Refused;
        }
        if question != self.current && !self.is_answered(question) {
            return JumpOutcome::Refused;
        }
        self.current = question;
        JumpOutcome::Jumped
    }

    /// Returns true when the selection for `question` contains its correct
    /// option (membership check).
    #[must_use]
    pub fn is_correct(&self, bank: &QuestionBank, question: usize) -> bool {
        match (self.selections.get(question), bank.get(question)) {
            (Some(set), Some(q)) => set.contains(&q.correct()),
            _ => false,
        }
    }

    /// Number of questions whose selection contains the correct option.
    #[must_use]
    pub fn score(&self, bank: &QuestionBank) -> usize {
        (0..self.selections.len())
            .filter(|question| self.is_correct(bank, *question))
            .count()
    }

    /// Back to a fresh session: first question, no selections, answering.
    pub fn reset(&mut self) {
        self.current = 0;
        for set in &mut self.selections {
            set.clear();
        }
        self.completed = false;
    }
}
