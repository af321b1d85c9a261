use thiserror::Error;

use crate::model::OptionIndex;

/// Upper bound on options per question, so every option maps to a single
/// display letter (`a`..`z`) at the presentation boundary.
pub const MAX_OPTIONS: usize = 26;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("too many options for a single question: {len}")]
    TooManyOptions { len: usize },

    #[error("correct option {correct} is out of range for {len} options")]
    CorrectOutOfRange { correct: OptionIndex, len: usize },

    #[error("question bank is empty")]
    EmptyBank,
}

/// A single multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct: OptionIndex,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or any option is blank, if there
    /// are fewer than two or more than `MAX_OPTIONS` options, or if `correct`
    /// does not address one of the options.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: OptionIndex,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if options.len() > MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions { len: options.len() });
        }
        if let Some(index) = options.iter().position(|option| option.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct.as_usize() >= options.len() {
            return Err(QuestionError::CorrectOutOfRange {
                correct,
                len: options.len(),
            });
        }

        Ok(Self {
            prompt,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> OptionIndex {
        self.correct
    }

    /// Number of answer choices for this question.
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Returns true when `option` addresses one of this question's choices.
    #[must_use]
    pub fn is_valid_option(&self, option: OptionIndex) -> bool {
        option.as_usize() < self.options.len()
    }
}

/// The static, ordered list of quiz questions. Never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from an ordered list of questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyBank` if no questions are provided.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::EmptyBank);
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    // A validated bank is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Index of the last question.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| (*text).to_string()).collect()
    }

    #[test]
    fn builds_a_valid_question() {
        let question = Question::new(
            "What is the capital of France?",
            options(&["Paris", "London"]),
            OptionIndex::new(0),
        )
        .unwrap();

        assert_eq!(question.option_count(), 2);
        assert_eq!(question.correct(), OptionIndex::new(0));
        assert!(question.is_valid_option(OptionIndex::new(1)));
        assert!(!question.is_valid_option(OptionIndex::new(2)));
    }

    #[test]
    fn rejects_blank_prompt() {
        let err = Question::new("   ", options(&["a", "b"]), OptionIndex::new(0)).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn rejects_single_option() {
        let err = Question::new("Q", options(&["only"]), OptionIndex::new(0)).unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn rejects_blank_option() {
        let err = Question::new("Q", options(&["a", " "]), OptionIndex::new(0)).unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 1 });
    }

    #[test]
    fn rejects_out_of_range_correct_answer() {
        let err = Question::new("Q", options(&["a", "b"]), OptionIndex::new(2)).unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectOutOfRange {
                correct: OptionIndex::new(2),
                len: 2,
            }
        );
    }

    #[test]
    fn bank_rejects_empty_question_list() {
        let err = QuestionBank::new(Vec::new()).unwrap_err();
        assert_eq!(err, QuestionError::EmptyBank);
    }

    #[test]
    fn bank_preserves_question_order() {
        let first = Question::new("Q1", options(&["a", "b"]), OptionIndex::new(0)).unwrap();
        let second = Question::new("Q2", options(&["c", "d"]), OptionIndex::new(1)).unwrap();
        let bank = QuestionBank::new(vec![first.clone(), second.clone()]).unwrap();

        assert_eq!(bank.len(), 2);
        assert_eq!(bank.last_index(), 1);
        assert_eq!(bank.get(0), Some(&first));
        assert_eq!(bank.get(1), Some(&second));
        assert_eq!(bank.get(2), None);
    }
}
