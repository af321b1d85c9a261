use quiz_core::model::OptionIndex;
use services::SessionController;

/// Display letter for an option position: 0 is `a`, 1 is `b`, and so on.
///
/// This is the only place an option index becomes a letter; the domain
/// stores indices everywhere. Banks cap options at 26, so the mapping never
/// leaves the alphabet.
#[must_use]
pub fn option_letter(option: OptionIndex) -> char {
    char::from(b'a' + option.value())
}

/// One answer choice on the active question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionRow {
    pub index: OptionIndex,
    pub letter: char,
    pub text: String,
    pub selected: bool,
}

/// One slot in the jump panel. Only answered questions (and the current one)
/// are navigable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JumpEntry {
    pub index: usize,
    pub number: usize,
    pub answered: bool,
    pub current: bool,
}

/// One line of the final per-question breakdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRow {
    pub number: usize,
    pub prompt: String,
    pub chosen: Option<String>,
    pub expected: String,
    pub correct: bool,
}

/// Render-ready snapshot of the quiz session.
///
/// Recomputed from the controller after every operation; the views never
/// read domain state directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub prompt: String,
    pub position: usize,
    pub total: usize,
    pub options: Vec<OptionRow>,
    pub jump_entries: Vec<JumpEntry>,
    pub can_go_back: bool,
    pub can_advance: bool,
    pub completed: bool,
    pub score: usize,
    pub score_rows: Vec<ScoreRow>,
}

impl QuizVm {
    #[must_use]
    pub fn read_from(controller: &SessionController) -> Self {
        let bank = controller.bank();
        let state = controller.state();
        let current = state.current();

        let question = bank.get(current);
        let prompt = question.map(|q| q.prompt().to_string()).unwrap_or_default();
        let options = question
            .map(|q| {
                q.options()
                    .iter()
                    .enumerate()
                    .map(|(position, text)| {
                        // Positions are bounded by MAX_OPTIONS, so u8 always fits.
                        let index = OptionIndex::new(position as u8);
                        OptionRow {
                            index,
                            letter: option_letter(index),
                            text: text.clone(),
                            selected: state
                                .selection(current)
                                .is_some_and(|set| set.contains(&index)),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let jump_entries = (0..bank.len())
            .map(|index| JumpEntry {
                index,
                number: index + 1,
                answered: state.is_answered(index),
                current: index == current,
            })
            .collect();

        let completed = state.completed();
        let score_rows = if completed {
            bank.questions()
                .iter()
                .enumerate()
                .map(|(index, q)| {
                    // Older persisted data may hold more than one selection;
                    // scoring tolerates that, so the breakdown lists them all.
                    let chosen = state.selection(index).filter(|set| !set.is_empty()).map(
                        |set| {
                            set.iter()
                                .filter_map(|option| q.options().get(option.as_usize()).cloned())
                                .collect::<Vec<_>>()
                                .join(", ")
                        },
                    );
                    ScoreRow {
                        number: index + 1,
                        prompt: q.prompt().to_string(),
                        chosen,
                        expected: q.options()[q.correct().as_usize()].clone(),
                        correct: state.is_correct(&bank, index),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            prompt,
            position: current + 1,
            total: bank.len(),
            options,
            jump_entries,
            can_go_back: !completed && current > 0,
            can_advance: !completed && state.is_answered(current),
            completed,
            score: state.score(&bank),
            score_rows,
        }
    }
}
