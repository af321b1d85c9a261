mod quiz;
mod score;

pub use quiz::QuizView;
pub use score::ScoreView;
