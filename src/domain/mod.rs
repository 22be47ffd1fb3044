pub mod item;
pub mod quiz;

pub use item::{ItemEdit, LearningState, NewItem, PalaceRoom, VocabItem};
pub use quiz::{DirectionPolicy, QuizDirection, QuizFeedback, QuizRound, ReviewFailurePolicy};
