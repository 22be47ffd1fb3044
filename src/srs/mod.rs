pub mod quiz;
pub mod scheduler;

pub use quiz::{build_round, submit_answer};
pub use scheduler::{
  eligible_for_review, eligible_for_training, next_difficulty, next_review_due,
  next_review_interval_days, record_outcome, reset_item, review_pool,
};
