//! Multiple-choice round construction and scoring

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::config::{DISTRACTOR_COUNT, MIN_QUIZ_POOL};
use crate::db::store::ItemStore;
use crate::domain::{
  DirectionPolicy, LearningState, QuizFeedback, QuizRound, ReviewFailurePolicy, VocabItem,
};
use crate::error::{Error, Result};

use super::scheduler::record_outcome;

/// Build one round from an eligible pool.
///
/// Distractors come from the other items' answers in the same direction,
/// minus anything equal to the correct answer and minus repeats. When fewer
/// than three remain the round is degraded rather than refused.
pub fn build_round<R: Rng + ?Sized>(
  pool: &[VocabItem],
  policy: DirectionPolicy,
  rng: &mut R,
) -> Result<QuizRound> {
  if pool.len() < MIN_QUIZ_POOL {
    return Err(Error::InsufficientPool {
      required: MIN_QUIZ_POOL,
      available: pool.len(),
    });
  }

  let direction = policy.pick(rng);
  let target = pool.choose(rng).ok_or(Error::InsufficientPool {
    required: MIN_QUIZ_POOL,
    available: 0,
  })?;
  let correct = direction.answer_of(target);

  let mut candidates: Vec<&str> = pool
    .iter()
    .filter(|item| item.id != target.id)
    .map(|item| direction.answer_of(item))
    .filter(|answer| *answer != correct)
    .collect();
  candidates.sort_unstable();
  candidates.dedup();

  let mut options: Vec<String> = candidates
    .choose_multiple(rng, DISTRACTOR_COUNT)
    .map(|s| s.to_string())
    .collect();
  options.push(correct.to_string());
  options.shuffle(rng);

  let round = QuizRound {
    item_id: target.id,
    direction,
    prompt: direction.prompt_of(target).to_string(),
    correct_answer: correct.to_string(),
    options,
  };

  if round.is_degraded() {
    tracing::warn!(
      "Quiz round for item {} has only {} options (duplicate answers in pool)",
      round.item_id,
      round.options.len()
    );
  } else {
    tracing::debug!("Quiz round for item {} ({})", round.item_id, direction.as_str());
  }
  Ok(round)
}

/// Score an answer with exact comparison and record the outcome.
/// The round is consumed so it cannot be scored twice.
pub fn submit_answer<S: ItemStore>(
  store: &S,
  round: QuizRound,
  chosen: &str,
  failure_policy: ReviewFailurePolicy,
) -> Result<QuizFeedback> {
  let correct = chosen == round.correct_answer;
  let next_state = match (correct, failure_policy) {
    (true, _) => LearningState::Mastered,
    (false, ReviewFailurePolicy::Reinforce) => LearningState::Mastered,
    (false, ReviewFailurePolicy::Demote) => LearningState::Pending,
  };

  let item = record_outcome(store, round.item_id, Some(correct), next_state)?;
  Ok(QuizFeedback {
    correct,
    correct_answer: round.correct_answer,
    item,
  })
}
