//! Difficulty-factor scheduling and the learning state machine.
//!
//! A success multiplies difficulty by 0.8 and counts a repetition, a failure
//! multiplies it by 1.2 and resets repetitions. Difficulty is always clamped
//! to [1.3, 3.5]. Pool membership is decided by state alone; the interval is
//! informational and never used to select items.

use chrono::{DateTime, Duration, Utc};

use crate::config::{
  FAILURE_FACTOR, MAX_DIFFICULTY, MAX_INTERVAL_DAYS, MIN_DIFFICULTY, MIN_QUIZ_POOL,
  SUCCESS_FACTOR,
};
use crate::db::store::{ItemPatch, ItemStore, StateFilter};
use crate::domain::{LearningState, VocabItem};
use crate::error::{Error, Result};

/// Difficulty after one recall outcome
pub fn next_difficulty(difficulty: f64, was_correct: bool) -> f64 {
  let factor = if was_correct { SUCCESS_FACTOR } else { FAILURE_FACTOR };
  (difficulty * factor).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// The patch one outcome produces. `None` is a pure state assignment.
pub fn outcome_patch(
  item: &VocabItem,
  was_correct: Option<bool>,
  new_state: LearningState,
  now: DateTime<Utc>,
) -> ItemPatch {
  match was_correct {
    None => ItemPatch::state(new_state),
    Some(true) => ItemPatch {
      state: Some(new_state),
      difficulty: Some(next_difficulty(item.difficulty, true)),
      repetitions: Some(item.repetitions + 1),
      last_reviewed: Some(now),
      ..Default::default()
    },
    Some(false) => ItemPatch {
      state: Some(new_state),
      difficulty: Some(next_difficulty(item.difficulty, false)),
      repetitions: Some(0),
      ..Default::default()
    },
  }
}

/// Apply one outcome (or bare state change) to an item and persist it in a
/// single write. Returns the item as stored afterwards.
pub fn record_outcome<S: ItemStore>(
  store: &S,
  id: i64,
  was_correct: Option<bool>,
  new_state: LearningState,
) -> Result<VocabItem> {
  store.atomically(|s| {
    let mut item = s.get_by_id(id)?;
    let before = item.state;
    let patch = outcome_patch(&item, was_correct, new_state, Utc::now());
    s.update(id, &patch)?;
    patch.apply_to(&mut item);

    tracing::debug!(
      "Item {} {} -> {} (outcome {:?}, difficulty {:.2}, reps {})",
      id,
      before.as_str(),
      item.state.as_str(),
      was_correct,
      item.difficulty,
      item.repetitions
    );
    Ok(item)
  })
}

/// Explicit manual reset back to `new`
pub fn reset_item<S: ItemStore>(store: &S, id: i64) -> Result<VocabItem> {
  record_outcome(store, id, None, LearningState::New)
}

/// Suggested spacing in days: 1, then 3, then `3 * (reps - 1) * difficulty` capped at 30
pub fn next_review_interval_days(difficulty: f64, repetitions: i64) -> f64 {
  match repetitions {
    r if r <= 0 => 1.0,
    1 => 3.0,
    r => (3.0 * (r - 1) as f64 * difficulty).min(MAX_INTERVAL_DAYS),
  }
}

/// When the item would next be due, for display only
pub fn next_review_due(item: &VocabItem) -> Option<DateTime<Utc>> {
  let last = item.last_reviewed?;
  let days = next_review_interval_days(item.difficulty, item.repetitions);
  Some(last + Duration::seconds((days * 86_400.0).round() as i64))
}

/// Every item not yet mastered, in creation order
pub fn eligible_for_training<S: ItemStore>(store: &S) -> Result<Vec<VocabItem>> {
  store.query_by_state(StateFilter::NotMastered)
}

/// Mastered items, or nothing when there are too few for a quiz
pub fn eligible_for_review<S: ItemStore>(store: &S) -> Result<Vec<VocabItem>> {
  match review_pool(store) {
    Ok(pool) => Ok(pool),
    Err(Error::InsufficientPool { .. }) => Ok(Vec::new()),
    Err(e) => Err(e),
  }
}

/// Like `eligible_for_review` but reports the shortfall
pub fn review_pool<S: ItemStore>(store: &S) -> Result<Vec<VocabItem>> {
  let pool = store.query_by_state(StateFilter::Is(LearningState::Mastered))?;
  if pool.len() < MIN_QUIZ_POOL {
    return Err(Error::InsufficientPool {
      required: MIN_QUIZ_POOL,
      available: pool.len(),
    });
  }
  Ok(pool)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{NewItem, PalaceRoom};
  use crate::testing::TestEnv;
  use rusqlite::params;

  fn create(env: &TestEnv, source: &str, target: &str) -> i64 {
    env
      .conn
      .create(&NewItem::new(source, target), PalaceRoom::Office)
      .unwrap()
  }

  fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
  }

  #[test]
  fn test_next_difficulty_bounds() {
    assert!(approx(next_difficulty(2.5, true), 2.0));
    assert!(approx(next_difficulty(2.5, false), 3.0));
    assert!(approx(next_difficulty(1.4, true), MIN_DIFFICULTY));
    assert!(approx(next_difficulty(3.4, false), MAX_DIFFICULTY));
    // Out-of-range legacy values are pulled back in by either branch
    assert!(approx(next_difficulty(10.0, true), MAX_DIFFICULTY));
    assert!(approx(next_difficulty(0.5, false), MIN_DIFFICULTY));
  }

  #[test]
  fn test_difficulty_stays_bounded_over_long_runs() {
    let mut d = 2.5;
    for i in 0..200 {
      d = next_difficulty(d, i % 3 != 0);
      assert!((MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&d));
    }
  }

  #[test]
  fn test_interval_rule() {
    assert!(approx(next_review_interval_days(2.5, 0), 1.0));
    assert!(approx(next_review_interval_days(3.5, 1), 3.0));
    assert!(approx(next_review_interval_days(2.5, 3), 15.0));
    assert!(approx(next_review_interval_days(3.5, 10), 30.0));
    assert!(approx(next_review_interval_days(1.3, 2), 3.9));
  }

  #[test]
  fn test_next_review_due() {
    let env = TestEnv::new().unwrap();
    let id = create(&env, "дом", "house");
    let item = env.conn.get_by_id(id).unwrap();
    assert!(next_review_due(&item).is_none());

    let item = record_outcome(&env.conn, id, Some(true), LearningState::Mastered).unwrap();
    let due = next_review_due(&item).unwrap();
    let last = item.last_reviewed.unwrap();
    assert_eq!(due - last, Duration::days(3));
  }

  #[test]
  fn test_success_then_failure_scenario() {
    let env = TestEnv::new().unwrap();
    let id = create(&env, "кот", "cat");

    let item = record_outcome(&env.conn, id, Some(true), LearningState::Mastered).unwrap();
    assert!(approx(item.difficulty, 2.0));
    assert_eq!(item.repetitions, 1);
    assert_eq!(item.state, LearningState::Mastered);
    assert!(item.last_reviewed.is_some());

    let item = record_outcome(&env.conn, id, Some(false), LearningState::Mastered).unwrap();
    assert!(approx(item.difficulty, 2.4));
    assert_eq!(item.repetitions, 0);

    // Persisted, not just returned
    assert_eq!(env.conn.get_by_id(id).unwrap(), item);
  }

  #[test]
  fn test_failure_keeps_last_reviewed() {
    let env = TestEnv::new().unwrap();
    let id = create(&env, "кот", "cat");
    let first = record_outcome(&env.conn, id, Some(true), LearningState::Mastered).unwrap();
    let after = record_outcome(&env.conn, id, Some(false), LearningState::Pending).unwrap();
    assert_eq!(after.last_reviewed, first.last_reviewed);
    assert_eq!(after.state, LearningState::Pending);
  }

  #[test]
  fn test_pure_state_assignment() {
    let env = TestEnv::new().unwrap();
    let id = create(&env, "кот", "cat");
    record_outcome(&env.conn, id, Some(true), LearningState::Pending).unwrap();

    let item = record_outcome(&env.conn, id, None, LearningState::ReviewLater).unwrap();
    assert_eq!(item.state, LearningState::ReviewLater);
    assert!(approx(item.difficulty, 2.0));
    assert_eq!(item.repetitions, 1);

    let item = reset_item(&env.conn, id).unwrap();
    assert_eq!(item.state, LearningState::New);
    assert!(approx(item.difficulty, 2.0));
  }

  #[test]
  fn test_missing_item_is_not_found() {
    let env = TestEnv::new().unwrap();
    let err = record_outcome(&env.conn, 404, Some(true), LearningState::Mastered).unwrap_err();
    assert!(matches!(err, Error::NotFound(404)));
  }

  #[test]
  fn test_null_difficulty_schedules_from_default() {
    let env = TestEnv::new().unwrap();
    let id = create(&env, "кот", "cat");
    env
      .conn
      .execute("UPDATE items SET difficulty = NULL WHERE id = ?1", params![id])
      .unwrap();
    let item = record_outcome(&env.conn, id, Some(false), LearningState::Pending).unwrap();
    assert!(approx(item.difficulty, 3.0));
  }

  #[test]
  fn test_training_excludes_mastered_in_id_order() {
    let env = TestEnv::new().unwrap();
    let ids: Vec<i64> = (0..5).map(|i| create(&env, &format!("s{i}"), &format!("t{i}"))).collect();
    record_outcome(&env.conn, ids[1], Some(true), LearningState::Mastered).unwrap();
    record_outcome(&env.conn, ids[3], Some(false), LearningState::Pending).unwrap();

    let training: Vec<i64> = eligible_for_training(&env.conn)
      .unwrap()
      .into_iter()
      .map(|i| i.id)
      .collect();
    assert_eq!(training, vec![ids[0], ids[2], ids[3], ids[4]]);
  }

  #[test]
  fn test_review_needs_four_mastered() {
    let env = TestEnv::new().unwrap();
    let ids: Vec<i64> = (0..5).map(|i| create(&env, &format!("s{i}"), &format!("t{i}"))).collect();
    for id in &ids[..3] {
      record_outcome(&env.conn, *id, Some(true), LearningState::Mastered).unwrap();
    }

    assert!(eligible_for_review(&env.conn).unwrap().is_empty());
    assert!(matches!(
      review_pool(&env.conn),
      Err(Error::InsufficientPool { required: 4, available: 3 })
    ));

    record_outcome(&env.conn, ids[3], Some(true), LearningState::Mastered).unwrap();
    let pool = eligible_for_review(&env.conn).unwrap();
    assert_eq!(pool.len(), 4);
    assert!(pool.iter().all(|i| i.state.is_mastered()));
  }
}
