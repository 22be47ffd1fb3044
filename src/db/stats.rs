//! Palace progress statistics

use rusqlite::{Connection, Result};
use serde::Serialize;

use crate::domain::{LearningState, PalaceRoom};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PalaceStats {
  pub total: i64,
  pub mastered: i64,
  /// Everything not yet mastered
  pub pending: i64,
  /// One entry per state, in `LearningState::ALL` order
  pub by_state: Vec<(LearningState, i64)>,
  pub progress_percent: f64,
}

impl PalaceStats {
  pub fn count_for(&self, state: LearningState) -> i64 {
    self
      .by_state
      .iter()
      .find(|(s, _)| *s == state)
      .map(|(_, n)| *n)
      .unwrap_or(0)
  }
}

fn counts_grouped_by(conn: &Connection, column: &str) -> Result<Vec<(String, i64)>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {column}, COUNT(*) FROM items GROUP BY {column}"
  ))?;
  let rows = stmt
    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
    .collect::<Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn palace_stats(conn: &Connection) -> Result<PalaceStats> {
  let grouped = counts_grouped_by(conn, "state")?;

  // Unknown stored states read as `new`, same as when loading items
  let mut by_state: Vec<(LearningState, i64)> =
    LearningState::ALL.iter().map(|s| (*s, 0)).collect();
  for (key, n) in grouped {
    let state = LearningState::from_str(&key).unwrap_or_default();
    if let Some(entry) = by_state.iter_mut().find(|(s, _)| *s == state) {
      entry.1 += n;
    }
  }

  let total: i64 = by_state.iter().map(|(_, n)| n).sum();
  let mastered = by_state
    .iter()
    .find(|(s, _)| s.is_mastered())
    .map(|(_, n)| *n)
    .unwrap_or(0);
  let progress_percent = if total > 0 {
    mastered as f64 / total as f64 * 100.0
  } else {
    0.0
  };

  Ok(PalaceStats {
    total,
    mastered,
    pending: total - mastered,
    by_state,
    progress_percent,
  })
}

/// Item count per room, every room listed
pub fn room_occupancy(conn: &Connection) -> Result<Vec<(PalaceRoom, i64)>> {
  let grouped = counts_grouped_by(conn, "location")?;

  let mut rooms: Vec<(PalaceRoom, i64)> = PalaceRoom::ALL.iter().map(|r| (*r, 0)).collect();
  for (key, n) in grouped {
    let room = PalaceRoom::from_str(&key).unwrap_or(PalaceRoom::MainEntrance);
    if let Some(entry) = rooms.iter_mut().find(|(r, _)| *r == room) {
      entry.1 += n;
    }
  }
  Ok(rooms)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::store::{ItemPatch, ItemStore};
  use crate::domain::NewItem;
  use crate::testing::TestEnv;

  #[test]
  fn test_stats_empty_palace() {
    let env = TestEnv::new().unwrap();
    let stats = palace_stats(&env.conn).unwrap();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.mastered, 0);
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.progress_percent, 0.0);
    assert_eq!(stats.by_state.len(), LearningState::ALL.len());
  }

  #[test]
  fn test_stats_counts_and_progress() {
    let env = TestEnv::new().unwrap();
    let mut ids = Vec::new();
    for (i, room) in [PalaceRoom::Gym, PalaceRoom::Gym, PalaceRoom::Attic, PalaceRoom::Office]
      .into_iter()
      .enumerate()
    {
      let new = NewItem::new(format!("s{i}"), format!("t{i}"));
      ids.push(env.conn.create(&new, room).unwrap());
    }
    env.conn.update(ids[0], &ItemPatch::state(LearningState::Mastered)).unwrap();
    env.conn.update(ids[1], &ItemPatch::state(LearningState::Pending)).unwrap();

    let stats = palace_stats(&env.conn).unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.mastered, 1);
    assert_eq!(stats.pending, 3);
    assert_eq!(stats.count_for(LearningState::New), 2);
    assert_eq!(stats.count_for(LearningState::Pending), 1);
    assert_eq!(stats.count_for(LearningState::ReviewLater), 0);
    assert!((stats.progress_percent - 25.0).abs() < 1e-9);

    let rooms = room_occupancy(&env.conn).unwrap();
    assert_eq!(rooms.len(), PalaceRoom::ALL.len());
    let count = |room: PalaceRoom| rooms.iter().find(|(r, _)| *r == room).map(|(_, n)| *n);
    assert_eq!(count(PalaceRoom::Gym), Some(2));
    assert_eq!(count(PalaceRoom::Attic), Some(1));
    assert_eq!(count(PalaceRoom::Kitchen), Some(0));
  }
}
