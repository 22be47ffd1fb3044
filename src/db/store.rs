//! The record-store boundary the scheduler and quiz selector depend on.
//!
//! Anything that can create, fetch, patch and filter items by state can back
//! a palace. The SQLite implementation lives in `items.rs`.

use chrono::{DateTime, Utc};

use crate::domain::{ItemEdit, LearningState, NewItem, PalaceRoom, VocabItem};
use crate::domain::item::non_blank;
use crate::error::Result;

/// State predicate used by queries and counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
  All,
  Is(LearningState),
  /// Everything still in training
  NotMastered,
}

impl StateFilter {
  pub fn matches(&self, state: LearningState) -> bool {
    match self {
      Self::All => true,
      Self::Is(s) => *s == state,
      Self::NotMastered => !state.is_mastered(),
    }
  }
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
  pub source_text: Option<String>,
  pub transliteration: Option<Option<String>>,
  pub target_text: Option<String>,
  pub mnemonic: Option<Option<String>>,
  pub location: Option<PalaceRoom>,
  pub state: Option<LearningState>,
  pub repetitions: Option<i64>,
  pub difficulty: Option<f64>,
  pub last_reviewed: Option<DateTime<Utc>>,
}

impl ItemPatch {
  pub fn state(state: LearningState) -> Self {
    Self {
      state: Some(state),
      ..Default::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }

  /// Apply to an in-memory copy, mirroring what the store persists
  pub fn apply_to(&self, item: &mut VocabItem) {
    if let Some(v) = &self.source_text {
      item.source_text = v.clone();
    }
    if let Some(v) = &self.transliteration {
      item.transliteration = v.clone();
    }
    if let Some(v) = &self.target_text {
      item.target_text = v.clone();
    }
    if let Some(v) = &self.mnemonic {
      item.mnemonic = v.clone();
    }
    if let Some(v) = self.location {
      item.location = v;
    }
    if let Some(v) = self.state {
      item.state = v;
    }
    if let Some(v) = self.repetitions {
      item.repetitions = v;
    }
    if let Some(v) = self.difficulty {
      item.difficulty = v;
    }
    if let Some(v) = self.last_reviewed {
      item.last_reviewed = Some(v);
    }
  }
}

impl From<ItemEdit> for ItemPatch {
  fn from(edit: ItemEdit) -> Self {
    Self {
      source_text: edit.source_text.map(|s| s.trim().to_string()),
      transliteration: edit.transliteration.map(|s| non_blank(Some(s))),
      target_text: edit.target_text.map(|s| s.trim().to_string()),
      mnemonic: edit.mnemonic.map(|s| non_blank(Some(s))),
      location: edit.location,
      ..Default::default()
    }
  }
}

pub trait ItemStore {
  /// Validate and insert a new item in state `new`. Returns its id.
  fn create(&self, item: &NewItem, location: PalaceRoom) -> Result<i64>;

  /// Fetch one item, `Error::NotFound` if absent
  fn get_by_id(&self, id: i64) -> Result<VocabItem>;

  /// Persist a patch as one write, `Error::NotFound` if absent
  fn update(&self, id: i64, patch: &ItemPatch) -> Result<()>;

  /// Items matching `filter`, ascending by id
  fn query_by_state(&self, filter: StateFilter) -> Result<Vec<VocabItem>>;

  fn count(&self, filter: StateFilter) -> Result<i64>;

  /// Run a read-modify-write so no other writer interleaves.
  /// Stores without transactions just run `f`.
  fn atomically<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Self) -> Result<T>,
  {
    f(self)
  }
}
