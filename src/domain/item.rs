use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{Error, Result};

/// Learning state, governs which pool an item is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LearningState {
  #[default]
  New,
  Pending,
  ReviewLater,
  Mastered,
}

impl LearningState {
  pub const ALL: [LearningState; 4] = [
    LearningState::New,
    LearningState::Pending,
    LearningState::ReviewLater,
    LearningState::Mastered,
  ];

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "new" => Some(Self::New),
      "pending" => Some(Self::Pending),
      "review_later" => Some(Self::ReviewLater),
      "mastered" => Some(Self::Mastered),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::New => "new",
      Self::Pending => "pending",
      Self::ReviewLater => "review_later",
      Self::Mastered => "mastered",
    }
  }

  pub fn is_mastered(&self) -> bool {
    matches!(self, Self::Mastered)
  }
}

/// Rooms of the memory palace. Purely cosmetic: nothing in scheduling looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PalaceRoom {
  MainEntrance,
  LivingRoom,
  Kitchen,
  MasterBedroom,
  Bathroom,
  Office,
  Library,
  Garden,
  Garage,
  Attic,
  Basement,
  Terrace,
  DiningRoom,
  MusicRoom,
  Gym,
}

impl PalaceRoom {
  pub const ALL: [PalaceRoom; 15] = [
    PalaceRoom::MainEntrance,
    PalaceRoom::LivingRoom,
    PalaceRoom::Kitchen,
    PalaceRoom::MasterBedroom,
    PalaceRoom::Bathroom,
    PalaceRoom::Office,
    PalaceRoom::Library,
    PalaceRoom::Garden,
    PalaceRoom::Garage,
    PalaceRoom::Attic,
    PalaceRoom::Basement,
    PalaceRoom::Terrace,
    PalaceRoom::DiningRoom,
    PalaceRoom::MusicRoom,
    PalaceRoom::Gym,
  ];

  /// Pick a room uniformly at random
  pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
    *Self::ALL.choose(rng).unwrap_or(&PalaceRoom::MainEntrance)
  }

  pub fn from_str(s: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|room| room.as_str() == s)
  }

  /// Storage key
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::MainEntrance => "main_entrance",
      Self::LivingRoom => "living_room",
      Self::Kitchen => "kitchen",
      Self::MasterBedroom => "master_bedroom",
      Self::Bathroom => "bathroom",
      Self::Office => "office",
      Self::Library => "library",
      Self::Garden => "garden",
      Self::Garage => "garage",
      Self::Attic => "attic",
      Self::Basement => "basement",
      Self::Terrace => "terrace",
      Self::DiningRoom => "dining_room",
      Self::MusicRoom => "music_room",
      Self::Gym => "gym",
    }
  }

  pub fn display_name(&self) -> &'static str {
    match self {
      Self::MainEntrance => "Main Entrance",
      Self::LivingRoom => "Living Room",
      Self::Kitchen => "Kitchen",
      Self::MasterBedroom => "Master Bedroom",
      Self::Bathroom => "Bathroom",
      Self::Office => "Office",
      Self::Library => "Library",
      Self::Garden => "Garden",
      Self::Garage => "Garage",
      Self::Attic => "Attic",
      Self::Basement => "Basement",
      Self::Terrace => "Terrace",
      Self::DiningRoom => "Dining Room",
      Self::MusicRoom => "Music Room",
      Self::Gym => "Gym",
    }
  }
}

/// One learnable vocabulary item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabItem {
  pub id: i64,
  /// Word in the language being learned
  pub source_text: String,
  pub transliteration: Option<String>,
  /// Meaning in the learner's language
  pub target_text: String,
  pub mnemonic: Option<String>,
  pub location: PalaceRoom,
  pub state: LearningState,
  pub repetitions: i64,
  pub difficulty: f64,
  /// Set only by outcome-bearing updates
  pub last_reviewed: Option<DateTime<Utc>>,
}

/// Fields accepted when creating an item (manual entry or import)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
  pub source_text: String,
  pub transliteration: Option<String>,
  pub target_text: String,
  pub mnemonic: Option<String>,
}

impl NewItem {
  pub fn new(source_text: impl Into<String>, target_text: impl Into<String>) -> Self {
    Self {
      source_text: source_text.into(),
      target_text: target_text.into(),
      ..Default::default()
    }
  }

  pub fn with_transliteration(mut self, transliteration: impl Into<String>) -> Self {
    self.transliteration = Some(transliteration.into());
    self
  }

  pub fn with_mnemonic(mut self, mnemonic: impl Into<String>) -> Self {
    self.mnemonic = Some(mnemonic.into());
    self
  }

  /// Reject records with blank required fields
  pub fn validate(&self) -> Result<()> {
    if self.source_text.trim().is_empty() {
      return Err(Error::empty_field("source_text"));
    }
    if self.target_text.trim().is_empty() {
      return Err(Error::empty_field("target_text"));
    }
    Ok(())
  }
}

/// Free-form edit of an item's content. Never touches learning fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemEdit {
  pub source_text: Option<String>,
  /// `Some("")` clears the transliteration
  pub transliteration: Option<String>,
  pub target_text: Option<String>,
  /// `Some("")` clears the mnemonic
  pub mnemonic: Option<String>,
  pub location: Option<PalaceRoom>,
}

impl ItemEdit {
  pub fn validate(&self) -> Result<()> {
    if self.source_text.as_deref().is_some_and(|s| s.trim().is_empty()) {
      return Err(Error::empty_field("source_text"));
    }
    if self.target_text.as_deref().is_some_and(|s| s.trim().is_empty()) {
      return Err(Error::empty_field("target_text"));
    }
    Ok(())
  }
}

/// Blank optional text is stored as NULL
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.trim().is_empty())
}

impl VocabItem {
  /// Build the record a freshly created item would read back as
  pub fn from_new(id: i64, new: NewItem, location: PalaceRoom) -> Self {
    Self {
      id,
      source_text: new.source_text,
      transliteration: non_blank(new.transliteration),
      target_text: new.target_text,
      mnemonic: non_blank(new.mnemonic),
      location,
      state: LearningState::New,
      repetitions: 0,
      difficulty: config::DEFAULT_DIFFICULTY,
      last_reviewed: None,
    }
  }
}
