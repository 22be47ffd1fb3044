use rand::Rng;
use serde::{Deserialize, Serialize};

use super::VocabItem;

/// Which language the prompt is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizDirection {
  /// Prompt in the source language, options are meanings
  SourceToTarget,
  /// Prompt is the meaning, options are source-language words
  TargetToSource,
}

impl QuizDirection {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "source_to_target" => Some(Self::SourceToTarget),
      "target_to_source" => Some(Self::TargetToSource),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::SourceToTarget => "source_to_target",
      Self::TargetToSource => "target_to_source",
    }
  }

  pub fn prompt_of<'a>(&self, item: &'a VocabItem) -> &'a str {
    match self {
      Self::SourceToTarget => &item.source_text,
      Self::TargetToSource => &item.target_text,
    }
  }

  pub fn answer_of<'a>(&self, item: &'a VocabItem) -> &'a str {
    match self {
      Self::SourceToTarget => &item.target_text,
      Self::TargetToSource => &item.source_text,
    }
  }
}

/// How the direction of each round is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionPolicy {
  /// Fair coin per round
  #[default]
  Random,
  Fixed(QuizDirection),
}

impl DirectionPolicy {
  /// Accepts "random" or a direction key
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "random" => Some(Self::Random),
      other => QuizDirection::from_str(other).map(Self::Fixed),
    }
  }

  pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> QuizDirection {
    match self {
      Self::Random => {
        if rng.random_bool(0.5) {
          QuizDirection::SourceToTarget
        } else {
          QuizDirection::TargetToSource
        }
      }
      Self::Fixed(direction) => *direction,
    }
  }
}

/// What a wrong quiz answer does to a mastered item.
///
/// `Reinforce` keeps the item in the review pool and only raises its
/// difficulty. `Demote` sends it back to training as `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewFailurePolicy {
  #[default]
  Reinforce,
  Demote,
}

impl ReviewFailurePolicy {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "reinforce" => Some(Self::Reinforce),
      "demote" => Some(Self::Demote),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Reinforce => "reinforce",
      Self::Demote => "demote",
    }
  }
}

/// One multiple-choice prompt. Consumed when an answer is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRound {
  pub item_id: i64,
  pub direction: QuizDirection,
  pub prompt: String,
  pub correct_answer: String,
  /// Shuffled; contains `correct_answer` exactly once
  pub options: Vec<String>,
}

impl QuizRound {
  /// Fewer than four options means the pool ran short of distinct answers
  pub fn is_degraded(&self) -> bool {
    self.options.len() < crate::config::DISTRACTOR_COUNT + 1
  }
}

/// Result of scoring a round, for display
#[derive(Debug, Clone, PartialEq)]
pub struct QuizFeedback {
  pub correct: bool,
  pub correct_answer: String,
  /// The target item as persisted after the outcome
  pub item: VocabItem,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{NewItem, PalaceRoom};
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn item() -> VocabItem {
    VocabItem::from_new(1, NewItem::new("кот", "cat"), PalaceRoom::Attic)
  }

  #[test]
  fn test_direction_fields() {
    let item = item();
    assert_eq!(QuizDirection::SourceToTarget.prompt_of(&item), "кот");
    assert_eq!(QuizDirection::SourceToTarget.answer_of(&item), "cat");
    assert_eq!(QuizDirection::TargetToSource.prompt_of(&item), "cat");
    assert_eq!(QuizDirection::TargetToSource.answer_of(&item), "кот");
  }

  #[test]
  fn test_direction_policy_from_str() {
    assert_eq!(DirectionPolicy::from_str("random"), Some(DirectionPolicy::Random));
    assert_eq!(
      DirectionPolicy::from_str("source_to_target"),
      Some(DirectionPolicy::Fixed(QuizDirection::SourceToTarget))
    );
    assert_eq!(DirectionPolicy::from_str("sideways"), None);
  }

  #[test]
  fn test_fixed_policy_always_same() {
    let mut rng = StdRng::seed_from_u64(1);
    let policy = DirectionPolicy::Fixed(QuizDirection::TargetToSource);
    for _ in 0..20 {
      assert_eq!(policy.pick(&mut rng), QuizDirection::TargetToSource);
    }
  }

  #[test]
  fn test_random_policy_uses_both_directions() {
    let mut rng = StdRng::seed_from_u64(99);
    let picks: Vec<_> = (0..200).map(|_| DirectionPolicy::Random.pick(&mut rng)).collect();
    let forward = picks.iter().filter(|d| **d == QuizDirection::SourceToTarget).count();
    assert!(forward > 60 && forward < 140, "forward = {forward}");
  }

  #[test]
  fn test_failure_policy_roundtrip() {
    for policy in [ReviewFailurePolicy::Reinforce, ReviewFailurePolicy::Demote] {
      assert_eq!(ReviewFailurePolicy::from_str(policy.as_str()), Some(policy));
    }
    assert_eq!(ReviewFailurePolicy::default(), ReviewFailurePolicy::Reinforce);
  }
}
