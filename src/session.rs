//! Per-learner study session.
//!
//! Holds what the presentation layer would otherwise keep as loose UI
//! globals: the training cursor, whether the answer is revealed, which item
//! is being edited and the quiz round on screen. Every user action goes
//! through `StudySession::handle`.

use rand::Rng;

use crate::content;
use crate::db::store::{ItemPatch, ItemStore, StateFilter};
use crate::domain::{
  DirectionPolicy, ItemEdit, LearningState, QuizFeedback, QuizRound, ReviewFailurePolicy,
  VocabItem,
};
use crate::error::Result;
use crate::srs::{
  build_round, eligible_for_training, record_outcome, reset_item, review_pool, submit_answer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
  #[default]
  Training,
  Review,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
  SwitchView(View),
  Reveal,
  MarkMemorized,
  MarkNotMemorized,
  MarkReviewLater,
  AnswerQuiz(String),
  /// Drop the current round without scoring it
  Skip,
  BeginEdit,
  Edit(ItemEdit),
  CancelEdit,
  GoNext,
  GoPrevious,
  GoRandom,
  Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
  ViewChanged(View),
  Revealed,
  /// A training item after a mark, edit or reset
  Updated(VocabItem),
  Answered(QuizFeedback),
  RoundSkipped,
  EditStarted(i64),
  EditCancelled,
  Moved { index: usize, len: usize },
  /// No item or round to act on
  Idle,
}

/// Map a raw cursor onto a list of `len` items: past the end wraps to the
/// start, below zero wraps to the last item.
pub fn wrap_index(index: i64, len: usize) -> usize {
  if len == 0 {
    return 0;
  }
  if index < 0 {
    len - 1
  } else if index as usize >= len {
    0
  } else {
    index as usize
  }
}

#[derive(Debug, Clone, Default)]
pub struct StudySession {
  pub view: View,
  /// Cursor into the training list
  pub index: i64,
  pub revealed: bool,
  pub editing: Option<i64>,
  pub round: Option<QuizRound>,
  pub direction_policy: DirectionPolicy,
  pub failure_policy: ReviewFailurePolicy,
}

impl StudySession {
  pub fn new(direction_policy: DirectionPolicy, failure_policy: ReviewFailurePolicy) -> Self {
    Self {
      direction_policy,
      failure_policy,
      ..Default::default()
    }
  }

  /// Training item under the cursor without side effects. Normalizes the cursor.
  fn cursor_item<S: ItemStore>(&mut self, store: &S) -> Result<Option<(VocabItem, usize)>> {
    let mut items = eligible_for_training(store)?;
    let len = items.len();
    if len == 0 {
      self.index = 0;
      return Ok(None);
    }
    let idx = wrap_index(self.index, len);
    self.index = idx as i64;
    Ok(Some((items.swap_remove(idx), len)))
  }

  /// The item to show in training. A missing mnemonic is generated and saved.
  pub fn current_training_item<S: ItemStore>(&mut self, store: &S) -> Result<Option<VocabItem>> {
    let Some((mut item, _)) = self.cursor_item(store)? else {
      return Ok(None);
    };
    if item.mnemonic.is_none() {
      let patch = ItemPatch {
        mnemonic: Some(Some(content::auto_mnemonic(&item.source_text, &item.target_text))),
        ..Default::default()
      };
      store.update(item.id, &patch)?;
      patch.apply_to(&mut item);
      tracing::debug!("Backfilled mnemonic for item {}", item.id);
    }
    Ok(Some(item))
  }

  /// The round on screen, built from the review pool on first use
  pub fn current_round<S, R>(&mut self, store: &S, rng: &mut R) -> Result<&QuizRound>
  where
    S: ItemStore,
    R: Rng + ?Sized,
  {
    let round = match self.round.take() {
      Some(round) => round,
      None => {
        let pool = review_pool(store)?;
        build_round(&pool, self.direction_policy, rng)?
      }
    };
    Ok(&*self.round.insert(round))
  }

  /// Position for display as (1-based index, list length)
  pub fn position<S: ItemStore>(&mut self, store: &S) -> Result<(usize, usize)> {
    Ok(match self.cursor_item(store)? {
      Some((_, len)) => (self.index as usize + 1, len),
      None => (0, 0),
    })
  }

  fn mark<S: ItemStore>(
    &mut self,
    store: &S,
    was_correct: Option<bool>,
    state: LearningState,
    advance: bool,
  ) -> Result<ActionOutcome> {
    let Some((item, _)) = self.cursor_item(store)? else {
      return Ok(ActionOutcome::Idle);
    };
    let updated = record_outcome(store, item.id, was_correct, state)?;
    self.revealed = false;
    if advance {
      // Wrapped on the next read, the list may have shrunk
      self.index += 1;
    }
    Ok(ActionOutcome::Updated(updated))
  }

  fn navigate<S, R>(&mut self, store: &S, action: &UserAction, rng: &mut R) -> Result<ActionOutcome>
  where
    S: ItemStore,
    R: Rng + ?Sized,
  {
    let len = store.count(StateFilter::NotMastered)?.max(0) as usize;
    if len == 0 {
      self.index = 0;
      return Ok(ActionOutcome::Idle);
    }
    let idx = wrap_index(self.index, len);
    let next = match action {
      UserAction::GoNext if idx + 1 < len => idx + 1,
      UserAction::GoPrevious if idx > 0 => idx - 1,
      UserAction::GoRandom => rng.random_range(0..len),
      _ => idx,
    };
    self.index = next as i64;
    self.revealed = false;
    Ok(ActionOutcome::Moved { index: next, len })
  }

  /// Apply one user action
  pub fn handle<S, R>(&mut self, store: &S, action: UserAction, rng: &mut R) -> Result<ActionOutcome>
  where
    S: ItemStore,
    R: Rng + ?Sized,
  {
    match action {
      UserAction::SwitchView(view) => {
        self.view = view;
        self.revealed = false;
        self.editing = None;
        self.round = None;
        Ok(ActionOutcome::ViewChanged(view))
      }
      UserAction::Reveal => {
        if self.cursor_item(store)?.is_none() {
          return Ok(ActionOutcome::Idle);
        }
        self.revealed = true;
        Ok(ActionOutcome::Revealed)
      }
      UserAction::MarkMemorized => self.mark(store, Some(true), LearningState::Mastered, false),
      UserAction::MarkNotMemorized => self.mark(store, Some(false), LearningState::Pending, true),
      UserAction::MarkReviewLater => self.mark(store, None, LearningState::ReviewLater, true),
      UserAction::Reset => {
        let Some((item, _)) = self.cursor_item(store)? else {
          return Ok(ActionOutcome::Idle);
        };
        self.revealed = false;
        Ok(ActionOutcome::Updated(reset_item(store, item.id)?))
      }
      UserAction::AnswerQuiz(chosen) => match self.round.take() {
        Some(round) => Ok(ActionOutcome::Answered(submit_answer(
          store,
          round,
          &chosen,
          self.failure_policy,
        )?)),
        None => Ok(ActionOutcome::Idle),
      },
      UserAction::Skip => match self.round.take() {
        Some(_) => Ok(ActionOutcome::RoundSkipped),
        None => Ok(ActionOutcome::Idle),
      },
      UserAction::BeginEdit => match self.cursor_item(store)? {
        Some((item, _)) => {
          self.editing = Some(item.id);
          Ok(ActionOutcome::EditStarted(item.id))
        }
        None => Ok(ActionOutcome::Idle),
      },
      UserAction::Edit(edit) => {
        let target = match self.editing {
          Some(id) => id,
          None => match self.cursor_item(store)? {
            Some((item, _)) => item.id,
            None => return Ok(ActionOutcome::Idle),
          },
        };
        edit.validate()?;
        let patch = ItemPatch::from(edit);
        store.update(target, &patch)?;
        self.editing = None;
        tracing::debug!("Edited item {}", target);
        Ok(ActionOutcome::Updated(store.get_by_id(target)?))
      }
      UserAction::CancelEdit => {
        self.editing = None;
        Ok(ActionOutcome::EditCancelled)
      }
      UserAction::GoNext | UserAction::GoPrevious | UserAction::GoRandom => {
        self.navigate(store, &action, rng)
      }
    }
  }
}
