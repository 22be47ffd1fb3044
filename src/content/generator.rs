//! Palace content generation
//!
//! Fills in what a learner did not supply: a default mnemonic sentence and a
//! room in the palace. Room choice is uniform and independent of the word.

use rand::Rng;

use crate::domain::PalaceRoom;

/// Default mnemonic used when none is supplied
pub fn auto_mnemonic(source_text: &str, target_text: &str) -> String {
  format!("Visualize: {} while you hear '{}'", target_text.trim(), source_text.trim())
}

/// Keep a supplied mnemonic, generate one when it is missing or blank
pub fn mnemonic_or_auto(mnemonic: Option<&str>, source_text: &str, target_text: &str) -> String {
  match mnemonic.map(str::trim) {
    Some(m) if !m.is_empty() => m.to_string(),
    _ => auto_mnemonic(source_text, target_text),
  }
}

/// Draw the room for a new item
pub fn assign_room<R: Rng + ?Sized>(rng: &mut R) -> PalaceRoom {
  PalaceRoom::random(rng)
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  #[test]
  fn test_auto_mnemonic_mentions_both_sides() {
    let text = auto_mnemonic(" дом ", "house");
    assert_eq!(text, "Visualize: house while you hear 'дом'");
  }

  #[test]
  fn test_keeps_supplied_mnemonic() {
    assert_eq!(mnemonic_or_auto(Some(" a dome "), "дом", "house"), "a dome");
  }

  #[test]
  fn test_generates_missing_mnemonic() {
    assert_eq!(mnemonic_or_auto(None, "дом", "house"), auto_mnemonic("дом", "house"));
    assert_eq!(mnemonic_or_auto(Some("  "), "дом", "house"), auto_mnemonic("дом", "house"));
  }

  #[test]
  fn test_room_assignment_is_seedable() {
    let a = assign_room(&mut StdRng::seed_from_u64(11));
    let b = assign_room(&mut StdRng::seed_from_u64(11));
    assert_eq!(a, b);
  }
}
