//! Content helpers for palace items.

pub mod generator;

pub use generator::{assign_room, auto_mnemonic, mnemonic_or_auto};
