pub mod config;
pub mod content;
pub mod db;
pub mod domain;
pub mod error;
pub mod paths;
pub mod session;
pub mod srs;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{Error, Result};
