//! Award pack configuration.
//!
//! An award pack is a directory of YAML files describing one award: its
//! metadata, classifications, base rates, and declarative rules. A loaded
//! pack doubles as a file-backed rule store and base rate source for the
//! calculation runner.

mod loader;
mod types;

pub use loader::AwardPackLoader;
pub use types::{AwardMetadata, AwardPack};
