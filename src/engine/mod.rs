//! The rule evaluation and scenario-combination engine.
//!
//! This module contains the condition matcher, the rule evaluator, the
//! scenario enumerator, and the calculation runner that orchestrates them
//! over all classifications of an award.

mod enumerator;
mod evaluator;
mod matcher;
mod runner;

pub use enumerator::{enumerate_scenarios, ClassificationProfile, JUNIOR_AGES};
pub use evaluator::{evaluate, RateScope};
pub use matcher::{all_match, matches};
pub use runner::CalculationRunner;
