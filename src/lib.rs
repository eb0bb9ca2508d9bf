//! Penalty and Allowance Rule Evaluation Engine for Wage Awards
//!
//! This crate computes, for a wage award, the complete set of pay rates that
//! result from applying conditional penalty and allowance rules to a base rate
//! under every relevant work scenario (employment type, day type, shift type,
//! age bracket). Rules are declarative data records; the engine matches their
//! condition sets against scenario contexts, applies matched actions in
//! priority order, and produces an auditable final rate plus a calculation
//! trace.

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
