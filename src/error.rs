//! Error types for the rule evaluation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during rule evaluation and
//! calculation runs.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the rule evaluation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use award_rates::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/award.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/award.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rule definition could not be parsed into a structured rule.
    ///
    /// Malformed rules are logged and excluded from the candidate set;
    /// they never abort a run.
    #[error("Malformed rule definition '{rule_id}': {message}")]
    MalformedRule {
        /// The identifier of the rule that failed to parse, if known.
        rule_id: String,
        /// A description of what made the rule unparseable.
        message: String,
    },

    /// No base rate was found for the given classification.
    #[error("Base rate not found for classification '{classification}' on date {date}")]
    BaseRateNotFound {
        /// The classification identifier.
        classification: String,
        /// The date for which the rate was requested.
        date: NaiveDate,
    },

    /// A base rate was present but zero or negative.
    #[error("Non-positive base rate {value} for classification '{classification}'")]
    NonPositiveBaseRate {
        /// The classification identifier.
        classification: String,
        /// The offending rate value, as text.
        value: String,
    },

    /// The rule store could not be reached or returned an error.
    ///
    /// This fails the whole run: a partial rule snapshot must not be trusted.
    #[error("Rule store unavailable: {message}")]
    RuleStoreUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// The result sink could not be reached or rejected a publish.
    ///
    /// This fails the whole run: a partial publish must not be trusted.
    #[error("Result sink unavailable: {message}")]
    SinkUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// An internal invariant was violated during evaluation.
    ///
    /// Fatal for the affected scenario only; the batch continues.
    #[error("Invariant violation: {message}")]
    InvariantViolation {
        /// A description of the violated invariant.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns true if the error represents a transient collaborator failure
    /// that the caller may retry.
    ///
    /// Run-level failures (rule store or result sink unavailable) are
    /// retryable; data errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::RuleStoreUnavailable { .. } | EngineError::SinkUnavailable { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
