//! Run orchestration: Enumerator × Evaluator over an award.
//!
//! The runner fetches the rule snapshot and base rates once, fans
//! classifications out across tasks (evaluation is pure, so they
//! parallelize freely), and publishes the collected results to the sink as
//! one batch at the end. Scenario-level failures are absorbed and recorded;
//! collaborator unavailability fails the run with a retryable error.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{BaseRate, RateNormalization, Rule, RunResult, RunStatus};
use crate::store::{BaseRateSource, ResultSink, RuleStore};

use super::enumerator::{enumerate_scenarios, ClassificationProfile};
use super::evaluator::{evaluate, RateScope};

/// Orchestrates full-award calculation runs.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use award_rates::engine::CalculationRunner;
/// use award_rates::store::{MemorySink, MemoryStore};
/// use chrono::NaiveDate;
///
/// # async fn example() -> award_rates::error::EngineResult<()> {
/// let store = Arc::new(MemoryStore::default());
/// let sink = Arc::new(MemorySink::new());
/// let runner = CalculationRunner::new(store.clone(), store, sink);
///
/// let as_of = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let outcome = runner.run("MA000018", as_of).await?;
/// println!("run {} finished: {}", outcome.run_id, outcome.status);
/// # Ok(())
/// # }
/// ```
pub struct CalculationRunner {
    rules: Arc<dyn RuleStore>,
    rates: Arc<dyn BaseRateSource>,
    sink: Arc<dyn ResultSink>,
    normalization: RateNormalization,
}

/// The per-classification evaluation outcome gathered from a worker task.
struct ClassificationOutcome {
    index: usize,
    results: Vec<crate::models::CalculatedRate>,
    attempted: u32,
    succeeded: u32,
    skipped: u32,
    errors: Vec<String>,
}

impl CalculationRunner {
    /// Creates a runner over the given collaborators with default rate
    /// normalization (38-hour week).
    pub fn new(
        rules: Arc<dyn RuleStore>,
        rates: Arc<dyn BaseRateSource>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            rules,
            rates,
            sink,
            normalization: RateNormalization::default(),
        }
    }

    /// Overrides the rate normalization divisors.
    pub fn with_normalization(mut self, normalization: RateNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Calculates every curated scenario for every classification of the
    /// award and publishes the batch to the result sink.
    ///
    /// Re-running for the same `(award, as_of)` is idempotent: the sink
    /// supersedes the prior result set for that scope. A run that produced
    /// no results publishes nothing, leaving any prior result set in place.
    pub async fn run(&self, award_code: &str, as_of: NaiveDate) -> EngineResult<RunResult> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, award = award_code, %as_of, "run_started");

        // One snapshot per run; never re-queried per scenario.
        let rules: Arc<Vec<Rule>> = Arc::new(self.rules.active_rules(award_code, as_of, None).await?);
        let profiles = self.rates.classifications(award_code).await?;
        let base_rates = self.rates.base_rates(award_code).await?;

        let mut tasks = JoinSet::new();
        for (index, profile) in profiles.into_iter().enumerate() {
            let base_rate = base_rates
                .iter()
                .find(|r| r.classification_id == profile.id && r.in_effect_on(as_of))
                .cloned();
            let rules = Arc::clone(&rules);
            let normalization = self.normalization;
            let award_code = award_code.to_string();

            tasks.spawn(async move {
                evaluate_classification(index, award_code, as_of, profile, base_rate, rules, normalization)
            });
        }

        let mut outcomes = Vec::new();
        let mut errors = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                // A panicked worker loses one classification, not the run.
                Err(join_error) => errors.push(format!("worker task failed: {}", join_error)),
            }
        }
        outcomes.sort_by_key(|o| o.index);

        let mut results = Vec::new();
        let mut attempted = 0u32;
        let mut succeeded = 0u32;
        let mut skipped = 0u32;
        for outcome in outcomes {
            attempted += outcome.attempted;
            succeeded += outcome.succeeded;
            skipped += outcome.skipped;
            errors.extend(outcome.errors);
            results.extend(outcome.results);
        }

        let results_published = results.len() as u32;
        // An empty batch never publishes: it would wipe previously published
        // results for the scope.
        if !results.is_empty() {
            self.sink
                .publish(award_code, as_of, run_id, results)
                .await?;
        }

        let status = if succeeded == 0 && (attempted > 0 || skipped > 0) {
            RunStatus::Failed
        } else if errors.is_empty() {
            RunStatus::Success
        } else {
            RunStatus::Partial
        };

        let run_result = RunResult {
            run_id,
            award_code: award_code.to_string(),
            as_of,
            status,
            scenarios_attempted: attempted,
            scenarios_succeeded: succeeded,
            scenarios_skipped: skipped,
            results_published,
            errors,
            started_at,
            finished_at: Some(Utc::now()),
        };
        info!(
            %run_id,
            award = award_code,
            status = %run_result.status,
            attempted = run_result.scenarios_attempted,
            succeeded = run_result.scenarios_succeeded,
            skipped = run_result.scenarios_skipped,
            errors = run_result.errors.len(),
            "run_completed"
        );
        Ok(run_result)
    }
}

/// Evaluates the curated scenario set for one classification.
///
/// Pure compute over the immutable rule snapshot; no I/O.
fn evaluate_classification(
    index: usize,
    award_code: String,
    as_of: NaiveDate,
    profile: ClassificationProfile,
    base_rate: Option<BaseRate>,
    rules: Arc<Vec<Rule>>,
    normalization: RateNormalization,
) -> ClassificationOutcome {
    let scenarios = enumerate_scenarios(&profile);
    let mut outcome = ClassificationOutcome {
        index,
        results: Vec::new(),
        attempted: 0,
        succeeded: 0,
        skipped: 0,
        errors: Vec::new(),
    };

    let Some(base_rate) = base_rate else {
        let error = EngineError::BaseRateNotFound {
            classification: profile.id.clone(),
            date: as_of,
        };
        warn!(classification = %profile.id, %error, "classification_skipped_no_base_rate");
        outcome.skipped = scenarios.len() as u32;
        outcome.errors.push(error.to_string());
        return outcome;
    };

    let base_hourly = match base_rate.hourly(&normalization) {
        Ok(hourly) => hourly,
        Err(error) => {
            warn!(classification = %profile.id, %error, "classification_skipped_bad_base_rate");
            outcome.skipped = scenarios.len() as u32;
            outcome.errors.push(error.to_string());
            return outcome;
        }
    };

    let scope = RateScope {
        award_code,
        classification_id: profile.id.clone(),
        effective_from: base_rate.effective_from,
        effective_to: base_rate.effective_to,
    };

    for scenario in &scenarios {
        outcome.attempted += 1;
        match evaluate(&scope, base_hourly, scenario, &rules, as_of) {
            Ok(calculated) => {
                outcome.succeeded += 1;
                outcome.results.push(calculated);
            }
            Err(error) => {
                warn!(
                    classification = %profile.id,
                    scenario = %scenario.label,
                    %error,
                    "scenario_failed"
                );
                outcome.errors.push(format!(
                    "Scenario '{}' for classification '{}': {}",
                    scenario.label, profile.id, error
                ));
            }
        }
    }

    outcome
}
