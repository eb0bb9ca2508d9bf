//! Collaborator interfaces: rule store, base rate source, and result sink.
//!
//! The engine owns no network protocol or persistence format; it consumes
//! these traits. In-memory implementations are provided for tests, benches,
//! and embedding; the YAML award pack in [`crate::config`] provides a
//! file-backed store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::engine::ClassificationProfile;
use crate::error::{EngineError, EngineResult};
use crate::models::{BaseRate, CalculatedRate, Rule, RuleKind};

/// Supplies penalty/allowance rule records for an award scope and as-of date.
///
/// Implementations return structured rule records, not free-form code. An
/// unreachable store returns [`EngineError::RuleStoreUnavailable`], which
/// fails the whole run: a partial rule snapshot must not be trusted.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Returns the active rules for the award that are in effect on `as_of`,
    /// optionally restricted to one rule kind.
    async fn active_rules(
        &self,
        award_code: &str,
        as_of: NaiveDate,
        kind: Option<RuleKind>,
    ) -> EngineResult<Vec<Rule>>;
}

/// Supplies classification profiles and base rates for an award.
#[async_trait]
pub trait BaseRateSource: Send + Sync {
    /// Returns the classifications of the award, in a stable order.
    async fn classifications(&self, award_code: &str) -> EngineResult<Vec<ClassificationProfile>>;

    /// Returns all base rate records for the award.
    async fn base_rates(&self, award_code: &str) -> EngineResult<Vec<BaseRate>>;
}

/// Receives published calculated-rate batches.
///
/// Publishing must supersede any prior result set for the same
/// `(award, as_of)` scope: delete-then-insert or a versioned upsert, never
/// accumulation. This is what makes re-running a calculation idempotent.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Publishes a full run's results for `(award_code, as_of)`.
    async fn publish(
        &self,
        award_code: &str,
        as_of: NaiveDate,
        run_id: Uuid,
        results: Vec<CalculatedRate>,
    ) -> EngineResult<()>;
}

/// An in-memory rule store and base rate source.
///
/// Holds an immutable snapshot, which is the contractually expected shape:
/// the runner fetches once per run and never re-queries per scenario.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rules: Arc<Vec<Rule>>,
    profiles: Arc<Vec<ClassificationProfile>>,
    base_rates: Arc<Vec<BaseRate>>,
}

impl MemoryStore {
    /// Creates a store over the given records.
    pub fn new(
        rules: Vec<Rule>,
        profiles: Vec<ClassificationProfile>,
        base_rates: Vec<BaseRate>,
    ) -> Self {
        Self {
            rules: Arc::new(rules),
            profiles: Arc::new(profiles),
            base_rates: Arc::new(base_rates),
        }
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn active_rules(
        &self,
        award_code: &str,
        as_of: NaiveDate,
        kind: Option<RuleKind>,
    ) -> EngineResult<Vec<Rule>> {
        Ok(self
            .rules
            .iter()
            .filter(|r| {
                r.award_code == award_code
                    && r.is_active()
                    && r.in_effect_on(as_of)
                    && kind.is_none_or(|k| r.kind == k)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BaseRateSource for MemoryStore {
    async fn classifications(&self, _award_code: &str) -> EngineResult<Vec<ClassificationProfile>> {
        Ok(self.profiles.as_ref().clone())
    }

    async fn base_rates(&self, _award_code: &str) -> EngineResult<Vec<BaseRate>> {
        Ok(self.base_rates.as_ref().clone())
    }
}

/// An in-memory result sink with supersede semantics.
///
/// Each publish replaces the stored batch for its `(award, as_of)` key, so a
/// re-run leaves exactly one result set per scope.
#[derive(Debug, Default)]
pub struct MemorySink {
    published: Mutex<HashMap<(String, NaiveDate), (Uuid, Vec<CalculatedRate>)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the currently published results for a scope, if any.
    pub async fn results(
        &self,
        award_code: &str,
        as_of: NaiveDate,
    ) -> Option<Vec<CalculatedRate>> {
        self.published
            .lock()
            .await
            .get(&(award_code.to_string(), as_of))
            .map(|(_, results)| results.clone())
    }

    /// Returns the run id that last published for a scope, if any.
    pub async fn last_run_id(&self, award_code: &str, as_of: NaiveDate) -> Option<Uuid> {
        self.published
            .lock()
            .await
            .get(&(award_code.to_string(), as_of))
            .map(|(run_id, _)| *run_id)
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn publish(
        &self,
        award_code: &str,
        as_of: NaiveDate,
        run_id: Uuid,
        results: Vec<CalculatedRate>,
    ) -> EngineResult<()> {
        self.published
            .lock()
            .await
            .insert((award_code.to_string(), as_of), (run_id, results));
        Ok(())
    }
}

/// A rule store that always fails, for exercising run-level error handling.
#[derive(Debug, Default)]
pub struct UnavailableStore;

#[async_trait]
impl RuleStore for UnavailableStore {
    async fn active_rules(
        &self,
        _award_code: &str,
        _as_of: NaiveDate,
        _kind: Option<RuleKind>,
    ) -> EngineResult<Vec<Rule>> {
        Err(EngineError::RuleStoreUnavailable {
            message: "store configured unavailable".to_string(),
        })
    }
}
