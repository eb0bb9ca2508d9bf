//! Award pack configuration types.
//!
//! These are the strongly-typed structures deserialized from an award pack's
//! YAML files, plus the [`AwardPack`] aggregate that serves them to the
//! engine as a rule store and base rate source.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::engine::ClassificationProfile;
use crate::error::EngineResult;
use crate::models::{BaseRate, RateNormalization, Rule, RuleKind};
use crate::store::{BaseRateSource, RuleStore};

/// Metadata about the award.
#[derive(Debug, Clone, Deserialize)]
pub struct AwardMetadata {
    /// The award code (e.g., "MA000018").
    pub code: String,
    /// The human-readable name of the award.
    pub name: String,
    /// The version or effective date of the award pack.
    pub version: String,
    /// URL to the official award documentation.
    pub source_url: String,
}

/// The `award.yaml` document: metadata plus optional normalization
/// overrides.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct AwardDocument {
    #[serde(flatten)]
    pub metadata: AwardMetadata,
    #[serde(default)]
    pub normalization: Option<RateNormalization>,
}

/// The `classifications.yaml` document.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ClassificationsDocument {
    pub classifications: Vec<ClassificationProfile>,
}

/// The `base_rates.yaml` document.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct BaseRatesDocument {
    pub base_rates: Vec<BaseRate>,
}

/// The `rules.yaml` document. Rules are held as raw YAML values so a single
/// malformed rule can be excluded without failing the whole file.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct RulesDocument {
    pub rules: Vec<serde_yaml::Value>,
}

/// A fully loaded award pack.
///
/// Serves the engine as both [`RuleStore`] and [`BaseRateSource`]; the
/// records are an immutable snapshot taken at load time.
#[derive(Debug, Clone)]
pub struct AwardPack {
    metadata: AwardMetadata,
    normalization: RateNormalization,
    classifications: Vec<ClassificationProfile>,
    base_rates: Vec<BaseRate>,
    rules: Vec<Rule>,
    excluded_rules: Vec<String>,
}

impl AwardPack {
    pub(super) fn new(
        metadata: AwardMetadata,
        normalization: RateNormalization,
        classifications: Vec<ClassificationProfile>,
        base_rates: Vec<BaseRate>,
        rules: Vec<Rule>,
        excluded_rules: Vec<String>,
    ) -> Self {
        Self {
            metadata,
            normalization,
            classifications,
            base_rates,
            rules,
            excluded_rules,
        }
    }

    /// Returns the award metadata.
    pub fn metadata(&self) -> &AwardMetadata {
        &self.metadata
    }

    /// Returns the rate normalization for this award.
    pub fn normalization(&self) -> RateNormalization {
        self.normalization
    }

    /// Returns all loaded rules, regardless of status or window.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the descriptions of rules excluded at load time because
    /// their definitions were malformed.
    pub fn excluded_rules(&self) -> &[String] {
        &self.excluded_rules
    }
}

#[async_trait]
impl RuleStore for AwardPack {
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
impl BaseRateSource for AwardPack {
    async fn classifications(&self, _award_code: &str) -> EngineResult<Vec<ClassificationProfile>> {
        Ok(self.classifications.clone())
    }

    async fn base_rates(&self, _award_code: &str) -> EngineResult<Vec<BaseRate>> {
        Ok(self.base_rates.clone())
    }
}
