//! Award pack loading.
//!
//! Loads an award pack from a directory of YAML files:
//!
//! ```text
//! packs/ma000018/
//! ├── award.yaml            # Award metadata and normalization overrides
//! ├── classifications.yaml  # Classification profiles
//! ├── base_rates.yaml       # Base rate records
//! └── rules.yaml            # Penalty and allowance rules
//! ```
//!
//! Every file must parse as a whole, but individual rule documents inside
//! `rules.yaml` are parsed leniently: a malformed rule is logged and
//! excluded from the loaded set so the remaining rules stay usable.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{RateNormalization, Rule};

use super::types::{
    AwardDocument, AwardPack, BaseRatesDocument, ClassificationsDocument, RulesDocument,
};

/// Loads award packs from disk or from in-memory YAML.
///
/// # Example
///
/// ```no_run
/// use award_rates::config::AwardPackLoader;
///
/// let pack = AwardPackLoader::load("./packs/ma000018")?;
/// println!("{} rules loaded", pack.rules().len());
/// # Ok::<(), award_rates::error::EngineError>(())
/// ```
#[derive(Debug)]
pub struct AwardPackLoader;

impl AwardPackLoader {
    /// Loads an award pack from the specified directory.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<AwardPack> {
        let path = path.as_ref();

        let award = Self::read_file(&path.join("award.yaml"))?;
        let classifications = Self::read_file(&path.join("classifications.yaml"))?;
        let base_rates = Self::read_file(&path.join("base_rates.yaml"))?;
        let rules = Self::read_file(&path.join("rules.yaml"))?;

        Self::from_yaml(&award, &classifications, &base_rates, &rules)
    }

    /// Builds an award pack from in-memory YAML documents.
    ///
    /// This is the same parse path as [`AwardPackLoader::load`]; only the
    /// file reading differs.
    pub fn from_yaml(
        award: &str,
        classifications: &str,
        base_rates: &str,
        rules: &str,
    ) -> EngineResult<AwardPack> {
        let award: AwardDocument = Self::parse_yaml("award.yaml", award)?;
        let classifications: ClassificationsDocument =
            Self::parse_yaml("classifications.yaml", classifications)?;
        let base_rates: BaseRatesDocument = Self::parse_yaml("base_rates.yaml", base_rates)?;
        let rules_doc: RulesDocument = Self::parse_yaml("rules.yaml", rules)?;

        let (rules, excluded) = Self::parse_rules(rules_doc);

        Ok(AwardPack::new(
            award.metadata,
            award.normalization.unwrap_or_else(RateNormalization::default),
            classifications.classifications,
            base_rates.base_rates,
            rules,
            excluded,
        ))
    }

    fn read_file(path: &Path) -> EngineResult<String> {
        fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path.display().to_string(),
        })
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(name: &str, content: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: name.to_string(),
            message: e.to_string(),
        })
    }

    /// Parses each rule document individually. A rule that fails to parse is
    /// excluded and reported, never fatal.
    fn parse_rules(document: RulesDocument) -> (Vec<Rule>, Vec<String>) {
        let mut rules = Vec::with_capacity(document.rules.len());
        let mut excluded = Vec::new();

        for value in document.rules {
            let rule_id = value
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("<unknown>")
                .to_string();
            match serde_yaml::from_value::<Rule>(value) {
                Ok(rule) => rules.push(rule),
                Err(e) => {
                    let error = EngineError::MalformedRule {
                        rule_id: rule_id.clone(),
                        message: e.to_string(),
                    };
                    warn!(rule_id = %rule_id, %error, "rule_excluded");
                    excluded.push(error.to_string());
                }
            }
        }

        (rules, excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RuleAction, RuleKind};
    use crate::store::{BaseRateSource, RuleStore};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const AWARD_YAML: &str = r#"
code: MA000018
name: Aged Care Award 2010
version: "2025-07-01"
source_url: https://library.fairwork.gov.au/award/?krn=MA000018
"#;

    const CLASSIFICATIONS_YAML: &str = r#"
classifications:
  - id: level_3
    name: Direct Care Employee Level 3
  - id: level_1
    name: Direct Care Employee Level 1
    junior_rates: true
    attribute_flags: [certified_first_aid]
"#;

    const BASE_RATES_YAML: &str = r#"
base_rates:
  - classification_id: level_3
    value: "25.00"
    unit: hourly
    effective_from: 2025-07-01
  - classification_id: level_1
    value: "912.00"
    unit: weekly
    effective_from: 2025-07-01
"#;

    const RULES_YAML: &str = r#"
rules:
  - id: casual_loading
    award_code: MA000018
    name: Casual Loading
    kind: penalty
    priority: 50
    status: active
    conditions:
      - type: field_in_set
        field: employment_type
        values: [casual]
    action:
      type: multiplier
      factor: "1.25"
    effective_from: 2025-07-01
    reference: 10.4(b)
  - id: sunday_penalty
    award_code: MA000018
    name: Sunday Penalty
    kind: penalty
    priority: 130
    status: active
    conditions:
      - type: field_in_set
        field: day_type
        values: [sunday]
    action:
      type: multiplier
      factor: "2.0"
    effective_from: 2025-07-01
"#;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn load_pack() -> AwardPack {
        AwardPackLoader::from_yaml(AWARD_YAML, CLASSIFICATIONS_YAML, BASE_RATES_YAML, RULES_YAML)
            .unwrap()
    }

    #[test]
    fn test_loads_metadata_and_defaults_normalization() {
        let pack = load_pack();
        assert_eq!(pack.metadata().code, "MA000018");
        assert_eq!(pack.metadata().name, "Aged Care Award 2010");
        assert_eq!(
            pack.normalization().weekly_divisor,
            Decimal::from_str("38").unwrap()
        );
    }

    #[test]
    fn test_normalization_override() {
        let award = r#"
code: MA000018
name: Aged Care Award 2010
version: "2025-07-01"
source_url: https://example.invalid/award
normalization:
  weekly_divisor: "40"
  annual_divisor: "2080"
"#;
        let pack = AwardPackLoader::from_yaml(
            award,
            CLASSIFICATIONS_YAML,
            BASE_RATES_YAML,
            RULES_YAML,
        )
        .unwrap();
        assert_eq!(
            pack.normalization().weekly_divisor,
            Decimal::from_str("40").unwrap()
        );
    }

    #[tokio::test]
    async fn test_loads_classification_profiles() {
        let pack = load_pack();
        let profiles = pack.classifications("MA000018").await.unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].id, "level_3");
        assert!(!profiles[0].junior_rates);
        assert!(profiles[1].junior_rates);
        assert_eq!(profiles[1].attribute_flags, vec!["certified_first_aid"]);
    }

    #[tokio::test]
    async fn test_loads_base_rates() {
        let pack = load_pack();
        let rates = pack.base_rates("MA000018").await.unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].classification_id, "level_3");
    }

    #[tokio::test]
    async fn test_active_rules_filters_by_window() {
        let pack = load_pack();
        let rules = pack
            .active_rules("MA000018", date("2025-08-01"), None)
            .await
            .unwrap();
        assert_eq!(rules.len(), 2);

        let none = pack
            .active_rules("MA000018", date("2025-01-01"), None)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_active_rules_filters_by_kind() {
        let pack = load_pack();
        let allowances = pack
            .active_rules("MA000018", date("2025-08-01"), Some(RuleKind::Allowance))
            .await
            .unwrap();
        assert!(allowances.is_empty());
    }

    #[test]
    fn test_malformed_rule_is_excluded_not_fatal() {
        let rules = r#"
rules:
  - id: broken_rule
    award_code: MA000018
    name: Broken
    kind: penalty
    priority: 10
    status: active
    action:
      type: warp_factor
      factor: "9"
    effective_from: 2025-07-01
  - id: casual_loading
    award_code: MA000018
    name: Casual Loading
    kind: penalty
    priority: 50
    status: active
    action:
      type: multiplier
      factor: "1.25"
    effective_from: 2025-07-01
"#;
        let pack =
            AwardPackLoader::from_yaml(AWARD_YAML, CLASSIFICATIONS_YAML, BASE_RATES_YAML, rules)
                .unwrap();

        assert_eq!(pack.rules().len(), 1);
        assert_eq!(pack.rules()[0].id, "casual_loading");
        assert_eq!(pack.excluded_rules().len(), 1);
        assert!(pack.excluded_rules()[0].contains("broken_rule"));
    }

    #[test]
    fn test_loaded_rule_round_trips_action() {
        let pack = load_pack();
        let casual = pack
            .rules()
            .iter()
            .find(|r| r.id == "casual_loading")
            .unwrap();
        assert_eq!(
            casual.action,
            RuleAction::Multiplier {
                factor: Decimal::from_str("1.25").unwrap()
            }
        );
        assert_eq!(casual.reference, "10.4(b)");
    }

    #[test]
    fn test_missing_directory_returns_config_not_found() {
        let result = AwardPackLoader::load("/nonexistent/pack");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("award.yaml"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_file_returns_parse_error() {
        let result = AwardPackLoader::from_yaml(
            "not: [valid",
            CLASSIFICATIONS_YAML,
            BASE_RATES_YAML,
            RULES_YAML,
        );
        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert_eq!(path, "award.yaml");
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
