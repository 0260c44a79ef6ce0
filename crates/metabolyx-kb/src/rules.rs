//! Biomarker relevance table.
//!
//! One entry per recognised biomarker key: the compounds and disease labels
//! that make the biomarker relevant to a pathway, and the clinical weight its
//! deviation carries. The table order is the order markers are evaluated and
//! flagged in.

use crate::dedup::collapse_duplicates;
use crate::pathway::PathwayRecord;
use metabolyx_common::{MetabolyxError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerRule {
    /// snake_case reading key, e.g. "c_peptide"
    pub key: String,
    /// Display label used in abnormal-marker flags, e.g. "C-peptide"
    pub label: String,
    pub weight: f64,
    /// KEGG compound ids; membership in a pathway grants relevance
    #[serde(default)]
    pub compounds: Vec<String>,
    /// Disease labels; a pathway with one of these grants relevance
    #[serde(default)]
    pub diseases: Vec<String>,
    /// Zero is not a physically valid reading for this marker
    #[serde(default)]
    pub strictly_positive: bool,
}

impl BiomarkerRule {
    pub fn applies_to(&self, pathway: &PathwayRecord) -> bool {
        self.compounds.iter().any(|c| pathway.has_compound(c))
            || self.diseases.iter().any(|d| *d == pathway.disease)
    }

    fn validate(&self) -> Result<()> {
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(MetabolyxError::InvalidRule {
                key: self.key.clone(),
                reason: format!("weight must be finite and > 0, got {}", self.weight),
            });
        }
        if self.label.trim().is_empty() {
            return Err(MetabolyxError::InvalidRule {
                key: self.key.clone(),
                reason: "label is empty".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<BiomarkerRule>,
    index: HashMap<String, usize>,
}

impl RuleTable {
    pub fn new(rules: Vec<BiomarkerRule>) -> Result<Self> {
        for rule in &rules {
            rule.validate()?;
        }
        let rules = collapse_duplicates(rules, "biomarker rule", |r| r.key.as_str())?;
        let index = rules
            .iter()
            .enumerate()
            .map(|(i, r)| (r.key.clone(), i))
            .collect();
        Ok(Self { rules, index })
    }

    pub fn from_yaml_str(src: &str) -> Result<Self> {
        let rules: Vec<BiomarkerRule> = serde_yaml::from_str(src)?;
        Self::new(rules)
    }

    pub fn get(&self, key: &str) -> Option<&BiomarkerRule> {
        self.index.get(key).map(|&i| &self.rules[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &BiomarkerRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::PathwayCatalog;

    fn catalog() -> PathwayCatalog {
        PathwayCatalog::from_yaml_str(
            r#"
- id: "hsa00010"
  name: "Glycolysis / Gluconeogenesis"
  compounds: ["C00031", "C00022"]
  compound_names: ["D-Glucose", "Pyruvate"]
  delta_g: -73.3
  disease: "Diabetes Mellitus"
- id: "hsa00620"
  name: "Pyruvate Metabolism"
  compounds: ["C00022"]
  compound_names: ["Pyruvate"]
  delta_g: -30.0
  disease: "Metabolic Disorders"
- id: "hsa04960"
  name: "Aldosterone-Regulated Sodium Reabsorption"
  delta_g: -45.2
  disease: "Chronic Kidney Disease"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_relevance_by_compound_or_disease() {
        let rules = RuleTable::from_yaml_str(
            r#"
- key: glucose
  label: Glucose
  weight: 2.0
  compounds: ["C00031"]
  diseases: ["Diabetes Mellitus"]
- key: creatinine
  label: Creatinine
  weight: 1.3
  diseases: ["Chronic Kidney Disease"]
- key: pyruvate
  label: Pyruvate
  weight: 1.2
  compounds: ["C00022"]
"#,
        )
        .unwrap();
        let catalog = catalog();
        let glycolysis = catalog.get("hsa00010").unwrap();
        let pyruvate_pw = catalog.get("hsa00620").unwrap();
        let kidney = catalog.get("hsa04960").unwrap();

        let glucose = rules.get("glucose").unwrap();
        assert!(glucose.applies_to(glycolysis));
        assert!(!glucose.applies_to(kidney));

        let creatinine = rules.get("creatinine").unwrap();
        assert!(creatinine.applies_to(kidney));
        assert!(!creatinine.applies_to(glycolysis));

        let pyruvate = rules.get("pyruvate").unwrap();
        assert!(pyruvate.applies_to(glycolysis));
        assert!(pyruvate.applies_to(pyruvate_pw));
        assert!(!pyruvate.applies_to(kidney));
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        let err = RuleTable::from_yaml_str("- {key: x, label: X, weight: 0.0}").unwrap_err();
        assert!(matches!(err, MetabolyxError::InvalidRule { .. }));
    }

    #[test]
    fn test_table_order_preserved() {
        let rules = RuleTable::from_yaml_str(
            "- {key: b, label: B, weight: 1.0}\n- {key: a, label: A, weight: 1.0}",
        )
        .unwrap();
        let keys: Vec<_> = rules.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
