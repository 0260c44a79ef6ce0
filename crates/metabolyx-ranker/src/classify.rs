//! Ranking and severity classification of scored pathways.

use crate::panel::LabPanel;
use crate::scorer::PathwayScore;
use metabolyx_config::ClassificationConfig;
use metabolyx_kb::{canonical_key, KnowledgeBase, PathwayRecord, ReferenceRange};
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Ranking ─────────────────────────────────────────────────────────────────

/// Sort descending by total score. The sort is stable: equal scores keep
/// their input (catalog) order. `total_cmp` keeps the order total even if a
/// NaN slips through.
pub fn rank(mut scores: Vec<PathwayScore>) -> Vec<PathwayScore> {
    scores.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    scores
}

// ── Classification ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathwayStatus {
    DirectlyAffected,
    AtRisk,
    Normal,
}

impl PathwayStatus {
    /// Both bounds are exclusive on the upper class: a score equal to the
    /// affected threshold is at risk, one equal to the at-risk threshold is normal.
    pub fn of(normalized_perturbation: f64, thresholds: &ClassificationConfig) -> Self {
        if normalized_perturbation > thresholds.affected_threshold {
            PathwayStatus::DirectlyAffected
        } else if normalized_perturbation > thresholds.at_risk_threshold {
            PathwayStatus::AtRisk
        } else {
            PathwayStatus::Normal
        }
    }
}

impl fmt::Display for PathwayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PathwayStatus::DirectlyAffected => "Directly Affected",
            PathwayStatus::AtRisk => "At Risk",
            PathwayStatus::Normal => "Normal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingStatus {
    Low,
    High,
    /// Inside the interval but above the risk quantile
    UpperNormal,
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FindingStatus::Low => "Low",
            FindingStatus::High => "High",
            FindingStatus::UpperNormal => "Upper normal range",
        };
        f.write_str(s)
    }
}

/// One of a pathway's declared clinical biomarkers, explaining its class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerFinding {
    /// Name as declared on the pathway, e.g. "C-peptide"
    pub name: String,
    pub key: String,
    pub value: f64,
    pub status: FindingStatus,
}

impl fmt::Display for BiomarkerFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedPathway {
    pub pathway_id: String,
    pub name: String,
    pub disease: String,
    pub normalized_perturbation: f64,
    pub score: f64,
    pub abnormal_biomarkers: Vec<BiomarkerFinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtRiskPathway {
    pub pathway_id: String,
    pub name: String,
    pub disease: String,
    pub normalized_perturbation: f64,
    pub score: f64,
    pub risk_factors: Vec<BiomarkerFinding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub directly_affected: Vec<AffectedPathway>,
    pub at_risk: Vec<AtRiskPathway>,
}

/// Partition scores into directly affected and at risk, preserving input order.
pub fn classify(
    scores: &[PathwayScore],
    panel: &LabPanel,
    kb: &KnowledgeBase,
    thresholds: &ClassificationConfig,
) -> Classification {
    let mut out = Classification::default();

    for score in scores {
        let Some(pathway) = kb.catalog.get(&score.pathway_id) else {
            continue;
        };
        match PathwayStatus::of(score.normalized_perturbation, thresholds) {
            PathwayStatus::DirectlyAffected => out.directly_affected.push(AffectedPathway {
                pathway_id: score.pathway_id.clone(),
                name: score.pathway_name.clone(),
                disease: score.disease.clone(),
                normalized_perturbation: score.normalized_perturbation,
                score: score.total_score,
                abnormal_biomarkers: abnormal_biomarkers(pathway, panel, kb),
            }),
            PathwayStatus::AtRisk => out.at_risk.push(AtRiskPathway {
                pathway_id: score.pathway_id.clone(),
                name: score.pathway_name.clone(),
                disease: score.disease.clone(),
                normalized_perturbation: score.normalized_perturbation,
                score: score.total_score,
                risk_factors: risk_factors(pathway, panel, kb, thresholds.risk_quantile),
            }),
            PathwayStatus::Normal => {}
        }
    }

    out
}

/// Declared biomarkers with a reading and a reference range, as
/// `(declared name, key, value, range)`.
fn declared_readings<'a>(
    pathway: &'a PathwayRecord,
    panel: &'a LabPanel,
    kb: &'a KnowledgeBase,
) -> impl Iterator<Item = (&'a str, String, f64, &'a ReferenceRange)> + 'a {
    pathway.biomarkers.iter().filter_map(move |name| {
        let key = canonical_key(name);
        let value = panel.get(&key)?;
        let range = kb.references.get(&key)?;
        Some((name.as_str(), key, value, range))
    })
}

/// Declared biomarkers outside their reference interval.
pub fn abnormal_biomarkers(
    pathway: &PathwayRecord,
    panel: &LabPanel,
    kb: &KnowledgeBase,
) -> Vec<BiomarkerFinding> {
    declared_readings(pathway, panel, kb)
        .filter_map(|(name, key, value, range)| {
            let status = if value < range.min {
                FindingStatus::Low
            } else if value > range.max {
                FindingStatus::High
            } else {
                return None;
            };
            Some(BiomarkerFinding { name: name.to_string(), key, value, status })
        })
        .collect()
}

/// Declared biomarkers inside their interval but above the `quantile` cut.
/// Low-normal values are never risk factors.
pub fn risk_factors(
    pathway: &PathwayRecord,
    panel: &LabPanel,
    kb: &KnowledgeBase,
    quantile: f64,
) -> Vec<BiomarkerFinding> {
    declared_readings(pathway, panel, kb)
        .filter(|(_, _, value, range)| range.contains(*value) && *value > range.quantile_cut(quantile))
        .map(|(name, key, value, _)| BiomarkerFinding {
            name: name.to_string(),
            key,
            value,
            status: FindingStatus::UpperNormal,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn score(id: &str, normalized: f64, total: f64) -> PathwayScore {
        PathwayScore {
            pathway_id: id.to_string(),
            pathway_name: id.to_uppercase(),
            disease: "Metabolic Disorders".to_string(),
            normalized_perturbation: normalized,
            clinical_multiplier: 1.0,
            thermodynamic_score: 0.0,
            total_score: total,
            relevant_markers: 1,
            relevant_weight: 1.0,
            abnormal_markers: vec![],
        }
    }

    #[test]
    fn test_rank_descending_and_stable() {
        let ranked = rank(vec![
            score("a", 1.0, 3.0),
            score("b", 1.0, 5.0),
            score("c", 1.0, 3.0),
            score("d", 1.0, 1.0),
            score("e", 1.0, 3.0),
        ]);
        let ids: Vec<_> = ranked.iter().map(|s| s.pathway_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c", "e", "d"]);
    }

    #[test]
    fn test_rank_with_nan_scores_is_total() {
        let mut scores: Vec<_> = (0..40)
            .map(|i| score(&format!("p{i:02}"), 1.0, (i % 7) as f64))
            .collect();
        scores[3].total_score = f64::NAN;
        scores[17].total_score = f64::NAN;
        scores[29].total_score = f64::INFINITY;

        let ranked = rank(scores);
        let finite: Vec<_> = ranked
            .iter()
            .map(|s| s.total_score)
            .filter(|t| t.is_finite())
            .collect();
        assert_eq!(finite.len(), 37);
        for pair in finite.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert_eq!(ranked.iter().filter(|s| s.total_score.is_nan()).count(), 2);
        let inf_at = ranked.iter().position(|s| s.total_score == f64::INFINITY);
        let first_finite = ranked.iter().position(|s| s.total_score.is_finite());
        assert!(inf_at < first_finite);
    }

    #[test]
    fn test_status_thresholds_are_strict() {
        let t = ClassificationConfig::default();
        assert_eq!(PathwayStatus::of(1.5000001, &t), PathwayStatus::DirectlyAffected);
        assert_eq!(PathwayStatus::of(1.5, &t), PathwayStatus::AtRisk);
        assert_eq!(PathwayStatus::of(0.5000001, &t), PathwayStatus::AtRisk);
        assert_eq!(PathwayStatus::of(0.5, &t), PathwayStatus::Normal);
        assert_eq!(PathwayStatus::of(0.0, &t), PathwayStatus::Normal);
    }

    #[test]
    fn test_explanations_use_declared_names() {
        let kb = KnowledgeBase::bundled().unwrap();
        // hsa04910 Insulin Signaling declares C-peptide among its biomarkers
        let pathway = kb.catalog.get("hsa04910").unwrap();
        assert!(pathway.biomarkers.iter().any(|b| b == "C-peptide"));

        let panel = LabPanel::from_values([("c_peptide", 6.0), ("insulin", 10.0)], &kb).panel;
        let found = abnormal_biomarkers(pathway, &panel, &kb);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].to_string(), "C-peptide: High");
    }

    #[test]
    fn test_risk_factor_cut_is_strict_and_one_sided() {
        let kb = KnowledgeBase::bundled().unwrap();
        let pathway = kb.catalog.get("hsa00010").unwrap();

        // glucose 70-100: cut at 92.5
        let at_cut = LabPanel::from_values([("glucose", 92.5)], &kb).panel;
        assert!(risk_factors(pathway, &at_cut, &kb, 0.75).is_empty());

        let above = LabPanel::from_values([("glucose", 95.0)], &kb).panel;
        let found = risk_factors(pathway, &above, &kb, 0.75);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].to_string(), "Glucose: Upper normal range");

        let low_normal = LabPanel::from_values([("glucose", 71.0)], &kb).panel;
        assert!(risk_factors(pathway, &low_normal, &kb, 0.75).is_empty());

        let out_of_range = LabPanel::from_values([("glucose", 140.0)], &kb).panel;
        assert!(risk_factors(pathway, &out_of_range, &kb, 0.75).is_empty());
    }

    #[test]
    fn test_classify_partitions_in_input_order() {
        let kb = KnowledgeBase::bundled().unwrap();
        let scores = vec![
            score("hsa00020", 0.8, 2.0),
            score("hsa00010", 3.0, 9.0),
            score("hsa00220", 0.2, 0.5),
            score("hsa04910", 1.5, 4.0),
        ];
        let c = classify(&scores, &LabPanel::default(), &kb, &ClassificationConfig::default());
        let affected: Vec<_> = c.directly_affected.iter().map(|p| p.pathway_id.as_str()).collect();
        let at_risk: Vec<_> = c.at_risk.iter().map(|p| p.pathway_id.as_str()).collect();
        assert_eq!(affected, vec!["hsa00010"]);
        assert_eq!(at_risk, vec!["hsa00020", "hsa04910"]);
    }
}
