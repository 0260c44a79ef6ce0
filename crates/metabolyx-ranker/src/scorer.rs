//! Per-pathway perturbation scoring.
//!
//! total = (Σ wᵢ·|devᵢ| / Σ wᵢ) × clinical_multiplier + min(|ΔG| / scale, cap)
//!
//! where the sums run over readings whose relevance rule matches the pathway.

use crate::normalise::{range_deviation, thermodynamic_score};
use crate::panel::LabPanel;
use metabolyx_common::Direction;
use metabolyx_config::ScoringConfig;
use metabolyx_kb::{KnowledgeBase, PathwayRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A relevant reading whose deviation exceeded the abnormal threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerFlag {
    pub key: String,
    pub label: String,
    pub deviation: f64,
    pub direction: Direction,
}

impl fmt::Display for MarkerFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.direction)
    }
}

/// Score record for one pathway. Built once per analysis, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayScore {
    pub pathway_id: String,
    pub pathway_name: String,
    pub disease: String,
    pub normalized_perturbation: f64,
    pub clinical_multiplier: f64,
    pub thermodynamic_score: f64,
    pub total_score: f64,
    pub relevant_markers: usize,
    pub relevant_weight: f64,
    pub abnormal_markers: Vec<MarkerFlag>,
}

/// Score one pathway. `None` when no submitted reading is relevant to it.
pub fn score_pathway(
    pathway: &PathwayRecord,
    panel: &LabPanel,
    kb: &KnowledgeBase,
    scoring: &ScoringConfig,
) -> Option<PathwayScore> {
    let mut perturbation = 0.0;
    let mut relevant_weight = 0.0;
    let mut relevant_markers = 0;
    let mut abnormal_markers = Vec::new();

    for rule in kb.rules.iter() {
        let Some(value) = panel.get(&rule.key) else {
            continue;
        };
        let Some(range) = kb.references.get(&rule.key) else {
            continue;
        };
        if !rule.applies_to(pathway) {
            continue;
        }

        let dev = range_deviation(value, range);
        perturbation += rule.weight * dev.abs();
        relevant_weight += rule.weight;
        relevant_markers += 1;

        if dev.abs() > scoring.abnormal_deviation {
            abnormal_markers.push(MarkerFlag {
                key: rule.key.clone(),
                label: rule.label.clone(),
                deviation: dev,
                direction: Direction::of(dev),
            });
        }
    }

    if relevant_weight == 0.0 {
        return None;
    }

    let normalized_perturbation = perturbation / relevant_weight;
    let clinical_multiplier = scoring.clinical_multiplier(&pathway.disease);
    let thermo = thermodynamic_score(
        pathway.delta_g,
        scoring.thermodynamic_scale,
        scoring.thermodynamic_cap,
    );
    let total_score = normalized_perturbation * clinical_multiplier + thermo;

    debug!(
        pathway = %pathway.id,
        relevant_markers,
        normalized = normalized_perturbation,
        total = total_score,
        "Scored pathway"
    );

    Some(PathwayScore {
        pathway_id: pathway.id.clone(),
        pathway_name: pathway.name.clone(),
        disease: pathway.disease.clone(),
        normalized_perturbation,
        clinical_multiplier,
        thermodynamic_score: thermo,
        total_score,
        relevant_markers,
        relevant_weight,
        abnormal_markers,
    })
}

/// Score every pathway in catalog order, omitting irrelevant ones.
pub fn score_pathways(panel: &LabPanel, kb: &KnowledgeBase, scoring: &ScoringConfig) -> Vec<PathwayScore> {
    kb.catalog
        .iter()
        .filter_map(|p| score_pathway(p, panel, kb, scoring))
        .collect()
}
