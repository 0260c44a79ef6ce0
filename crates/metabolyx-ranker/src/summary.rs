//! Derived views over an analysis, consumed by report renderers.

use crate::classify::Classification;
use crate::panel::LabPanel;
use crate::scorer::PathwayScore;
use metabolyx_common::ReadingStatus;
use metabolyx_kb::KnowledgeBase;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Lab values ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabStatus {
    pub key: String,
    pub value: f64,
    pub unit: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub status: ReadingStatus,
}

/// Status of every reading, in vocabulary order.
pub fn lab_statuses(panel: &LabPanel, kb: &KnowledgeBase) -> Vec<LabStatus> {
    kb.vocabulary()
        .filter_map(|key| {
            let value = panel.get(key)?;
            let range = kb.references.get(key);
            Some(LabStatus {
                key: key.to_string(),
                value,
                unit: range.map(|r| r.unit.clone()),
                min: range.map(|r| r.min),
                max: range.map(|r| r.max),
                status: range.map_or(ReadingStatus::Unreferenced, |r| r.status(value)),
            })
        })
        .collect()
}

// ── Thermodynamics ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Favorability {
    Highly,
    Moderately,
    Less,
}

impl Favorability {
    pub fn of(delta_g: f64) -> Self {
        if delta_g < -50.0 {
            Favorability::Highly
        } else if delta_g < -20.0 {
            Favorability::Moderately
        } else {
            Favorability::Less
        }
    }
}

impl fmt::Display for Favorability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Favorability::Highly => "Highly Favorable",
            Favorability::Moderately => "Moderately Favorable",
            Favorability::Less => "Less Favorable",
        };
        f.write_str(s)
    }
}

// ── Flux ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluxLevel {
    High,
    Moderate,
    Low,
}

/// Illustrative flux shift for a pathway, relative to a baseline of 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxEstimate {
    pub pathway_id: String,
    pub perturbed_flux: f64,
    pub perturbation_percent: f64,
    pub level: FluxLevel,
}

impl FluxEstimate {
    pub fn from_score(score: &PathwayScore) -> Self {
        let p = score.normalized_perturbation;
        let percent = p * 30.0;
        let level = if percent > 45.0 {
            FluxLevel::High
        } else if percent > 15.0 {
            FluxLevel::Moderate
        } else {
            FluxLevel::Low
        };
        Self {
            pathway_id: score.pathway_id.clone(),
            perturbed_flux: 100.0 * (1.0 + 0.3 * p),
            perturbation_percent: percent,
            level,
        }
    }
}

// ── Summary ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub parameters_analyzed: usize,
    pub abnormal_values: usize,
    pub directly_affected: usize,
    pub at_risk: usize,
    pub top_pathway: Option<String>,
    pub top_score: Option<f64>,
    pub mean_total_score: Option<f64>,
}

impl AnalysisSummary {
    /// `ranked` must already be in rank order.
    pub fn new(
        labs: &[LabStatus],
        ranked: &[PathwayScore],
        classification: &Classification,
    ) -> Self {
        let mean_total_score = if ranked.is_empty() {
            None
        } else {
            Some(ranked.iter().map(|s| s.total_score).sum::<f64>() / ranked.len() as f64)
        };
        Self {
            parameters_analyzed: labs.len(),
            abnormal_values: labs.iter().filter(|l| l.status.is_abnormal()).count(),
            directly_affected: classification.directly_affected.len(),
            at_risk: classification.at_risk.len(),
            top_pathway: ranked.first().map(|s| s.pathway_name.clone()),
            top_score: ranked.first().map(|s| s.total_score),
            mean_total_score,
        }
    }
}
