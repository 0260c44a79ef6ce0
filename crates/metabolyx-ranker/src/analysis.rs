//! Single-panel analysis: score, classify, rank, summarise.

use crate::classify::{classify, rank, AffectedPathway, AtRiskPathway, PathwayStatus};
use crate::panel::LabPanel;
use crate::scorer::{score_pathways, PathwayScore};
use crate::summary::{lab_statuses, AnalysisSummary, LabStatus};
use metabolyx_config::AnalysisConfig;
use metabolyx_kb::KnowledgeBase;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Everything one analysis produces. Owned by the caller; nothing is
/// retained by the [`Analyzer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub labs: Vec<LabStatus>,
    /// All scored pathways, highest total score first
    pub ranked: Vec<PathwayScore>,
    /// Catalog order
    pub directly_affected: Vec<AffectedPathway>,
    /// Catalog order
    pub at_risk: Vec<AtRiskPathway>,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    pub fn top(&self) -> Option<&PathwayScore> {
        self.ranked.first()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Runs analyses against a shared, read-only knowledge base.
#[derive(Debug, Clone)]
pub struct Analyzer {
    kb: Arc<KnowledgeBase>,
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(kb: Arc<KnowledgeBase>, config: AnalysisConfig) -> Self {
        Self { kb, config }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, panel: &LabPanel) -> AnalysisReport {
        let scores = score_pathways(panel, &self.kb, &self.config.scoring);
        let classification = classify(&scores, panel, &self.kb, &self.config.classification);
        let ranked = rank(scores);
        let labs = lab_statuses(panel, &self.kb);
        let summary = AnalysisSummary::new(&labs, &ranked, &classification);

        info!(
            readings = panel.len(),
            scored = ranked.len(),
            directly_affected = summary.directly_affected,
            at_risk = summary.at_risk,
            "Analysis complete"
        );

        AnalysisReport {
            labs,
            ranked,
            directly_affected: classification.directly_affected,
            at_risk: classification.at_risk,
            summary,
        }
    }

    pub fn status_of(&self, score: &PathwayScore) -> PathwayStatus {
        PathwayStatus::of(score.normalized_perturbation, &self.config.classification)
    }
}
