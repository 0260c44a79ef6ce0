//! metabolyx-ranker - Pathway perturbation scoring and classification engine.
//!
//! A [`LabPanel`] is validated at the boundary, then every catalog pathway
//! is scored, the scores are classified into directly affected / at risk,
//! and finally ranked. The computation is pure; an [`Analyzer`] can be
//! shared across threads.

pub mod analysis;
pub mod classify;
pub mod normalise;
pub mod panel;
pub mod scorer;
pub mod summary;

pub use analysis::{AnalysisReport, Analyzer};
pub use classify::{
    AffectedPathway, AtRiskPathway, BiomarkerFinding, Classification, FindingStatus, PathwayStatus,
};
pub use panel::{LabPanel, PanelValidation, RejectReason, RejectedReading};
pub use scorer::{MarkerFlag, PathwayScore};
pub use summary::{AnalysisSummary, Favorability, FluxEstimate, FluxLevel, LabStatus};
