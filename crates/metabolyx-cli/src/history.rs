//! CSV analysis history. One row per analysis, appended.

use crate::report::PatientInfo;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use metabolyx_kb::KnowledgeBase;
use metabolyx_ranker::{AnalysisReport, LabPanel};
use std::fs::OpenOptions;
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn header(kb: &KnowledgeBase) -> Vec<String> {
    ["timestamp", "patient_id", "age", "gender"]
        .into_iter()
        .map(String::from)
        .chain(kb.vocabulary().map(String::from))
        .chain(
            ["top_pathway", "top_score", "directly_affected_count", "at_risk_count"]
                .into_iter()
                .map(String::from),
        )
        .collect()
}

fn row(
    kb: &KnowledgeBase,
    patient: &PatientInfo,
    panel: &LabPanel,
    report: &AnalysisReport,
    at: DateTime<Local>,
) -> Vec<String> {
    let mut row = vec![
        at.format(TIMESTAMP_FORMAT).to_string(),
        patient.patient_id.clone().unwrap_or_default(),
        patient.age.map(|a| a.to_string()).unwrap_or_default(),
        patient.gender.clone().unwrap_or_default(),
    ];
    row.extend(
        kb.vocabulary()
            .map(|key| panel.get(key).map(|v| v.to_string()).unwrap_or_default()),
    );
    match report.top() {
        Some(top) => row.extend([
            top.pathway_name.clone(),
            top.total_score.to_string(),
            report.directly_affected.len().to_string(),
            report.at_risk.len().to_string(),
        ]),
        None => row.extend(std::iter::repeat(String::new()).take(4)),
    }
    row
}

/// Append one analysis to `path`, writing the header first when the file
/// is new or empty.
pub fn append(
    path: &Path,
    kb: &KnowledgeBase,
    patient: &PatientInfo,
    panel: &LabPanel,
    report: &AnalysisReport,
    at: DateTime<Local>,
) -> Result<()> {
    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening history file {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if is_new {
        writer.write_record(header(kb))?;
    }
    writer.write_record(row(kb, patient, panel, report, at))?;
    writer.flush()?;

    tracing::info!("Appended analysis to {}", path.display());
    Ok(())
}
