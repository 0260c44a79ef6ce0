//! Plain-text analysis report.

use metabolyx_kb::KnowledgeBase;
use metabolyx_ranker::{AnalysisReport, Favorability, FluxEstimate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub patient_id: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

const NOT_SPECIFIED: &str = "Not specified";

/// Renders an [`AnalysisReport`] as the plain-text clinical report.
pub struct TextReport<'a> {
    pub report: &'a AnalysisReport,
    pub kb: &'a KnowledgeBase,
    pub patient: &'a PatientInfo,
    pub generated: &'a str,
}

fn join<'a>(items: impl Iterator<Item = &'a str>, n: usize) -> String {
    items.take(n).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        let p = self.patient;

        writeln!(f, "METABOLIC PATHWAY ANALYSIS REPORT")?;
        writeln!(f, "Generated: {}", self.generated)?;
        writeln!(f)?;

        writeln!(f, "PATIENT INFORMATION")?;
        writeln!(f, "Patient ID: {}", p.patient_id.as_deref().unwrap_or(NOT_SPECIFIED))?;
        match p.age {
            Some(age) => writeln!(f, "Age: {age}")?,
            None => writeln!(f, "Age: {NOT_SPECIFIED}")?,
        }
        writeln!(f, "Gender: {}", p.gender.as_deref().unwrap_or(NOT_SPECIFIED))?;
        writeln!(f)?;

        writeln!(f, "LABORATORY VALUES")?;
        for lab in &r.labs {
            let unit = lab.unit.as_deref().unwrap_or("");
            let reference = match (lab.min, lab.max) {
                (Some(min), Some(max)) => format!("{min}-{max}"),
                _ => "N/A".to_string(),
            };
            writeln!(
                f,
                "{}: {} {} (Ref: {}) - {}",
                lab.key.to_uppercase(),
                lab.value,
                unit,
                reference,
                lab.status
            )?;
        }
        writeln!(f)?;

        writeln!(f, "PATHWAY PERTURBATION ANALYSIS")?;
        if r.directly_affected.is_empty() {
            writeln!(f, "DIRECTLY AFFECTED PATHWAYS: None detected")?;
        } else {
            writeln!(f, "DIRECTLY AFFECTED PATHWAYS:")?;
            for p in &r.directly_affected {
                writeln!(f, "• {} ({}) - Score: {:.2}", p.name, p.disease, p.score)?;
                if !p.abnormal_biomarkers.is_empty() {
                    let names: Vec<_> = p.abnormal_biomarkers.iter().map(|b| b.to_string()).collect();
                    writeln!(f, "  Abnormal biomarkers: {}", names.join(", "))?;
                }
            }
        }
        writeln!(f)?;
        if r.at_risk.is_empty() {
            writeln!(f, "PATHWAYS AT RISK: None detected")?;
        } else {
            writeln!(f, "PATHWAYS AT RISK:")?;
            for p in &r.at_risk {
                writeln!(f, "• {} ({}) - Score: {:.2}", p.name, p.disease, p.score)?;
                if !p.risk_factors.is_empty() {
                    let names: Vec<_> = p.risk_factors.iter().map(|b| b.to_string()).collect();
                    writeln!(f, "  Risk factors: {}", names.join(", "))?;
                }
            }
        }
        writeln!(f)?;

        if let Some(pathway) = r.top().and_then(|top| self.kb.catalog.get(&top.pathway_id)) {
            writeln!(f, "TOP PRIORITY PATHWAY DETAILS:")?;
            writeln!(f, "Name: {}", pathway.name)?;
            writeln!(f, "Disease Association: {}", pathway.disease)?;
            writeln!(f, "Key Compounds: {}", join(pathway.compound_names(), 4))?;
            writeln!(f, "Key Enzymes: {}", join(pathway.enzyme_names(), 3))?;
            writeln!(
                f,
                "Key Reactions: {}",
                join(pathway.reactions.iter().map(|x| x.name.as_str()), 3)
            )?;
            writeln!(
                f,
                "Thermodynamic Status: ΔG = {:.1} kJ/mol ({})",
                pathway.delta_g,
                Favorability::of(pathway.delta_g)
            )?;
            if let Some(url) = &pathway.kegg_map_url {
                writeln!(f, "KEGG Map: {url}")?;
            }
            writeln!(f)?;

            writeln!(f, "FLUX PERTURBATION (top 5)")?;
            for score in r.ranked.iter().take(5) {
                let flux = FluxEstimate::from_score(score);
                writeln!(
                    f,
                    "• {}: {:.1}% ({:?})",
                    score.pathway_name, flux.perturbation_percent, flux.level
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "CLINICAL RECOMMENDATIONS")?;
        writeln!(f, "• Immediate attention required for: {} pathway(s)", r.directly_affected.len())?;
        writeln!(f, "• Monitoring recommended for: {} pathway(s)", r.at_risk.len())?;
        writeln!(f, "• Consider follow-up testing for biomarkers in affected pathways")?;
        writeln!(f)?;

        let s = &r.summary;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "Total Parameters Analyzed: {}", s.parameters_analyzed)?;
        writeln!(f, "Abnormal Values Detected: {}", s.abnormal_values)?;
        writeln!(f, "Pathways Directly Affected: {}", s.directly_affected)?;
        writeln!(f, "Pathways At Risk: {}", s.at_risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metabolyx_config::AnalysisConfig;
    use metabolyx_ranker::{Analyzer, LabPanel};
    use metabolyx_test_utils::bundled_kb;
    use std::sync::Arc;

    fn render(values: &[(&str, f64)], patient: &PatientInfo) -> String {
        let analyzer = Analyzer::new(Arc::new(bundled_kb()), AnalysisConfig::default());
        let panel = LabPanel::from_values(values.iter().copied(), analyzer.knowledge_base()).panel;
        let report = analyzer.analyze(&panel);
        TextReport {
            report: &report,
            kb: analyzer.knowledge_base(),
            patient,
            generated: "2026-01-01 09:00:00",
        }
        .to_string()
    }

    #[test]
    fn test_report_sections() {
        let patient = PatientInfo {
            patient_id: Some("P-17".to_string()),
            age: Some(61),
            gender: None,
        };
        let text = render(&[("glucose", 250.0), ("ldl", 95.0)], &patient);

        assert!(text.contains("Patient ID: P-17"));
        assert!(text.contains("Age: 61"));
        assert!(text.contains("Gender: Not specified"));
        assert!(text.contains("GLUCOSE: 250 mg/dL (Ref: 70-100) - High"));
        assert!(text.contains("LDL: 95 mg/dL (Ref: 0-100) - Normal"));
        assert!(text.contains("Abnormal biomarkers: Glucose: High"));
        assert!(text.contains("TOP PRIORITY PATHWAY DETAILS:"));
        assert!(text.contains("Highly Favorable"));
        assert!(text.contains("Total Parameters Analyzed: 2"));
        assert!(text.contains("Abnormal Values Detected: 1"));
    }

    #[test]
    fn test_empty_report() {
        let text = render(&[], &PatientInfo::default());
        assert!(text.contains("DIRECTLY AFFECTED PATHWAYS: None detected"));
        assert!(text.contains("PATHWAYS AT RISK: None detected"));
        assert!(!text.contains("TOP PRIORITY PATHWAY DETAILS"));
        assert!(text.contains("Total Parameters Analyzed: 0"));
    }
}
