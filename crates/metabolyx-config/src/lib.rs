//! Analysis configuration for Metabolyx.
//!
//! Reads metabolyx.toml from the current directory or the path in the
//! METABOLYX_CONFIG env var. Every section is optional; missing values fall
//! back to the clinical defaults the engine was calibrated with.

use metabolyx_common::{MetabolyxError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Override locations for the reference data files
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,

    /// Scoring constants
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Classification thresholds
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Output options for the CLI
    #[serde(default)]
    pub output: OutputConfig,
}

// ── Knowledge Base ───────────────────────────────────────────────────────────

/// Paths to YAML data files. `None` selects the bundled data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    pub pathways: Option<String>,
    pub reference_ranges: Option<String>,
    pub biomarker_rules: Option<String>,
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Disease-class multiplier applied to the normalised perturbation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalMultiplier {
    pub diseases: Vec<String>,
    pub multiplier: f64,
}

impl ClinicalMultiplier {
    fn new(diseases: &[&str], multiplier: f64) -> Self {
        Self {
            diseases: diseases.iter().map(|d| d.to_string()).collect(),
            multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// |deviation| above which a marker is flagged abnormal
    #[serde(default = "default_abnormal_deviation")]
    pub abnormal_deviation: f64,

    /// Divisor applied to |ΔG| before saturation
    #[serde(default = "default_thermodynamic_scale")]
    pub thermodynamic_scale: f64,

    /// Upper bound of the thermodynamic score
    #[serde(default = "default_thermodynamic_cap")]
    pub thermodynamic_cap: f64,

    /// Multiplier for diseases not listed in `clinical_multipliers`
    #[serde(default = "default_clinical_multiplier")]
    pub default_clinical_multiplier: f64,

    /// Ordered multiplier table; the first entry naming the disease wins
    #[serde(default = "default_clinical_multipliers")]
    pub clinical_multipliers: Vec<ClinicalMultiplier>,
}

fn default_abnormal_deviation() -> f64 { 2.0 }
fn default_thermodynamic_scale() -> f64 { 100.0 }
fn default_thermodynamic_cap() -> f64 { 5.0 }
fn default_clinical_multiplier() -> f64 { 1.0 }

fn default_clinical_multipliers() -> Vec<ClinicalMultiplier> {
    vec![
        ClinicalMultiplier::new(&["Diabetes Mellitus", "Dyslipidemia"], 1.5),
        ClinicalMultiplier::new(&["Metabolic Syndrome", "Metabolic Disorders"], 1.3),
        ClinicalMultiplier::new(&["Chronic Kidney Disease", "Endocrine Disorders"], 1.1),
        ClinicalMultiplier::new(&["Autoimmune Diseases", "Inflammatory Diseases"], 0.7),
    ]
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            abnormal_deviation: default_abnormal_deviation(),
            thermodynamic_scale: default_thermodynamic_scale(),
            thermodynamic_cap: default_thermodynamic_cap(),
            default_clinical_multiplier: default_clinical_multiplier(),
            clinical_multipliers: default_clinical_multipliers(),
        }
    }
}

impl ScoringConfig {
    /// Multiplier for a pathway's disease label.
    pub fn clinical_multiplier(&self, disease: &str) -> f64 {
        self.clinical_multipliers
            .iter()
            .find(|m| m.diseases.iter().any(|d| d == disease))
            .map(|m| m.multiplier)
            .unwrap_or(self.default_clinical_multiplier)
    }
}

// ── Classification ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Normalised perturbation strictly above this is "directly affected"
    #[serde(default = "default_affected_threshold")]
    pub affected_threshold: f64,

    /// Normalised perturbation strictly above this (and not affected) is "at risk"
    #[serde(default = "default_at_risk_threshold")]
    pub at_risk_threshold: f64,

    /// Fraction of the reference interval above which an in-range value is a risk factor
    #[serde(default = "default_risk_quantile")]
    pub risk_quantile: f64,
}

fn default_affected_threshold() -> f64 { 1.5 }
fn default_at_risk_threshold() -> f64 { 0.5 }
fn default_risk_quantile() -> f64 { 0.75 }

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            affected_threshold: default_affected_threshold(),
            at_risk_threshold: default_at_risk_threshold(),
            risk_quantile: default_risk_quantile(),
        }
    }
}

// ── Output ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Append one row per analysis to this CSV file
    pub history_csv: Option<String>,
}

// ── Loading & Validation ─────────────────────────────────────────────────────

impl AnalysisConfig {
    /// Load from metabolyx.toml, or the path in METABOLYX_CONFIG.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var("METABOLYX_CONFIG")
            .unwrap_or_else(|_| "metabolyx.toml".to_string());

        if !Path::new(&path).exists() {
            tracing::debug!("No config at {path}, using defaults");
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        Self::from_file(&path)
    }

    /// Load from a TOML or YAML file, chosen by extension.
    pub fn from_file(path: &str) -> Result<Self> {
        let lower = path.to_ascii_lowercase();
        let config = if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            Self::from_yaml_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        config.validate()?;
        tracing::info!("Configuration loaded from {path}");
        Ok(config)
    }

    pub fn from_toml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: &str) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations the engine cannot score with.
    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        let c = &self.classification;

        if !(s.abnormal_deviation.is_finite() && s.abnormal_deviation >= 0.0) {
            return Err(MetabolyxError::Config(format!(
                "scoring.abnormal_deviation must be finite and >= 0, got {}",
                s.abnormal_deviation
            )));
        }
        if !(s.thermodynamic_scale.is_finite() && s.thermodynamic_scale > 0.0) {
            return Err(MetabolyxError::Config(format!(
                "scoring.thermodynamic_scale must be finite and > 0, got {}",
                s.thermodynamic_scale
            )));
        }
        if !(s.thermodynamic_cap.is_finite() && s.thermodynamic_cap > 0.0) {
            return Err(MetabolyxError::Config(format!(
                "scoring.thermodynamic_cap must be finite and > 0, got {}",
                s.thermodynamic_cap
            )));
        }
        let multipliers = s
            .clinical_multipliers
            .iter()
            .map(|m| m.multiplier)
            .chain(std::iter::once(s.default_clinical_multiplier));
        for m in multipliers {
            if !(m.is_finite() && m > 0.0) {
                return Err(MetabolyxError::Config(format!(
                    "clinical multipliers must be finite and > 0, got {m}"
                )));
            }
        }

        if !(c.at_risk_threshold.is_finite() && c.affected_threshold.is_finite()) {
            return Err(MetabolyxError::Config(
                "classification thresholds must be finite".to_string(),
            ));
        }
        if c.at_risk_threshold < 0.0 || c.at_risk_threshold >= c.affected_threshold {
            return Err(MetabolyxError::Config(format!(
                "classification requires 0 <= at_risk_threshold ({}) < affected_threshold ({})",
                c.at_risk_threshold, c.affected_threshold
            )));
        }
        if !(0.0..=1.0).contains(&c.risk_quantile) {
            return Err(MetabolyxError::Config(format!(
                "classification.risk_quantile must lie in [0, 1], got {}",
                c.risk_quantile
            )));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
