//! metabolyx-kb - Static reference data for pathway perturbation analysis.
//!
//! Three tables, loaded once at startup and shared read-only:
//!   - [`ReferenceTable`]: biomarker key → normal interval and unit
//!   - [`PathwayCatalog`]: pathway records in declaration order
//!   - [`RuleTable`]: which biomarkers are relevant to which pathways
//!
//! Malformed data fails the load; nothing is repaired silently.

pub mod biomarker;
pub mod dedup;
pub mod pathway;
pub mod reference;
pub mod rules;

pub use biomarker::canonical_key;
pub use pathway::{Compound, Enzyme, PathwayCatalog, PathwayDef, PathwayRecord, Reaction, Reversibility};
pub use reference::{ReferenceRange, ReferenceTable};
pub use rules::{BiomarkerRule, RuleTable};

use metabolyx_common::Result;
use metabolyx_config::KnowledgeBaseConfig;
use tracing::{info, warn};

const BUNDLED_PATHWAYS: &str = include_str!("../data/pathways.yaml");
const BUNDLED_REFERENCE_RANGES: &str = include_str!("../data/reference_ranges.yaml");
const BUNDLED_BIOMARKER_RULES: &str = include_str!("../data/biomarker_rules.yaml");

/// Catalog, reference table and relevance rules as one immutable unit.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub catalog: PathwayCatalog,
    pub references: ReferenceTable,
    pub rules: RuleTable,
}

impl KnowledgeBase {
    pub fn new(catalog: PathwayCatalog, references: ReferenceTable, rules: RuleTable) -> Self {
        for rule in rules.iter() {
            if references.get(&rule.key).is_none() {
                warn!("Biomarker rule '{}' has no reference range and will never score", rule.key);
            }
        }
        info!(
            pathways = catalog.len(),
            reference_ranges = references.len(),
            biomarker_rules = rules.len(),
            "Knowledge base ready"
        );
        Self { catalog, references, rules }
    }

    /// The data compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_yaml_strs(BUNDLED_PATHWAYS, BUNDLED_REFERENCE_RANGES, BUNDLED_BIOMARKER_RULES)
    }

    pub fn from_yaml_strs(pathways: &str, reference_ranges: &str, biomarker_rules: &str) -> Result<Self> {
        Ok(Self::new(
            PathwayCatalog::from_yaml_str(pathways)?,
            ReferenceTable::from_yaml_str(reference_ranges)?,
            RuleTable::from_yaml_str(biomarker_rules)?,
        ))
    }

    /// Load with per-table overrides; tables without an override path use
    /// the bundled data.
    pub fn load(config: &KnowledgeBaseConfig) -> Result<Self> {
        let pathways = read_or_bundled(config.pathways.as_deref(), BUNDLED_PATHWAYS)?;
        let references =
            read_or_bundled(config.reference_ranges.as_deref(), BUNDLED_REFERENCE_RANGES)?;
        let rules = read_or_bundled(config.biomarker_rules.as_deref(), BUNDLED_BIOMARKER_RULES)?;
        Self::from_yaml_strs(&pathways, &references, &rules)
    }

    /// A reading key with a rule or a reference range. Keys with only one
    /// of the two are accepted as readings but cannot contribute to a score.
    pub fn is_recognized(&self, key: &str) -> bool {
        self.rules.get(key).is_some() || self.references.get(key).is_some()
    }

    /// Recognised reading keys: rule table order, then reference-only keys.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        let extra = self
            .references
            .iter()
            .map(|r| r.key.as_str())
            .filter(|k| self.rules.get(k).is_none());
        self.rules.iter().map(|r| r.key.as_str()).chain(extra)
    }
}

fn read_or_bundled(path: Option<&str>, bundled: &str) -> Result<String> {
    match path {
        Some(p) => {
            info!("Loading knowledge base table from {p}");
            Ok(std::fs::read_to_string(p)?)
        }
        None => Ok(bundled.to_string()),
    }
}
