//! Shared fixtures for Metabolyx tests.
//!
//! Builders for small knowledge bases so scenario tests can state exactly
//! which pathways, ranges and rules are in play, plus seeded random panels
//! for property-style checks.

use metabolyx_kb::{
    BiomarkerRule, Compound, KnowledgeBase, PathwayCatalog, PathwayRecord, ReferenceRange,
    ReferenceTable, RuleTable,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

pub use pretty_assertions;

/// Builder for a single pathway record.
#[derive(Debug, Clone)]
pub struct PathwayBuilder {
    record: PathwayRecord,
}

impl PathwayBuilder {
    pub fn new(id: &str, disease: &str) -> Self {
        Self {
            record: PathwayRecord {
                id: id.to_string(),
                name: format!("Pathway {id}"),
                compounds: vec![],
                enzymes: vec![],
                reactions: vec![],
                delta_g: 0.0,
                disease: disease.to_string(),
                kegg_map_url: None,
                clinical_significance: String::new(),
                affected_organs: vec![],
                biomarkers: vec![],
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.record.name = name.to_string();
        self
    }

    pub fn delta_g(mut self, delta_g: f64) -> Self {
        self.record.delta_g = delta_g;
        self
    }

    pub fn compound(mut self, id: &str, name: &str) -> Self {
        self.record.compounds.push(Compound {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn biomarkers(mut self, names: &[&str]) -> Self {
        self.record.biomarkers = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn build(self) -> PathwayRecord {
        self.record
    }
}

/// Builder for a [`KnowledgeBase`] assembled from explicit parts.
#[derive(Debug, Clone, Default)]
pub struct KbBuilder {
    pathways: Vec<PathwayRecord>,
    ranges: Vec<ReferenceRange>,
    rules: Vec<BiomarkerRule>,
}

impl KbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pathway(mut self, pathway: PathwayRecord) -> Self {
        self.pathways.push(pathway);
        self
    }

    pub fn range(mut self, key: &str, min: f64, max: f64, unit: &str) -> Self {
        self.ranges.push(ReferenceRange::new(key, min, max, unit));
        self
    }

    /// A rule relevant through disease labels only.
    pub fn rule(self, key: &str, label: &str, weight: f64, diseases: &[&str]) -> Self {
        self.rule_with_compounds(key, label, weight, &[], diseases)
    }

    pub fn rule_with_compounds(
        mut self,
        key: &str,
        label: &str,
        weight: f64,
        compounds: &[&str],
        diseases: &[&str],
    ) -> Self {
        self.rules.push(BiomarkerRule {
            key: key.to_string(),
            label: label.to_string(),
            weight,
            compounds: compounds.iter().map(|c| c.to_string()).collect(),
            diseases: diseases.iter().map(|d| d.to_string()).collect(),
            strictly_positive: false,
        });
        self
    }

    pub fn build(self) -> KnowledgeBase {
        KnowledgeBase::new(
            PathwayCatalog::new(self.pathways).expect("fixture catalog"),
            ReferenceTable::new(self.ranges).expect("fixture reference table"),
            RuleTable::new(self.rules).expect("fixture rule table"),
        )
    }
}

/// Glucose and LDL on one diabetes and one dyslipidemia pathway.
pub fn glucose_ldl_kb() -> KnowledgeBase {
    KbBuilder::new()
        .pathway(
            PathwayBuilder::new("hsa00010", "Diabetes Mellitus")
                .name("Glycolysis / Gluconeogenesis")
                .compound("C00031", "D-Glucose")
                .delta_g(-73.3)
                .biomarkers(&["Glucose", "Lactate"])
                .build(),
        )
        .pathway(
            PathwayBuilder::new("hsa04979", "Dyslipidemia")
                .name("Cholesterol Metabolism")
                .delta_g(-142.5)
                .biomarkers(&["Total cholesterol", "LDL", "HDL"])
                .build(),
        )
        .range("glucose", 70.0, 100.0, "mg/dL")
        .range("ldl", 0.0, 100.0, "mg/dL")
        .rule_with_compounds("glucose", "Glucose", 2.0, &["C00031"], &["Diabetes Mellitus"])
        .rule("ldl", "LDL", 1.8, &["Dyslipidemia", "Metabolic Syndrome"])
        .build()
}

/// The compiled-in knowledge base.
pub fn bundled_kb() -> KnowledgeBase {
    KnowledgeBase::bundled().expect("bundled knowledge base")
}

/// Build a raw JSON panel from pairs.
pub fn raw_panel(pairs: &[(&str, f64)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

/// Seeded random panel over a random subset of the vocabulary, with values
/// between zero and twice each range maximum.
pub fn random_panel(kb: &KnowledgeBase, seed: u64) -> Map<String, Value> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Map::new();
    for range in kb.references.iter() {
        if rng.gen_bool(0.5) {
            let upper = (range.max * 2.0).max(1.0);
            let mut value = rng.gen_range(0.0..upper);
            if kb.rules.get(&range.key).is_some_and(|r| r.strictly_positive) && value == 0.0 {
                value = range.min.max(1.0);
            }
            out.insert(range.key.clone(), Value::from(value));
        }
    }
    out
}
