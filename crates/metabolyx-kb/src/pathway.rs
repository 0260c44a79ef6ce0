//! Pathway knowledge base.
//!
//! Catalog files keep the parallel-list layout of the KEGG-derived source
//! data (`compounds`/`compound_names`, `enzymes`/`enzyme_names`,
//! `reactions`/`reaction_names`/`reaction_types`). Loading zips those lists
//! into records so index alignment cannot drift after startup.

use crate::dedup::collapse_duplicates;
use metabolyx_common::{MetabolyxError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reversibility {
    Reversible,
    Irreversible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enzyme {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub name: String,
    pub reversibility: Reversibility,
}

/// One catalog entry as it appears in the YAML data file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathwayDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub compounds: Vec<String>,
    #[serde(default)]
    pub compound_names: Vec<String>,
    #[serde(default)]
    pub enzymes: Vec<String>,
    #[serde(default)]
    pub enzyme_names: Vec<String>,
    #[serde(default)]
    pub reactions: Vec<String>,
    #[serde(default)]
    pub reaction_names: Vec<String>,
    #[serde(default)]
    pub reaction_types: Vec<Reversibility>,
    pub delta_g: f64,
    pub disease: String,
    pub kegg_map_url: Option<String>,
    #[serde(default)]
    pub clinical_significance: String,
    #[serde(default)]
    pub affected_organs: Vec<String>,
    #[serde(default)]
    pub biomarkers: Vec<String>,
}

/// A validated pathway record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayRecord {
    pub id: String,
    pub name: String,
    pub compounds: Vec<Compound>,
    pub enzymes: Vec<Enzyme>,
    pub reactions: Vec<Reaction>,
    /// Gibbs free energy, kJ/mol. More negative is more favourable.
    pub delta_g: f64,
    pub disease: String,
    pub kegg_map_url: Option<String>,
    pub clinical_significance: String,
    pub affected_organs: Vec<String>,
    /// Free-text clinical biomarker names, used for explanations only.
    pub biomarkers: Vec<String>,
}

impl PathwayRecord {
    pub fn has_compound(&self, compound_id: &str) -> bool {
        self.compounds.iter().any(|c| c.id == compound_id)
    }

    pub fn compound_names(&self) -> impl Iterator<Item = &str> {
        self.compounds.iter().map(|c| c.name.as_str())
    }

    pub fn enzyme_names(&self) -> impl Iterator<Item = &str> {
        self.enzymes.iter().map(|e| e.name.as_str())
    }
}

fn check_len(id: &str, field: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(MetabolyxError::MisalignedPathway {
            id: id.to_string(),
            field,
            expected,
            found,
        });
    }
    Ok(())
}

impl TryFrom<PathwayDef> for PathwayRecord {
    type Error = MetabolyxError;

    fn try_from(def: PathwayDef) -> Result<Self> {
        check_len(&def.id, "compound_names", def.compounds.len(), def.compound_names.len())?;
        check_len(&def.id, "enzyme_names", def.enzymes.len(), def.enzyme_names.len())?;
        check_len(&def.id, "reaction_names", def.reactions.len(), def.reaction_names.len())?;
        check_len(&def.id, "reaction_types", def.reactions.len(), def.reaction_types.len())?;

        if !def.delta_g.is_finite() {
            return Err(MetabolyxError::KnowledgeBase(format!(
                "pathway '{}' has a non-finite delta_g",
                def.id
            )));
        }

        let compounds = def
            .compounds
            .into_iter()
            .zip(def.compound_names)
            .map(|(id, name)| Compound { id, name })
            .collect();
        let enzymes = def
            .enzymes
            .into_iter()
            .zip(def.enzyme_names)
            .map(|(id, name)| Enzyme { id, name })
            .collect();
        let reactions = def
            .reactions
            .into_iter()
            .zip(def.reaction_names)
            .zip(def.reaction_types)
            .map(|((id, name), reversibility)| Reaction { id, name, reversibility })
            .collect();

        Ok(Self {
            id: def.id,
            name: def.name,
            compounds,
            enzymes,
            reactions,
            delta_g: def.delta_g,
            disease: def.disease,
            kegg_map_url: def.kegg_map_url,
            clinical_significance: def.clinical_significance,
            affected_organs: def.affected_organs,
            biomarkers: def.biomarkers,
        })
    }
}

/// Ordered, immutable pathway catalog keyed by unique identifier.
#[derive(Debug, Clone, Default)]
pub struct PathwayCatalog {
    pathways: Vec<PathwayRecord>,
    index: HashMap<String, usize>,
}

impl PathwayCatalog {
    /// Build from validated records. Order is first-declaration order.
    pub fn new(records: Vec<PathwayRecord>) -> Result<Self> {
        let pathways = collapse_duplicates(records, "pathway", |p| p.id.as_str())?;
        let index = pathways
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        Ok(Self { pathways, index })
    }

    pub fn from_defs(defs: Vec<PathwayDef>) -> Result<Self> {
        let records = defs
            .into_iter()
            .map(PathwayRecord::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(records)
    }

    /// Parse a YAML sequence of pathway definitions.
    pub fn from_yaml_str(src: &str) -> Result<Self> {
        let defs: Vec<PathwayDef> = serde_yaml::from_str(src)?;
        Self::from_defs(defs)
    }

    pub fn get(&self, id: &str) -> Option<&PathwayRecord> {
        self.index.get(id).map(|&i| &self.pathways[i])
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &PathwayRecord> {
        self.pathways.iter()
    }

    /// Position in catalog order, used as the ranking tie-breaker.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PATHWAYS: &str = r#"
- id: "hsa00010"
  name: "Glycolysis / Gluconeogenesis"
  compounds: ["C00031", "C00022"]
  compound_names: ["D-Glucose", "Pyruvate"]
  enzymes: ["EC:2.7.1.1"]
  enzyme_names: ["Hexokinase"]
  reactions: ["R00299", "R00771"]
  reaction_names: ["Glucose phosphorylation", "Glucose-6-phosphate isomerization"]
  reaction_types: ["irreversible", "reversible"]
  delta_g: -73.3
  disease: "Diabetes Mellitus"
  biomarkers: ["Glucose", "Lactate"]
- id: "hsa04979"
  name: "Cholesterol Metabolism"
  delta_g: -142.5
  disease: "Dyslipidemia"
"#;

    #[test]
    fn test_parse_and_zip() {
        let catalog = PathwayCatalog::from_yaml_str(TWO_PATHWAYS).unwrap();
        assert_eq!(catalog.len(), 2);

        let glycolysis = catalog.get("hsa00010").unwrap();
        assert!(glycolysis.has_compound("C00031"));
        assert!(!glycolysis.has_compound("C00186"));
        assert_eq!(glycolysis.reactions[0].reversibility, Reversibility::Irreversible);
        assert_eq!(glycolysis.reactions[1].name, "Glucose-6-phosphate isomerization");
        assert_eq!(glycolysis.compound_names().collect::<Vec<_>>(), vec!["D-Glucose", "Pyruvate"]);

        assert_eq!(catalog.position("hsa04979"), Some(1));
        assert!(catalog.get("hsa04979").unwrap().compounds.is_empty());
    }

    #[test]
    fn test_misaligned_lists_rejected() {
        let src = r#"
- id: "bad"
  name: "Broken"
  reactions: ["R1", "R2"]
  reaction_names: ["One", "Two"]
  reaction_types: ["reversible"]
  delta_g: -10.0
  disease: "Porphyria"
"#;
        let err = PathwayCatalog::from_yaml_str(src).unwrap_err();
        match err {
            MetabolyxError::MisalignedPathway { id, field, expected, found } => {
                assert_eq!(id, "bad");
                assert_eq!(field, "reaction_types");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_identical_duplicate_collapsed() {
        let src = r#"
- id: "hsa03320"
  name: "PPAR Signaling Pathway"
  delta_g: -118.9
  disease: "Dyslipidemia"
- id: "hsa00561"
  name: "Glycerolipid Metabolism"
  delta_g: -92.4
  disease: "Dyslipidemia"
- id: "hsa03320"
  name: "PPAR Signaling Pathway"
  delta_g: -118.9
  disease: "Dyslipidemia"
"#;
        let catalog = PathwayCatalog::from_yaml_str(src).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.position("hsa03320"), Some(0));
        assert_eq!(catalog.position("hsa00561"), Some(1));
    }

    #[test]
    fn test_conflicting_duplicate_rejected() {
        let src = r#"
- id: "hsa00480"
  name: "Glutathione Metabolism"
  delta_g: -45.0
  disease: "Oxidative Stress"
- id: "hsa00480"
  name: "Glutathione Conjugation"
  delta_g: -45.0
  disease: "Oxidative Stress"
"#;
        let err = PathwayCatalog::from_yaml_str(src).unwrap_err();
        assert!(matches!(err, MetabolyxError::DuplicateEntry { kind: "pathway", .. }));
    }
}
