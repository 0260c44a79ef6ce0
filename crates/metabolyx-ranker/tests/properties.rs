//! Engine-wide properties checked over seeded random panels.

use metabolyx_config::AnalysisConfig;
use metabolyx_kb::KnowledgeBase;
use metabolyx_ranker::{Analyzer, LabPanel, PathwayStatus};
use metabolyx_test_utils::pretty_assertions::assert_eq;
use metabolyx_test_utils::{bundled_kb, random_panel};
use std::sync::Arc;

const SEEDS: std::ops::Range<u64> = 0..32;

fn analyzer() -> Analyzer {
    Analyzer::new(Arc::new(bundled_kb()), AnalysisConfig::default())
}

fn has_relevant_reading(kb: &KnowledgeBase, panel: &LabPanel, pathway_id: &str) -> bool {
    let Some(pathway) = kb.catalog.get(pathway_id) else {
        return false;
    };
    kb.rules.iter().any(|rule| {
        panel.contains(&rule.key)
            && kb.references.get(&rule.key).is_some()
            && rule.applies_to(pathway)
    })
}

#[test]
fn test_random_panels_validate_cleanly() {
    let kb = bundled_kb();
    for seed in SEEDS {
        let raw = random_panel(&kb, seed);
        let validation = LabPanel::validate(&raw, &kb);
        assert!(validation.is_clean(), "seed {seed}: {:?}", validation.rejected);
        assert_eq!(validation.panel.len(), raw.len());
    }
}

#[test]
fn test_pathway_scored_iff_relevant_weight_positive() {
    let a = analyzer();
    let kb = a.knowledge_base();
    for seed in SEEDS {
        let panel = LabPanel::validate(&random_panel(kb, seed), kb).panel;
        let report = a.analyze(&panel);

        for pathway in kb.catalog.iter() {
            let scored = report.ranked.iter().any(|s| s.pathway_id == pathway.id);
            assert_eq!(scored, has_relevant_reading(kb, &panel, &pathway.id), "seed {seed}, {}", pathway.id);
        }
        for s in &report.ranked {
            assert!(s.relevant_weight > 0.0);
            assert!(s.normalized_perturbation >= 0.0);
            assert!((0.0..=5.0).contains(&s.thermodynamic_score));
        }
    }
}

#[test]
fn test_ranking_is_descending_with_catalog_tiebreak() {
    let a = analyzer();
    let kb = a.knowledge_base();
    for seed in SEEDS {
        let panel = LabPanel::validate(&random_panel(kb, seed), kb).panel;
        let report = a.analyze(&panel);
        for pair in report.ranked.windows(2) {
            assert!(pair[0].total_score >= pair[1].total_score);
            if pair[0].total_score == pair[1].total_score {
                let first = kb.catalog.position(&pair[0].pathway_id);
                let second = kb.catalog.position(&pair[1].pathway_id);
                assert!(first < second, "seed {seed}: tie out of catalog order");
            }
        }
    }
}

#[test]
fn test_classification_matches_status() {
    let a = analyzer();
    let kb = a.knowledge_base();
    for seed in SEEDS {
        let panel = LabPanel::validate(&random_panel(kb, seed), kb).panel;
        let report = a.analyze(&panel);

        let affected = report
            .ranked
            .iter()
            .filter(|s| a.status_of(s) == PathwayStatus::DirectlyAffected)
            .count();
        let at_risk = report
            .ranked
            .iter()
            .filter(|s| a.status_of(s) == PathwayStatus::AtRisk)
            .count();
        assert_eq!(report.directly_affected.len(), affected);
        assert_eq!(report.at_risk.len(), at_risk);

        let positions: Vec<_> = report
            .directly_affected
            .iter()
            .map(|p| kb.catalog.position(&p.pathway_id))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted, "affected list keeps catalog order");
    }
}

#[test]
fn test_analysis_is_idempotent() {
    let a = analyzer();
    let kb = a.knowledge_base();
    for seed in SEEDS {
        let panel = LabPanel::validate(&random_panel(kb, seed), kb).panel;
        let first = serde_json::to_string(&a.analyze(&panel)).unwrap();
        let second = serde_json::to_string(&a.analyze(&panel)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_concurrent_analyses_match_serial() {
    let a = analyzer();
    let kb = a.knowledge_base();
    let panels: Vec<LabPanel> = SEEDS
        .map(|seed| LabPanel::validate(&random_panel(kb, seed), kb).panel)
        .collect();
    let serial: Vec<_> = panels.iter().map(|p| a.analyze(p)).collect();

    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = panels
            .iter()
            .map(|p| {
                let a = a.clone();
                scope.spawn(move || a.analyze(p))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(serial, parallel);
}
