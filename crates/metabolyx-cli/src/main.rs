//! metabolyx - command-line front end for the pathway perturbation engine.

mod cli;
mod history;
mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands};
use metabolyx_config::{AnalysisConfig, OutputFormat};
use metabolyx_kb::KnowledgeBase;
use metabolyx_ranker::{AnalysisReport, Analyzer, LabPanel, RejectedReading};
use report::{PatientInfo, TextReport};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// JSON output document.
#[derive(Serialize)]
struct AnalysisOutput<'a> {
    patient: &'a PatientInfo,
    ignored: &'a [String],
    rejected: &'a [RejectedReading],
    report: &'a AnalysisReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("metabolyx=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(&path.to_string_lossy())
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::load().context("loading config")?,
    };
    let kb = Arc::new(KnowledgeBase::load(&config.knowledge_base).context("loading knowledge base")?);

    match cli.command {
        Commands::Analyze(args) => analyze(args, kb, config),
        Commands::Pathways => {
            list_pathways(&kb);
            Ok(())
        }
    }
}

fn read_panel(path: &Path) -> Result<serde_json::Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading panel {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let value: Value = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("panel {} must be a mapping of biomarker to value", path.display()),
    }
}

fn analyze(args: AnalyzeArgs, kb: Arc<KnowledgeBase>, config: AnalysisConfig) -> Result<()> {
    let format = args.format.map(OutputFormat::from).unwrap_or(config.output.format);
    let history: Option<PathBuf> = args
        .history
        .clone()
        .or_else(|| config.output.history_csv.as_ref().map(PathBuf::from));

    let raw = read_panel(&args.panel)?;
    let validation = LabPanel::validate(&raw, &kb);
    if !validation.is_clean() {
        warn!("{} reading(s) rejected", validation.rejected.len());
    }

    let analyzer = Analyzer::new(kb, config);
    let report = analyzer.analyze(&validation.panel);
    if report.is_empty() {
        info!("No recognised biomarkers in {}", args.panel.display());
    }

    let patient = PatientInfo {
        patient_id: args.patient_id,
        age: args.age,
        gender: args.gender,
    };
    let now = chrono::Local::now();

    match format {
        OutputFormat::Json => {
            let out = AnalysisOutput {
                patient: &patient,
                ignored: &validation.ignored,
                rejected: &validation.rejected,
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            let generated = now.format(history::TIMESTAMP_FORMAT).to_string();
            let text = TextReport {
                report: &report,
                kb: analyzer.knowledge_base(),
                patient: &patient,
                generated: &generated,
            };
            print!("{text}");
        }
    }

    if let Some(path) = history {
        history::append(
            &path,
            analyzer.knowledge_base(),
            &patient,
            &validation.panel,
            &report,
            now,
        )?;
    }
    Ok(())
}

fn list_pathways(kb: &KnowledgeBase) {
    for p in kb.catalog.iter() {
        println!("{}\t{}\t{}\tΔG={:.1}", p.id, p.name, p.disease, p.delta_g);
    }
}
