use clap::{Args, Parser, Subcommand, ValueEnum};
use metabolyx_config::OutputFormat;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "metabolyx", version, about = "Metabolic pathway perturbation analysis")]
pub struct Cli {
    /// Config file (TOML or YAML). Defaults to $METABOLYX_CONFIG or ./metabolyx.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyse one lab panel
    Analyze(AnalyzeArgs),
    /// List the loaded pathway catalog
    Pathways,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// JSON or YAML object of biomarker → value
    pub panel: PathBuf,

    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Append a row to this CSV history file
    #[arg(long)]
    pub history: Option<PathBuf>,

    #[arg(long)]
    pub patient_id: Option<String>,

    #[arg(long)]
    pub age: Option<u32>,

    #[arg(long)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}
