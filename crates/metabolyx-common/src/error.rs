use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetabolyxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Duplicate {kind} '{id}' with a conflicting definition")]
    DuplicateEntry { kind: &'static str, id: String },

    #[error("Pathway '{id}': {field} has {found} entries, expected {expected}")]
    MisalignedPathway {
        id: String,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid reference range for '{key}': [{min}, {max}]")]
    InvalidReferenceRange { key: String, min: f64, max: f64 },

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Invalid biomarker rule '{key}': {reason}")]
    InvalidRule { key: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MetabolyxError>;
