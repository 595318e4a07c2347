use thiserror::Error;

/// Topic catalog construction failures
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("topic key is empty after normalization")]
    EmptyKey,
    #[error("alias '{alias}' already maps to '{existing}', cannot map it to '{requested}'")]
    AliasConflict {
        alias: String,
        existing: String,
        requested: String,
    },
}

/// Readiness report input/output failures
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid report input: {0}")]
    Decode(#[from] serde_json::Error),
}
