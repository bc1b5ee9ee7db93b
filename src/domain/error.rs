// ============================================================
// Layer 3 — Dataset Errors
// ============================================================
// Every failure the loading and partitioning layers can report.
// Higher layers (application, infra, cli) wrap these in
// anyhow::Error with extra context; the data layer itself only
// ever returns DatasetError.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)
//            thiserror crate documentation

use std::path::PathBuf;

/// All errors raised while loading or partitioning a benchmark dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The requested dataset name is not registered with the loader.
    #[error("unsupported dataset '{name}' (known datasets: {known})")]
    UnsupportedDataset { name: String, known: String },

    /// An input table is missing columns, rows, or has non-numeric cells.
    #[error("malformed input '{}': {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    /// Array lengths or group sizes do not line up.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The dataset is registered but has no parser implementation yet.
    #[error("dataset '{0}' is not implemented")]
    NotImplemented(String),

    /// A computed quantity came out NaN or infinite.
    #[error("non-finite value: {0}")]
    NonFinite(String),

    /// A run parameter is outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An input file could not be opened.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Low-level CSV decoding failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl DatasetError {
    /// Shorthand for a MalformedInput error on a given file.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DatasetError::MalformedInput {
            path:   path.into(),
            reason: reason.into(),
        }
    }
}
