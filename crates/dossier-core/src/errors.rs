//! Typed engine errors.
//!
//! Any failure during assembly or rendering aborts the whole operation; no
//! partial artifact is ever produced.

use thiserror::Error;

/// Top-level report generation failure.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A report needs at least one experiment id.
    #[error("report selection is empty: at least one experiment id is required")]
    EmptySelection,

    /// An experiment detail fetch failed. Fatal for the whole report; the
    /// engine assumes every requested experiment resolves.
    #[error("failed to fetch experiment '{id}'")]
    ExperimentFetch {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Document backend failure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document backend: {0}")]
    Backend(String),
}

/// Delimited export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("delimited writer: {0}")]
    Write(#[from] csv::Error),

    #[error("delimited buffer: {0}")]
    Buffer(String),
}
