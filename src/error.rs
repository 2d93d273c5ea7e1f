// src/error.rs

use thiserror::Error;

/// Failures of the fetch → clean → aggregate pipeline. None are retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("empty data: {0}")]
    EmptyData(String),
}

impl PipelineError {
    /// Stable name reported to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Fetch { .. } => "FetchError",
            PipelineError::Parse(_) => "ParseError",
            PipelineError::Schema(_) => "SchemaError",
            PipelineError::EmptyData(_) => "EmptyDataError",
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
