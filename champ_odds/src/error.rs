use std::path::PathBuf;
use thiserror::Error;

/// Failures reading the scraped standings files.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Answers the estimator gives instead of a report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OddsError {
    #[error("Could not find '{query}' in the standings. Please provide a valid driver name.")]
    DriverNotFound { query: String },

    #[error("The standings are empty; there is no leader to compare against.")]
    EmptyStandings,
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Odds(#[from] OddsError),

    #[error("invalid input for {tool}: {reason}")]
    InvalidInput { tool: &'static str, reason: String },
}

pub type Result<T, E = ToolError> = std::result::Result<T, E>;
