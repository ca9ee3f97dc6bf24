//! Error types for filter translation and query parsing.

use thiserror::Error;

/// Errors raised while translating UI selections into query arguments.
///
/// Every variant describes input the search page never legitimately produces,
/// so callers treat them as configuration errors rather than retrying.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown filter type: {0:?}")]
    UnknownFilter(String),

    #[error("unknown comparison operator: {0:?}")]
    UnknownComparison(String),

    #[error("unknown filter behaviour: {0:?}")]
    UnknownBehaviour(String),

    #[error("invalid date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("missing selection: {0}")]
    MissingSelection(&'static str),

    #[error("invalid page number: {0:?}")]
    InvalidPage(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;
