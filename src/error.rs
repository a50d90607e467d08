use thiserror::Error;

/// Failure modes of a single price fetch. None of these are fatal: every
/// error is consumed at the tick boundary and the next tick retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("price field missing from response")]
    MissingData,

    #[error("unexpected error: {0}")]
    Unknown(String),
}
