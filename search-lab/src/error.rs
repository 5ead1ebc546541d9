use thiserror::Error;

/// Everything that can make a request invalid
///
/// A search that runs out of room or finds nothing is not an error, it comes back with
/// `found: false` instead.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("{puzzle} can't be solved with {algorithm}")]
    UnsupportedAlgorithm { puzzle: String, algorithm: String },
    #[error("unknown request: {0}")]
    UnknownRequest(String),
    #[error("malformed board: {0}")]
    MalformedBoard(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),
}
