use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),
    #[error("Rejected by ledger: {0}")]
    RejectedByLedger(String),
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("Malformed result: {0}")]
    MalformedResult(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, OracleError>;

impl From<reqwest::Error> for OracleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OracleError::NetworkUnavailable(format!("request timed out: {}", e))
        } else if e.is_decode() {
            OracleError::MalformedResult(format!("failed to parse response: {}", e))
        } else {
            OracleError::NetworkUnavailable(format!("RPC request failed: {}", e))
        }
    }
}

impl From<serde_json::Error> for OracleError {
    fn from(e: serde_json::Error) -> Self {
        OracleError::MalformedResult(e.to_string())
    }
}

impl OracleError {
    /// Failures that say nothing about the request itself, only the path to the node.
    pub fn is_network(&self) -> bool {
        matches!(self, OracleError::NetworkUnavailable(_))
    }
}
