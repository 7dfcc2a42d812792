use crate::client::SubmissionOutcome;
use crate::error::{OracleError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A pending claim that `claimed_public_key` is an access key of `account_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub account_id: String,
    pub claimed_public_key: String,
}

/// What `get_next_request` reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextRequest {
    Pending(VerificationRequest),
    Empty,
}

impl NextRequest {
    /// Decodes the contract's `Option<(AccountId, String)>` return value.
    ///
    /// `null` and `[]` mean the queue is empty. Anything other than a
    /// two-element array of strings is malformed.
    pub fn from_view(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(NextRequest::Empty),
            Value::Array(items) if items.is_empty() => Ok(NextRequest::Empty),
            Value::Array(items) => {
                let (account_id, claimed_public_key) =
                    serde_json::from_value::<(String, String)>(Value::Array(items)).map_err(
                        |e| OracleError::MalformedResult(format!("get_next_request: {}", e)),
                    )?;
                Ok(NextRequest::Pending(VerificationRequest {
                    account_id,
                    claimed_public_key,
                }))
            }
            other => Err(OracleError::MalformedResult(format!(
                "get_next_request: expected null or [account_id, public_key], got {}",
                other
            ))),
        }
    }
}

/// Arguments of `apply_next_request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyRequestArgs {
    pub action: (String, String),
    pub result: bool,
}

impl ApplyRequestArgs {
    pub fn new(request: &VerificationRequest, result: bool) -> Self {
        Self {
            action: (request.account_id.clone(), request.claimed_public_key.clone()),
            result,
        }
    }
}

/// Tally of one drain of the request queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub verified: usize,
    pub rejected: usize,
    pub submissions: Vec<SubmissionOutcome>,
    /// Stopped by the operator before the queue was empty.
    pub cancelled: bool,
}

impl RunSummary {
    pub(crate) fn record(&mut self, verified: bool, outcome: Option<SubmissionOutcome>) {
        self.processed += 1;
        if verified {
            self.verified += 1;
        } else {
            self.rejected += 1;
        }
        if let Some(outcome) = outcome {
            self.submissions.push(outcome);
        }
    }

    pub(crate) fn merge(&mut self, other: RunSummary) {
        self.processed += other.processed;
        self.verified += other.verified;
        self.rejected += other.rejected;
        self.submissions.extend(other.submissions);
        self.cancelled |= other.cancelled;
    }
}
