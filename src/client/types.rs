use serde::{Deserialize, Serialize};

/// One entry of a `view_access_key_list` result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessKeyInfo {
    pub public_key: String,
    #[serde(default)]
    pub access_key: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccessKeyList {
    pub keys: Vec<AccessKeyInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccessKeyView {
    pub nonce: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CallFunctionResult {
    /// Raw bytes of the contract's return value.
    #[serde(default)]
    pub result: Option<Vec<u8>>,
    #[serde(default)]
    pub logs: Vec<String>,
    /// Older nodes report contract execution failures here instead of as an RPC error.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlockView {
    pub header: BlockHeaderView,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlockHeaderView {
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutcomeStatus {
    SuccessValue(String),
    SuccessReceiptId(String),
}

/// Result of a confirmed state-changing call. Reported, never acted upon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub transaction_hash: String,
    pub status: OutcomeStatus,
    pub gas_burnt: u64,
    pub logs: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FinalExecutionOutcome {
    pub status: serde_json::Value,
    pub transaction_outcome: ExecutionOutcomeWithId,
    #[serde(default)]
    pub receipts_outcome: Vec<ExecutionOutcomeWithId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecutionOutcomeWithId {
    pub id: String,
    pub outcome: ExecutionOutcome,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecutionOutcome {
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub gas_burnt: u64,
}
