// JSON-RPC client for the ledger node
use super::transaction::Transaction;
use super::types::{
    AccessKeyInfo, AccessKeyList, AccessKeyView, BlockView, CallFunctionResult,
    FinalExecutionOutcome, OutcomeStatus, SubmissionOutcome,
};
use super::{AccessKeySource, LedgerClient};
use crate::config::OracleConfig;
use crate::crypto::OracleIdentity;
use crate::error::{OracleError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Node-side conditions that say nothing about the request itself.
const UNAVAILABLE_CAUSES: &[&str] = &[
    "TIMEOUT_ERROR",
    "INTERNAL_ERROR",
    "NO_SYNCED_BLOCKS",
    "UNAVAILABLE_SHARD",
    "UNKNOWN_BLOCK",
];

/// Error object of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RpcError {
    pub name: String,
    pub cause: Option<String>,
    pub message: String,
    pub data: Option<String>,
}

impl RpcError {
    fn from_value(error: &Value) -> Self {
        let data = match error.get("data") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        Self {
            name: error["name"].as_str().unwrap_or("").to_string(),
            cause: error["cause"]["name"].as_str().map(str::to_string),
            message: error["message"].as_str().unwrap_or("Unknown error").to_string(),
            data,
        }
    }

    fn cause_is(&self, name: &str) -> bool {
        self.cause.as_deref() == Some(name)
    }

    fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle)
            || self.data.as_deref().is_some_and(|d| d.contains(needle))
    }

    fn is_unavailable(&self) -> bool {
        self.cause
            .as_deref()
            .is_some_and(|c| UNAVAILABLE_CAUSES.contains(&c))
    }

    fn describe(&self) -> String {
        match (&self.cause, &self.data) {
            (Some(cause), Some(data)) => format!("{}: {}", cause, data),
            (Some(cause), None) => format!("{}: {}", cause, self.message),
            (None, Some(data)) => format!("{}: {}", self.message, data),
            (None, None) if self.name.is_empty() => self.message.clone(),
            (None, None) => format!("{}: {}", self.name, self.message),
        }
    }
}

/// Splits a JSON-RPC envelope into its result or its error object.
pub(crate) fn split_response(json: Value) -> Result<std::result::Result<Value, RpcError>> {
    if let Some(error) = json.get("error") {
        return Ok(Err(RpcError::from_value(error)));
    }
    match json.get("result") {
        Some(result) => Ok(Ok(result.clone())),
        None => Err(OracleError::MalformedResult(
            "response has neither result nor error".to_string(),
        )),
    }
}

pub(crate) fn classify_view_error(method: &str, e: RpcError) -> OracleError {
    if e.is_unavailable() {
        OracleError::NetworkUnavailable(e.describe())
    } else if e.cause_is("NO_CONTRACT_CODE")
        || e.cause_is("UNKNOWN_ACCOUNT")
        || e.mentions("MethodNotFound")
    {
        OracleError::MethodNotFound(format!("{}: {}", method, e.describe()))
    } else {
        OracleError::MalformedResult(format!("{}: {}", method, e.describe()))
    }
}

pub(crate) fn classify_call_error(e: RpcError) -> OracleError {
    if e.is_unavailable() {
        OracleError::NetworkUnavailable(e.describe())
    } else {
        OracleError::RejectedByLedger(e.describe())
    }
}

/// Decodes a `call_function` query result into the contract's JSON return value.
pub(crate) fn decode_view_result(method: &str, result: Value) -> Result<Value> {
    let call: CallFunctionResult = serde_json::from_value(result)?;
    if let Some(error) = call.error {
        if error.contains("MethodNotFound") || error.contains("CodeDoesNotExist") {
            return Err(OracleError::MethodNotFound(format!("{}: {}", method, error)));
        }
        return Err(OracleError::MalformedResult(format!("{}: {}", method, error)));
    }
    for log in &call.logs {
        debug!("[{}] {}", method, log);
    }
    match call.result {
        Some(bytes) if !bytes.is_empty() => Ok(serde_json::from_slice(&bytes)?),
        _ => Ok(Value::Null),
    }
}

/// Decodes a `broadcast_tx_commit` result. Failed executions become
/// `RejectedByLedger`.
pub(crate) fn decode_outcome(result: Value) -> Result<SubmissionOutcome> {
    let outcome: FinalExecutionOutcome = serde_json::from_value(result)?;

    let status = if let Some(failure) = outcome.status.get("Failure") {
        return Err(OracleError::RejectedByLedger(failure.to_string()));
    } else if let Some(value) = outcome.status.get("SuccessValue") {
        OutcomeStatus::SuccessValue(value.as_str().unwrap_or("").to_string())
    } else if let Some(id) = outcome.status.get("SuccessReceiptId") {
        OutcomeStatus::SuccessReceiptId(id.as_str().unwrap_or("").to_string())
    } else {
        return Err(OracleError::MalformedResult(format!(
            "unexpected execution status: {}",
            outcome.status
        )));
    };

    let mut gas_burnt = outcome.transaction_outcome.outcome.gas_burnt;
    let mut logs = outcome.transaction_outcome.outcome.logs;
    for receipt in outcome.receipts_outcome {
        gas_burnt = gas_burnt.saturating_add(receipt.outcome.gas_burnt);
        logs.extend(receipt.outcome.logs);
    }

    Ok(SubmissionOutcome {
        transaction_hash: outcome.transaction_outcome.id,
        status,
        gas_burnt,
        logs,
    })
}

/// Nonce for the next transaction: one past whichever is higher, the
/// ledger's view of the access key or the last nonce this client signed.
/// `None` once the key's nonce space is exhausted.
pub(crate) fn next_nonce(chain_nonce: u64, last_used: u64) -> Option<u64> {
    chain_nonce.max(last_used).checked_add(1)
}

pub struct NearRpcClient {
    url: String,
    client: Client,
    request_id: AtomicU64,
    signer: Option<OracleIdentity>,
    // The node's view of the access key can trail our own submissions.
    last_nonce: AtomicU64,
}

impl NearRpcClient {
    pub fn new(config: &OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            url: config.rpc_url.clone(),
            client,
            request_id: AtomicU64::new(1),
            signer: None,
            last_nonce: AtomicU64::new(0),
        })
    }

    /// Attaches the identity that state-changing calls are signed with.
    pub fn with_signer(mut self, identity: OracleIdentity) -> Self {
        self.signer = Some(identity);
        self
    }

    // Transport failures are the outer error; the node's error object is the inner one.
    async fn send_request(
        &self,
        method: &str,
        params: Value,
    ) -> Result<std::result::Result<Value, RpcError>> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<Value>(&body) {
            Ok(json) => split_response(json),
            Err(_) if !status.is_success() => Err(OracleError::NetworkUnavailable(format!(
                "RPC endpoint returned {}",
                status
            ))),
            Err(e) => Err(OracleError::MalformedResult(format!(
                "Failed to parse response: {}",
                e
            ))),
        }
    }

    async fn access_key_nonce(&self, account_id: &str, public_key: &str) -> Result<u64> {
        let params = json!({
            "request_type": "view_access_key",
            "finality": "optimistic",
            "account_id": account_id,
            "public_key": public_key,
        });
        match self.send_request("query", params).await? {
            Ok(result) => Ok(serde_json::from_value::<AccessKeyView>(result)?.nonce),
            Err(e) if e.is_unavailable() => Err(OracleError::NetworkUnavailable(e.describe())),
            Err(e) => Err(OracleError::RejectedByLedger(format!(
                "signer key {} not usable: {}",
                public_key,
                e.describe()
            ))),
        }
    }

    /// Reserves the nonce for the next signed transaction.
    fn reserve_nonce(&self, chain_nonce: u64) -> Result<u64> {
        let previous = self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                next_nonce(chain_nonce, last)
            })
            .map_err(|last| {
                OracleError::RejectedByLedger(format!(
                    "access key nonce exhausted (ledger {}, last used {})",
                    chain_nonce, last
                ))
            })?;
        next_nonce(chain_nonce, previous).ok_or_else(|| {
            OracleError::RejectedByLedger("access key nonce exhausted".to_string())
        })
    }

    async fn final_block_hash(&self) -> Result<[u8; 32]> {
        let result = self
            .send_request("block", json!({ "finality": "final" }))
            .await?
            .map_err(|e| {
                if e.is_unavailable() {
                    OracleError::NetworkUnavailable(e.describe())
                } else {
                    OracleError::MalformedResult(e.describe())
                }
            })?;
        let block: BlockView = serde_json::from_value(result)?;
        bs58::decode(&block.header.hash)
            .into_vec()
            .map_err(|e| OracleError::MalformedResult(format!("block hash: {}", e)))?
            .try_into()
            .map_err(|_| OracleError::MalformedResult("block hash must be 32 bytes".to_string()))
    }
}

#[async_trait]
impl LedgerClient for NearRpcClient {
    async fn view(&self, contract_id: &str, method: &str, args: Value) -> Result<Value> {
        let params = json!({
            "request_type": "call_function",
            "finality": "optimistic",
            "account_id": contract_id,
            "method_name": method,
            "args_base64": BASE64.encode(serde_json::to_vec(&args)?),
        });
        match self.send_request("query", params).await? {
            Ok(result) => decode_view_result(method, result),
            Err(e) => Err(classify_view_error(method, e)),
        }
    }

    async fn call(&self, contract_id: &str, method: &str, args: Value, gas: u64) -> Result<SubmissionOutcome> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            OracleError::Config("state-changing calls need a signing identity".to_string())
        })?;
        let public_key = signer.keypair.public_key_str();

        let chain_nonce = self.access_key_nonce(&signer.account_id, &public_key).await?;
        let block_hash = self.final_block_hash().await?;
        let nonce = self.reserve_nonce(chain_nonce)?;

        let signed = Transaction::function_call(
            &signer.account_id,
            signer.keypair.public_key_bytes(),
            nonce,
            contract_id,
            block_hash,
            method,
            serde_json::to_vec(&args)?,
            gas,
        )
        .sign(&signer.keypair)
        .map_err(|e| OracleError::MalformedResult(format!("encoding transaction: {}", e)))?;
        let encoded = signed
            .to_base64()
            .map_err(|e| OracleError::MalformedResult(format!("encoding transaction: {}", e)))?;

        debug!("Submitting {} to {} (nonce {})", method, contract_id, nonce);
        match self.send_request("broadcast_tx_commit", json!([encoded])).await? {
            Ok(result) => decode_outcome(result),
            Err(e) => Err(classify_call_error(e)),
        }
    }
}

#[async_trait]
impl AccessKeySource for NearRpcClient {
    async fn access_keys(&self, account_id: &str) -> Result<Vec<AccessKeyInfo>> {
        let params = json!({
            "request_type": "view_access_key_list",
            "finality": "final",
            "account_id": account_id,
        });
        match self.send_request("query", params).await? {
            Ok(result) => Ok(serde_json::from_value::<AccessKeyList>(result)?.keys),
            Err(e) if e.cause_is("UNKNOWN_ACCOUNT") => Ok(Vec::new()),
            Err(e) if e.is_unavailable() => Err(OracleError::NetworkUnavailable(e.describe())),
            Err(e) => Err(OracleError::MalformedResult(e.describe())),
        }
    }
}
