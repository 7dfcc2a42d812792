//! In-memory ledger for tests.
//!
//! Models the oracle contract's request queue (last-in is served first, and
//! `apply_next_request` pops only when its action matches the head) plus a
//! table of account access keys. Every operation is recorded.

use super::{AccessKeyInfo, AccessKeySource, LedgerClient, OutcomeStatus, SubmissionOutcome};
use crate::error::{OracleError, Result};
use crate::oracle::cancel::CancelHandle;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub contract_id: String,
    pub method: String,
    pub args: Value,
    pub gas: u64,
}

#[derive(Default)]
struct MockState {
    queue: Vec<(String, String)>,
    keys: HashMap<String, Vec<String>>,
    views: Vec<String>,
    key_queries: Vec<String>,
    calls: Vec<RecordedCall>,
    view_failure: Option<OracleError>,
    key_failure: Option<OracleError>,
    call_failure: Option<OracleError>,
    raw_next_request: Option<Value>,
    hang_key_listing: bool,
    cancel_on_call: Option<CancelHandle>,
}

#[derive(Default)]
pub struct MockLedger {
    state: Mutex<MockState>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request; the most recently pushed one is served first.
    pub fn push_request(&self, account_id: &str, public_key: &str) {
        let mut s = self.state.lock().unwrap();
        s.queue.push((account_id.to_string(), public_key.to_string()));
    }

    pub fn set_keys(&self, account_id: &str, keys: &[&str]) {
        let mut s = self.state.lock().unwrap();
        s.keys.insert(
            account_id.to_string(),
            keys.iter().map(|k| k.to_string()).collect(),
        );
    }

    /// Serve this exact value from `get_next_request` once.
    pub fn set_raw_next_request(&self, value: Value) {
        self.state.lock().unwrap().raw_next_request = Some(value);
    }

    pub fn fail_view(&self, err: OracleError) {
        self.state.lock().unwrap().view_failure = Some(err);
    }

    pub fn fail_key_listing(&self, err: OracleError) {
        self.state.lock().unwrap().key_failure = Some(err);
    }

    pub fn fail_call(&self, err: OracleError) {
        self.state.lock().unwrap().call_failure = Some(err);
    }

    /// Key listings never complete.
    pub fn hang_key_listing(&self) {
        self.state.lock().unwrap().hang_key_listing = true;
    }

    /// Fire `handle` while the next call is being processed.
    pub fn cancel_on_call(&self, handle: CancelHandle) {
        self.state.lock().unwrap().cancel_on_call = Some(handle);
    }

    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    pub fn views(&self) -> Vec<String> {
        self.state.lock().unwrap().views.clone()
    }

    pub fn key_queries(&self) -> Vec<String> {
        self.state.lock().unwrap().key_queries.clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn view(&self, _contract_id: &str, method: &str, _args: Value) -> Result<Value> {
        let mut s = self.state.lock().unwrap();
        s.views.push(method.to_string());
        if let Some(err) = s.view_failure.take() {
            return Err(err);
        }
        match method {
            "get_next_request" => {
                if let Some(raw) = s.raw_next_request.take() {
                    return Ok(raw);
                }
                Ok(match s.queue.last() {
                    Some((account, key)) => json!([account, key]),
                    None => Value::Null,
                })
            }
            other => Err(OracleError::MethodNotFound(other.to_string())),
        }
    }

    async fn call(
        &self,
        contract_id: &str,
        method: &str,
        args: Value,
        gas: u64,
    ) -> Result<SubmissionOutcome> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(RecordedCall {
            contract_id: contract_id.to_string(),
            method: method.to_string(),
            args: args.clone(),
            gas,
        });
        if let Some(handle) = s.cancel_on_call.take() {
            handle.cancel();
        }
        if let Some(err) = s.call_failure.take() {
            return Err(err);
        }
        if method != "apply_next_request" {
            return Err(OracleError::MethodNotFound(method.to_string()));
        }

        let action: (String, String) = serde_json::from_value(args["action"].clone())
            .map_err(|e| OracleError::RejectedByLedger(e.to_string()))?;
        match s.queue.last() {
            None => return Err(OracleError::RejectedByLedger("No items in the queue".into())),
            Some(head) if *head != action => {
                return Err(OracleError::RejectedByLedger("Incorrect action".into()))
            }
            Some(_) => {}
        }
        s.queue.pop();

        Ok(SubmissionOutcome {
            transaction_hash: format!("tx-{}", s.calls.len()),
            status: OutcomeStatus::SuccessValue(String::new()),
            gas_burnt: 5_000_000_000_000,
            logs: vec![],
        })
    }
}

#[async_trait]
impl AccessKeySource for MockLedger {
    async fn access_keys(&self, account_id: &str) -> Result<Vec<AccessKeyInfo>> {
        let hang = {
            let mut s = self.state.lock().unwrap();
            s.key_queries.push(account_id.to_string());
            if let Some(err) = s.key_failure.take() {
                return Err(err);
            }
            s.hang_key_listing
        };
        if hang {
            std::future::pending::<()>().await;
        }

        let s = self.state.lock().unwrap();
        Ok(s.keys
            .get(account_id)
            .map(|keys| {
                keys.iter()
                    .map(|k| AccessKeyInfo {
                        public_key: k.clone(),
                        access_key: json!({ "nonce": 0, "permission": "FullAccess" }),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
