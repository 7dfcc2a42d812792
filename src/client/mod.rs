// Ledger client: read and write access to contracts over JSON-RPC
pub mod rpc_client;
pub mod transaction;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use rpc_client::NearRpcClient;
pub use types::{AccessKeyInfo, OutcomeStatus, SubmissionOutcome};

use crate::error::Result;
use async_trait::async_trait;

/// Read and write operations against contracts on the ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Side-effect-free function call against final state.
    /// A contract returning nothing yields `Value::Null`.
    async fn view(
        &self,
        contract_id: &str,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// Signed, gas-consuming function call. Returns once the transaction
    /// outcome is final or the ledger rejects it.
    async fn call(
        &self,
        contract_id: &str,
        method: &str,
        args: serde_json::Value,
        gas: u64,
    ) -> Result<SubmissionOutcome>;
}

/// Lists the access keys registered on an account.
#[async_trait]
pub trait AccessKeySource: Send + Sync {
    /// Keys attached to `account_id` in final state. An account that does
    /// not exist has no keys.
    async fn access_keys(&self, account_id: &str) -> Result<Vec<AccessKeyInfo>>;
}
