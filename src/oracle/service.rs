use crate::client::{LedgerClient, SubmissionOutcome};
use crate::config::OracleConfig;
use crate::error::Result;
use crate::oracle::cancel::CancelToken;
use crate::oracle::types::{ApplyRequestArgs, NextRequest, RunSummary, VerificationRequest};
use crate::oracle::verifier::IdentityVerifier;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const GET_NEXT_REQUEST: &str = "get_next_request";
const APPLY_NEXT_REQUEST: &str = "apply_next_request";

/// Drains the contract's request queue: fetch the head request, verify it,
/// write the result back, repeat until the queue is empty.
///
/// Holds no state between iterations. The contract owns the queue and
/// advances it only when `apply_next_request` succeeds, so a run can be
/// stopped and restarted at any point.
pub struct OracleLoop {
    ledger: Arc<dyn LedgerClient>,
    verifier: IdentityVerifier,
    contract_id: String,
    gas_budget: u64,
    dry_run: bool,
}

impl OracleLoop {
    pub fn new(config: &OracleConfig, ledger: Arc<dyn LedgerClient>, verifier: IdentityVerifier) -> Self {
        Self {
            ledger,
            verifier,
            contract_id: config.contract_id.clone(),
            gas_budget: config.gas_budget,
            dry_run: false,
        }
    }

    /// Verify and report the head request without submitting anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes requests until the queue is empty, the token is cancelled,
    /// or an operation fails. Failures are not retried.
    pub async fn run(&self, cancel: &CancelToken) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        loop {
            if cancel.is_cancelled() {
                warn!("Cancellation requested; stopping after {} request(s)", summary.processed);
                summary.cancelled = true;
                return Ok(summary);
            }

            let next = match cancel.run_until_cancelled(self.fetch_next()).await {
                Some(next) => next?,
                None => continue,
            };
            let request = match next {
                NextRequest::Pending(request) => request,
                NextRequest::Empty => return Ok(summary),
            };
            info!(
                "Request: {} claims {}",
                request.account_id, request.claimed_public_key
            );

            let verified = match cancel
                .run_until_cancelled(
                    self.verifier
                        .verify(&request.account_id, &request.claimed_public_key),
                )
                .await
            {
                Some(verified) => verified?,
                None => continue,
            };

            if self.dry_run {
                info!(
                    "[dry-run] {} / {} -> {} (not submitted)",
                    request.account_id, request.claimed_public_key, verified
                );
                summary.record(verified, None);
                return Ok(summary);
            }

            // Submissions are not raced against cancellation: once signed and
            // sent, the outcome is awaited so it can be reported.
            let outcome = self.submit(&request, verified).await?;
            info!(
                "Applied {} / {} -> {} (tx {}, {} gas burnt)",
                request.account_id,
                request.claimed_public_key,
                verified,
                outcome.transaction_hash,
                outcome.gas_burnt
            );
            for log in &outcome.logs {
                info!("  log: {}", log);
            }
            summary.record(verified, Some(outcome));
        }
    }

    /// Drains the queue, sleeps `interval`, and drains again until cancelled.
    /// The first failed drain ends the watch.
    pub async fn watch(&self, interval: Duration, cancel: &CancelToken) -> Result<RunSummary> {
        let mut total = RunSummary::default();
        loop {
            let summary = self.run(cancel).await?;
            if summary.processed > 0 {
                info!(
                    "Drained {} request(s): {} verified, {} rejected",
                    summary.processed, summary.verified, summary.rejected
                );
            }
            total.merge(summary);
            if total.cancelled || self.dry_run {
                return Ok(total);
            }
            if cancel.run_until_cancelled(tokio::time::sleep(interval)).await.is_none() {
                total.cancelled = true;
                return Ok(total);
            }
        }
    }

    async fn fetch_next(&self) -> Result<NextRequest> {
        let value = self
            .ledger
            .view(&self.contract_id, GET_NEXT_REQUEST, json!({}))
            .await?;
        NextRequest::from_view(value)
    }

    async fn submit(
        &self,
        request: &VerificationRequest,
        verified: bool,
    ) -> Result<SubmissionOutcome> {
        let args = serde_json::to_value(ApplyRequestArgs::new(request, verified))?;
        self.ledger
            .call(&self.contract_id, APPLY_NEXT_REQUEST, args, self.gas_budget)
            .await
    }
}
