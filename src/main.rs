//! Access-key verification oracle.
//!
//! Polls the oracle contract for pending `(account_id, public_key)` claims,
//! checks each against the account's registered access keys, and submits
//! the verdict with `apply_next_request`.
//!
//! ```bash
//! key-oracle oracle.testnet ed25519:<secret> --contract-id queue.testnet
//! ```

use clap::Parser;
use key_oracle::cli::Cli;
use key_oracle::client::NearRpcClient;
use key_oracle::config::OracleConfig;
use key_oracle::crypto::OracleIdentity;
use key_oracle::oracle::{cancel_pair, IdentityVerifier, OracleLoop, RunSummary};
use key_oracle::Result;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    match run(cli).await {
        Ok(summary) => {
            info!(
                "{} request(s) processed: {} verified, {} rejected",
                summary.processed, summary.verified, summary.rejected
            );
            if summary.cancelled {
                warn!("Stopped by operator");
            }
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if e.is_network() {
                error!("Oracle aborted, RPC endpoint unavailable: {}", e);
            } else {
                error!("Oracle aborted: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary> {
    let config = OracleConfig::load_or_default(&cli.config)?.with_overrides(
        cli.rpc_url,
        cli.contract_id,
        cli.gas,
    );
    let identity = OracleIdentity::from_secret_key_str(cli.account_id, &cli.private_key)?;

    info!("🔮 Key oracle starting");
    info!("Operator: {:?}", identity);
    info!("Contract: {}", config.contract_id);
    info!("RPC URL: {}", config.rpc_url);
    info!("Gas budget: {}", config.gas_budget);

    let client = Arc::new(NearRpcClient::new(&config)?.with_signer(identity));
    let verifier = IdentityVerifier::new(client.clone());
    let oracle = OracleLoop::new(&config, client, verifier).dry_run(cli.dry_run);

    let (handle, token) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, finishing current step");
            handle.cancel();
        }
    });

    match cli.watch {
        Some(secs) => {
            info!("Watching every {}s", secs);
            oracle.watch(Duration::from_secs(secs), &token).await
        }
        None => oracle.run(&token).await,
    }
}
