use clap::Parser;

/// Verifies pending access-key claims from the oracle contract and writes
/// the results back on-chain.
#[derive(Parser)]
#[command(name = "key-oracle")]
#[command(about = "Access-key verification oracle", long_about = None)]
pub struct Cli {
    /// Oracle operator account id
    pub account_id: String,

    /// Operator private key (ed25519:<base58>)
    #[arg(env = "ORACLE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Path to the TOML config file
    #[arg(long, default_value = "oracle.toml")]
    pub config: String,

    /// RPC endpoint, overriding the config file
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Oracle contract id, overriding the config file
    #[arg(long)]
    pub contract_id: Option<String>,

    /// Gas attached to each apply_next_request call, overriding the config file
    #[arg(long)]
    pub gas: Option<u64>,

    /// Verify the head request and report it without submitting
    #[arg(long)]
    pub dry_run: bool,

    /// Keep polling: re-drain the queue every SECS seconds until Ctrl-C
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
