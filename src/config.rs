use crate::error::{OracleError, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One TGas in gas units.
pub const TGAS: u64 = 1_000_000_000_000;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OracleConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_contract_id")]
    pub contract_id: String,
    /// Fixed gas attached to every `apply_next_request` call.
    #[serde(default = "default_gas_budget")]
    pub gas_budget: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_rpc_url() -> String {
    "https://rpc.testnet.near.org".to_string()
}

fn default_contract_id() -> String {
    "dev-1663022799979-96778451185412".to_string()
}

fn default_gas_budget() -> u64 {
    300 * TGAS
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_id: default_contract_id(),
            gas_budget: default_gas_budget(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl OracleConfig {
    /// Reads the config at `path`. A missing file is created with defaults;
    /// an unreadable or invalid one is an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            let s = std::fs::read_to_string(path)
                .map_err(|e| OracleError::Config(format!("reading {}: {}", path, e)))?;
            let config: Self = toml::from_str(&s)
                .map_err(|e| OracleError::Config(format!("parsing {}: {}", path, e)))?;
            info!("Config loaded from {}", path);
            Ok(config)
        } else {
            info!("Config file not found at '{}'. Creating default.", path);
            let config = Self::default();
            match toml::to_string_pretty(&config) {
                Ok(s) => {
                    if let Err(e) = std::fs::write(path, s) {
                        warn!("Could not write default config to {}: {}", path, e);
                    }
                }
                Err(e) => warn!("Could not serialize default config: {}", e),
            }
            Ok(config)
        }
    }

    /// Applies command-line overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        rpc_url: Option<String>,
        contract_id: Option<String>,
        gas_budget: Option<u64>,
    ) -> Self {
        if let Some(url) = rpc_url {
            self.rpc_url = url;
        }
        if let Some(id) = contract_id {
            self.contract_id = id;
        }
        if let Some(gas) = gas_budget {
            self.gas_budget = gas;
        }
        self
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
