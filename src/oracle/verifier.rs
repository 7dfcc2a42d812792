use crate::client::AccessKeySource;
use crate::error::Result;
use std::sync::Arc;
use tracing::debug;

/// Checks claimed keys against the ledger's own access-key listing, which
/// is independent of the contract asking the question.
pub struct IdentityVerifier {
    keys: Arc<dyn AccessKeySource>,
}

impl IdentityVerifier {
    pub fn new(keys: Arc<dyn AccessKeySource>) -> Self {
        Self { keys }
    }

    /// True iff `claimed_public_key` is exactly one of the account's access keys.
    ///
    /// Unknown accounts have no keys and verify as `false`. Lookup failures
    /// are returned as errors, never as `false`.
    pub async fn verify(&self, account_id: &str, claimed_public_key: &str) -> Result<bool> {
        let keys = self.keys.access_keys(account_id).await?;
        let found = keys.iter().any(|k| k.public_key == claimed_public_key);
        debug!(
            "{} has {} access key(s); {} {}",
            account_id,
            keys.len(),
            claimed_public_key,
            if found { "present" } else { "absent" }
        );
        Ok(found)
    }
}
