use crate::error::{OracleError, Result};
use ed25519_dalek::{Signature, Signer, SigningKey};

const ED25519_PREFIX: &str = "ed25519:";

pub struct KeyPair {
    pub signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new Ed25519 keypair
    #[cfg(test)]
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        KeyPair {
            signing_key: SigningKey::generate(&mut csprng),
        }
    }

    /// Parse a secret key in `ed25519:<base58>` form.
    ///
    /// Accepts the 64-byte layout (seed followed by public key) written by
    /// wallet tooling, and a bare 32-byte seed. For the 64-byte form the
    /// trailing public key must match the one derived from the seed.
    pub fn from_secret_key_str(s: &str) -> Result<Self> {
        let encoded = s
            .strip_prefix(ED25519_PREFIX)
            .ok_or_else(|| OracleError::InvalidKey("expected ed25519: prefix".to_string()))?;
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| OracleError::InvalidKey(format!("invalid base58: {}", e)))?;

        let seed: [u8; 32] = match bytes.len() {
            32 | 64 => bytes[..32]
                .try_into()
                .map_err(|_| OracleError::InvalidKey("bad seed length".to_string()))?,
            n => {
                return Err(OracleError::InvalidKey(format!(
                    "expected 32 or 64 bytes, got {}",
                    n
                )))
            }
        };

        let keypair = KeyPair {
            signing_key: SigningKey::from_bytes(&seed),
        };
        if bytes.len() == 64 && bytes[32..] != keypair.public_key_bytes()[..] {
            return Err(OracleError::InvalidKey(
                "public half does not match secret seed".to_string(),
            ));
        }
        Ok(keypair)
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    #[cfg(test)]
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        use ed25519_dalek::Verifier;
        self.signing_key.verifying_key().verify(message, signature).is_ok()
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Public key in `ed25519:<base58>` form, as the ledger lists it.
    pub fn public_key_str(&self) -> String {
        format!(
            "{}{}",
            ED25519_PREFIX,
            bs58::encode(self.public_key_bytes()).into_string()
        )
    }

    /// Secret key in the 64-byte `ed25519:<base58>` form.
    #[cfg(test)]
    pub fn secret_key_str(&self) -> String {
        let mut bytes = Vec::with_capacity(64);
        bytes.extend_from_slice(&self.signing_key.to_bytes());
        bytes.extend_from_slice(&self.public_key_bytes());
        format!("{}{}", ED25519_PREFIX, bs58::encode(bytes).into_string())
    }
}

/// Identity the oracle signs transactions as.
pub struct OracleIdentity {
    pub account_id: String,
    pub keypair: KeyPair,
}

impl OracleIdentity {
    pub fn new(account_id: impl Into<String>, keypair: KeyPair) -> Self {
        Self {
            account_id: account_id.into(),
            keypair,
        }
    }

    pub fn from_secret_key_str(account_id: impl Into<String>, secret: &str) -> Result<Self> {
        Ok(Self::new(account_id, KeyPair::from_secret_key_str(secret)?))
    }
}

impl std::fmt::Debug for OracleIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleIdentity")
            .field("account_id", &self.account_id)
            .field("public_key", &self.keypair.public_key_str())
            .finish()
    }
}
