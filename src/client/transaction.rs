//! Borsh wire format for function-call transactions.
//!
//! Only the subset needed to sign and submit a single `FunctionCall`
//! action with an ed25519 key is modelled. Enum tags follow the ledger's
//! layout: key type 0 is ed25519, action tag 2 is `FunctionCall`.

use crate::crypto::KeyPair;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use std::io::Write;

const KEY_TYPE_ED25519: u8 = 0;
const ACTION_FUNCTION_CALL: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl BorshSerialize for Ed25519PublicKey {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        KEY_TYPE_ED25519.serialize(writer)?;
        self.0.serialize(writer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl BorshSerialize for Ed25519Signature {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        KEY_TYPE_ED25519.serialize(writer)?;
        writer.write_all(&self.0)
    }
}

#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: Vec<u8>,
    pub gas: u64,
    pub deposit: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FunctionCall(FunctionCallAction),
}

impl BorshSerialize for Action {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Action::FunctionCall(call) => {
                ACTION_FUNCTION_CALL.serialize(writer)?;
                call.serialize(writer)
            }
        }
    }
}

#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signer_id: String,
    pub public_key: Ed25519PublicKey,
    pub nonce: u64,
    pub receiver_id: String,
    pub block_hash: [u8; 32],
    pub actions: Vec<Action>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn function_call(
        signer_id: &str,
        public_key: [u8; 32],
        nonce: u64,
        receiver_id: &str,
        block_hash: [u8; 32],
        method_name: &str,
        args: Vec<u8>,
        gas: u64,
    ) -> Self {
        Self {
            signer_id: signer_id.to_string(),
            public_key: Ed25519PublicKey(public_key),
            nonce,
            receiver_id: receiver_id.to_string(),
            block_hash,
            actions: vec![Action::FunctionCall(FunctionCallAction {
                method_name: method_name.to_string(),
                args,
                gas,
                deposit: 0,
            })],
        }
    }

    /// SHA-256 of the borsh encoding; this is what gets signed and what the
    /// ledger reports as the transaction hash.
    pub fn hash(&self) -> std::io::Result<[u8; 32]> {
        let bytes = borsh::to_vec(self)?;
        Ok(Sha256::digest(&bytes).into())
    }

    pub fn sign(self, keypair: &KeyPair) -> std::io::Result<SignedTransaction> {
        let hash = self.hash()?;
        let signature = keypair.sign(&hash);
        Ok(SignedTransaction {
            transaction: self,
            signature: Ed25519Signature(signature.to_bytes()),
        })
    }
}

#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: Ed25519Signature,
}

impl SignedTransaction {
    /// Base64 of the borsh encoding, as `broadcast_tx_commit` expects it.
    pub fn to_base64(&self) -> std::io::Result<String> {
        Ok(BASE64.encode(borsh::to_vec(self)?))
    }
}
