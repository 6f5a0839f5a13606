//! Owner signature classification and recovery.
//!
//! Safe packs each owner signature as `r (32) || s (32) || v (1)`, and `v`
//! selects the scheme:
//! - `0`: contract signature (EIP-1271), not recoverable
//! - `1`: pre-approved hash, not recoverable
//! - `> 30`: eth_sign over the safeTxHash, recovered with `v - 4`
//! - otherwise: plain ECDSA over the safeTxHash

use alloy::primitives::{eip191_hash_message, Address, PrimitiveSignature, B256, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calldata::SIGNATURE_LEN;
use crate::domain::SafeTransaction;
use crate::error::{Result, VerifyError};
use crate::hashing::hash_safe_transaction;

/// Versions whose signatures can be recovered.
///
/// Deliberately independent of [`crate::hashing::LEGACY_DOMAIN_VERSIONS`]:
/// 1.0.0 hashes fine but is rejected here.
pub const RECOVERABLE_VERSIONS: [&str; 6] = ["1.1.0", "1.1.1", "1.2.0", "1.3.0", "1.4.0", "1.4.1"];

pub fn is_recoverable_version(version: &str) -> bool {
    RECOVERABLE_VERSIONS.contains(&version)
}

/// A recoverable signature. `v` is the value ECDSA recovery runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "camelCase")]
pub enum SignatureKind {
    Ecdsa { v: u8 },
    EthSign { v: u8 },
}

impl SignatureKind {
    pub fn recovery_v(self) -> u8 {
        match self {
            Self::Ecdsa { v } | Self::EthSign { v } => v,
        }
    }
}

pub fn classify_signature(signature: &[u8]) -> Result<SignatureKind> {
    if signature.len() != SIGNATURE_LEN {
        return Err(VerifyError::InvalidSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }

    match signature[64] {
        0 => Err(VerifyError::UnsupportedSignatureScheme("contract signature")),
        1 => Err(VerifyError::UnsupportedSignatureScheme("approveHash")),
        v if v > 30 => Ok(SignatureKind::EthSign { v: v - 4 }),
        v => Ok(SignatureKind::Ecdsa { v }),
    }
}

/// Recover the signer of an already computed safeTxHash.
pub fn recover_from_hash(safe_tx_hash: B256, signature: &[u8]) -> Result<Address> {
    let kind = classify_signature(signature)?;
    let digest = match kind {
        SignatureKind::Ecdsa { .. } => safe_tx_hash,
        SignatureKind::EthSign { .. } => eip191_hash_message(safe_tx_hash),
    };

    let y_parity = match kind.recovery_v() {
        27 => false,
        28 => true,
        v => {
            return Err(VerifyError::InvalidSignature(format!(
                "invalid recovery id {v}"
            )))
        }
    };

    let r = U256::from_be_slice(&signature[..32]);
    let s = U256::from_be_slice(&signature[32..64]);
    let signer = PrimitiveSignature::new(r, s, y_parity)
        .recover_address_from_prehash(&digest)
        .map_err(|e| VerifyError::InvalidSignature(e.to_string()))?;

    debug!(%signer, ?kind, "recovered signer");
    Ok(signer)
}

/// Recover the owner that produced `signature` over `tx` on the given Safe.
pub fn recover_signer(
    chain_id: u64,
    tx: &SafeTransaction,
    safe_address: Address,
    version: &str,
    signature: &[u8],
) -> Result<Address> {
    if !is_recoverable_version(version) {
        return Err(VerifyError::UnsupportedVersion(version.to_string()));
    }
    let hash = hash_safe_transaction(chain_id, safe_address, tx, version);
    recover_from_hash(hash, signature)
}
