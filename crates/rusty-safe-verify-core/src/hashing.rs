//! EIP-712 hashing of Safe transactions
//!
//! safeTxHash = keccak256("\x19\x01" || domainSeparator || hashStruct(SafeTx))
//!
//! The domain of Safe 1.1.x and 1.2.0 contracts has no `chainId` field. Every
//! other version includes it.

use alloy::primitives::{Address, B256, U256};
use alloy::sol;
use alloy::sol_types::{Eip712Domain, SolStruct};

use crate::domain::SafeTransaction;

/// Versions whose domain separator is `EIP712Domain(address verifyingContract)`.
///
/// Not the same set as [`crate::signature::RECOVERABLE_VERSIONS`]: a version
/// outside both sets still hashes with the chain-bound domain.
pub const LEGACY_DOMAIN_VERSIONS: [&str; 3] = ["1.1.0", "1.1.1", "1.2.0"];

sol! {
    struct SafeTx {
        address to;
        uint256 value;
        bytes data;
        uint8 operation;
        uint256 safeTxGas;
        uint256 baseGas;
        uint256 gasPrice;
        address gasToken;
        address refundReceiver;
        uint256 nonce;
    }
}

impl From<&SafeTransaction> for SafeTx {
    fn from(tx: &SafeTransaction) -> Self {
        Self {
            to: tx.to,
            value: tx.value,
            data: tx.data.clone(),
            operation: tx.operation.as_u8(),
            safeTxGas: tx.safe_tx_gas,
            baseGas: tx.base_gas,
            gasPrice: tx.gas_price,
            gasToken: tx.gas_token,
            refundReceiver: tx.refund_receiver,
            nonce: tx.nonce,
        }
    }
}

pub fn uses_legacy_domain(version: &str) -> bool {
    LEGACY_DOMAIN_VERSIONS.contains(&version)
}

/// The EIP-712 domain a Safe of `version` signs under.
pub fn safe_domain(chain_id: u64, safe_address: Address, version: &str) -> Eip712Domain {
    let chain_id = (!uses_legacy_domain(version)).then(|| U256::from(chain_id));
    Eip712Domain::new(None, None, chain_id, Some(safe_address), None)
}

pub fn domain_separator(chain_id: u64, safe_address: Address, version: &str) -> B256 {
    safe_domain(chain_id, safe_address, version).hash_struct()
}

pub fn safe_tx_struct_hash(tx: &SafeTransaction) -> B256 {
    SafeTx::from(tx).eip712_hash_struct()
}

/// The hash Safe owners sign for `tx`.
pub fn hash_safe_transaction(
    chain_id: u64,
    safe_address: Address,
    tx: &SafeTransaction,
    version: &str,
) -> B256 {
    let domain = safe_domain(chain_id, safe_address, version);
    SafeTx::from(tx).eip712_signing_hash(&domain)
}
