use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// Call type of a Safe transaction or of one MultiSend sub-call.
///
/// The ordinal values are part of both the MultiSend wire format and the
/// `SafeTx` hash pre-image, and are what JSON carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Operation {
    #[default]
    Call = 0,
    DelegateCall = 1,
}

impl Operation {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Call),
            1 => Some(Self::DelegateCall),
            _ => None,
        }
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        op.as_u8()
    }
}

impl TryFrom<u8> for Operation {
    type Error = VerifyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
            .ok_or_else(|| VerifyError::decode(format!("invalid operation {value}")))
    }
}

/// A single call: one entry of a MultiSend batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: Operation,
}

/// The `SafeTx` message signed by Safe owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: Operation,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: U256,
}

impl SafeTransaction {
    /// Zero gas parameters, zero refund settings and nonce 0.
    pub fn new(to: Address, value: U256, data: impl Into<Bytes>, operation: Operation) -> Self {
        Self {
            to,
            value,
            data: data.into(),
            operation,
            safe_tx_gas: U256::ZERO,
            base_gas: U256::ZERO,
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            nonce: U256::ZERO,
        }
    }

    pub fn with_nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn call(&self) -> MetaTransaction {
        MetaTransaction {
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            operation: self.operation,
        }
    }
}

/// A signature attached to a Safe transaction.
///
/// `signer` is the owner claimed by the data source. Signatures taken from
/// on-chain `execTransaction` input carry no claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    pub signer: Option<Address>,
    pub signature: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_id: u64,
    pub name: String,
    pub short_name: String,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub rpc_urls: Vec<String>,
    #[serde(default)]
    pub explorers: Vec<String>,
}

/// Everything needed to verify a transaction, as produced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTransaction {
    pub chain: ChainInfo,
    pub safe_address: Address,
    pub safe_tx: SafeTransaction,
    pub signatures: Vec<SignatureRecord>,
    /// Hash reported by the transaction service, if the data came from one.
    pub asserted_hash: Option<B256>,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashCheck {
    pub value: B256,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedSignature {
    pub signer: Address,
    pub signature: Bytes,
    pub verified: bool,
}

/// Conditions a reviewer should look at before trusting a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum Warning {
    DelegateCall,
    DelegateCallInBatch(usize),
    NonZeroGasToken,
    NonZeroRefundReceiver,
    DangerousMethod(String),
}

/// One decoded argument. `value` is meant for display, not for re-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedArg {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub value: String,
}

/// Call data matched against a known ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedCall {
    pub name: String,
    pub signature: String,
    pub args: Vec<DecodedArg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    pub chain_id: u64,
    pub chain: ChainInfo,
    pub safe_address: Address,
    pub version: String,
    pub safe_tx: SafeTransaction,
    pub hash: HashCheck,
    /// Same order as the input signatures.
    pub signatures: Vec<VerifiedSignature>,
    /// Decoded sub-calls when `safe_tx.data` is a MultiSend call.
    pub batch: Option<Vec<MetaTransaction>>,
    /// `safe_tx.data` decoded against the built-in ABIs.
    pub decoded: Option<DecodedCall>,
    /// One entry per `batch` call; empty without a batch.
    pub decoded_batch: Vec<Option<DecodedCall>>,
    pub warnings: Vec<Warning>,
}

impl VerifyResult {
    pub fn all_verified(&self) -> bool {
        self.hash.verified && self.signatures.iter().all(|s| s.verified)
    }
}
