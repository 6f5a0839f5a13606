//! Safe client gateway transaction payload
//!
//! `GET /v1/chains/{chainId}/transactions/{id}`. Numeric fields arrive as
//! decimal strings or JSON numbers, and most fields can be absent or null.

use std::str::FromStr;

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::domain::{Operation, SafeTransaction, SignatureRecord};
use crate::error::{Result, VerifyError};

pub const DEFAULT_GATEWAY_URL: &str = "https://safe-client.safe.global";

/// Path of a transaction on the gateway, relative to its base URL.
pub fn transaction_path(chain_id: u64, tx_id: &str) -> String {
    format!("/v1/chains/{chain_id}/transactions/{tx_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Number(u64),
    Text(String),
}

impl NumberLike {
    fn to_u256(&self, field: &str) -> Result<U256> {
        match self {
            Self::Number(n) => Ok(U256::from(*n)),
            Self::Text(s) if s.trim().is_empty() => Ok(U256::ZERO),
            Self::Text(s) => U256::from_str(s.trim())
                .map_err(|e| VerifyError::decode(format!("gateway field {field} = {s:?}: {e}"))),
        }
    }
}

fn number_or_zero(value: &Option<NumberLike>, field: &str) -> Result<U256> {
    value
        .as_ref()
        .map_or(Ok(U256::ZERO), |v| v.to_u256(field))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub value: Option<Address>,
}

impl AddressInfo {
    fn or_zero(info: &Option<AddressInfo>) -> Address {
        info.as_ref().and_then(|i| i.value).unwrap_or(Address::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTxData {
    pub to: Option<AddressInfo>,
    pub value: Option<NumberLike>,
    pub hex_data: Option<Bytes>,
    pub operation: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfirmation {
    pub signer: AddressInfo,
    pub signature: Option<Bytes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayExecutionInfo {
    pub safe_tx_gas: Option<NumberLike>,
    pub base_gas: Option<NumberLike>,
    pub gas_price: Option<NumberLike>,
    pub gas_token: Option<Address>,
    pub refund_receiver: Option<AddressInfo>,
    pub nonce: Option<NumberLike>,
    pub safe_tx_hash: Option<B256>,
    #[serde(default)]
    pub confirmations: Vec<GatewayConfirmation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTxDetails {
    pub safe_address: Address,
    pub tx_id: Option<String>,
    pub tx_data: Option<GatewayTxData>,
    pub detailed_execution_info: Option<GatewayExecutionInfo>,
}

/// A gateway payload reduced to the fields verification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayTransaction {
    pub safe_address: Address,
    pub safe_tx: SafeTransaction,
    pub signatures: Vec<SignatureRecord>,
    pub asserted_hash: Option<B256>,
}

impl GatewayTxDetails {
    /// Apply the gateway defaults: absent addresses are zero, absent numbers
    /// are 0 and absent data is empty.
    pub fn normalize(&self) -> Result<GatewayTransaction> {
        let data = self
            .tx_data
            .as_ref()
            .ok_or_else(|| VerifyError::decode("gateway payload has no txData"))?;
        let info = self.detailed_execution_info.as_ref().ok_or_else(|| {
            VerifyError::decode("gateway payload is not a multisig transaction")
        })?;

        let raw_operation = data.operation.unwrap_or_default();
        let operation = Operation::from_u8(raw_operation).ok_or_else(|| {
            VerifyError::decode(format!("invalid operation {raw_operation}"))
        })?;

        let safe_tx = SafeTransaction {
            to: AddressInfo::or_zero(&data.to),
            value: number_or_zero(&data.value, "value")?,
            data: data.hex_data.clone().unwrap_or_default(),
            operation,
            safe_tx_gas: number_or_zero(&info.safe_tx_gas, "safeTxGas")?,
            base_gas: number_or_zero(&info.base_gas, "baseGas")?,
            gas_price: number_or_zero(&info.gas_price, "gasPrice")?,
            gas_token: info.gas_token.unwrap_or(Address::ZERO),
            refund_receiver: AddressInfo::or_zero(&info.refund_receiver),
            nonce: number_or_zero(&info.nonce, "nonce")?,
        };

        let signatures = info
            .confirmations
            .iter()
            .map(|c| SignatureRecord {
                signer: c.signer.value,
                signature: c.signature.clone().unwrap_or_default(),
            })
            .collect();

        Ok(GatewayTransaction {
            safe_address: self.safe_address,
            safe_tx,
            signatures,
            asserted_hash: info.safe_tx_hash,
        })
    }
}
