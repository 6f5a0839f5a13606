//! Recognized Safe call shapes.

use alloy::primitives::{hex, Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::domain::{MetaTransaction, Operation, SafeTransaction, SignatureRecord};
use crate::error::{Result, VerifyError};
use crate::multisend;

/// Length of one `r || s || v` signature inside `execTransaction` signatures.
pub const SIGNATURE_LEN: usize = 65;

sol! {
    #[sol(abi)]
    interface ISafe {
        function execTransaction(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address refundReceiver,
            bytes memory signatures
        ) external payable returns (bool success);

        function nonce() external view returns (uint256 nonce);

        function VERSION() external view returns (string memory version);

        function addOwnerWithThreshold(address owner, uint256 threshold) external;

        function removeOwner(address prevOwner, address owner, uint256 threshold) external;

        function swapOwner(address prevOwner, address oldOwner, address newOwner) external;

        function changeThreshold(uint256 threshold) external;

        function enableModule(address module) external;

        function disableModule(address prevModule, address module) external;

        function setGuard(address guard) external;

        function setFallbackHandler(address handler) external;
    }

    #[sol(abi)]
    interface IMultiSend {
        function multiSend(bytes memory transactions) external payable;
    }
}

/// Arguments of an `execTransaction` call. The nonce is not part of the
/// calldata and has to be read from the Safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecTransaction {
    pub call: MetaTransaction,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub signatures: Bytes,
}

impl ExecTransaction {
    pub fn safe_tx(&self, nonce: U256) -> SafeTransaction {
        SafeTransaction {
            to: self.call.to,
            value: self.call.value,
            data: self.call.data.clone(),
            operation: self.call.operation,
            safe_tx_gas: self.safe_tx_gas,
            base_gas: self.base_gas,
            gas_price: self.gas_price,
            gas_token: self.gas_token,
            refund_receiver: self.refund_receiver,
            nonce,
        }
    }

    /// Packed signatures split into unclaimed records.
    pub fn signature_records(&self) -> Vec<SignatureRecord> {
        split_signatures(&self.signatures)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafeCall {
    ExecTransaction(ExecTransaction),
    MultiSend(Vec<MetaTransaction>),
}

/// Classify calldata against the call shapes this crate understands.
pub fn decode_safe_call(input: &[u8]) -> Result<SafeCall> {
    let selector: [u8; 4] = input
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| VerifyError::decode("calldata shorter than a selector"))?;

    match selector {
        ISafe::execTransactionCall::SELECTOR => {
            let call = ISafe::execTransactionCall::abi_decode(input, true)
                .map_err(|e| VerifyError::decode(format!("execTransaction calldata: {e}")))?;
            let operation = Operation::from_u8(call.operation).ok_or_else(|| {
                VerifyError::decode(format!("invalid operation {}", call.operation))
            })?;
            Ok(SafeCall::ExecTransaction(ExecTransaction {
                call: MetaTransaction {
                    to: call.to,
                    value: call.value,
                    data: call.data,
                    operation,
                },
                safe_tx_gas: call.safeTxGas,
                base_gas: call.baseGas,
                gas_price: call.gasPrice,
                gas_token: call.gasToken,
                refund_receiver: call.refundReceiver,
                signatures: call.signatures,
            }))
        }
        multisend::MULTISEND_SELECTOR => {
            multisend::decode_multisend_call(input).map(SafeCall::MultiSend)
        }
        other => Err(VerifyError::decode(format!(
            "unrecognized call selector 0x{}",
            hex::encode(other)
        ))),
    }
}

/// Decode `execTransaction` calldata, rejecting any other call shape.
pub fn decode_exec_transaction(input: &[u8]) -> Result<ExecTransaction> {
    match decode_safe_call(input)? {
        SafeCall::ExecTransaction(exec) => Ok(exec),
        SafeCall::MultiSend(_) => Err(VerifyError::decode(
            "expected execTransaction, found multiSend",
        )),
    }
}

/// Split concatenated signatures into 65-byte records with no claimed signer.
///
/// A trailing chunk shorter than 65 bytes is kept as is; recovery rejects it.
pub fn split_signatures(packed: &[u8]) -> Vec<SignatureRecord> {
    packed
        .chunks(SIGNATURE_LEN)
        .map(|chunk| SignatureRecord {
            signer: None,
            signature: Bytes::copy_from_slice(chunk),
        })
        .collect()
}

/// Name of the owner-management method `data` calls, if any.
pub fn owner_management_method(data: &[u8]) -> Option<&'static str> {
    let selector: [u8; 4] = data.get(..4)?.try_into().ok()?;
    match selector {
        ISafe::addOwnerWithThresholdCall::SELECTOR => Some("addOwnerWithThreshold"),
        ISafe::removeOwnerCall::SELECTOR => Some("removeOwner"),
        ISafe::swapOwnerCall::SELECTOR => Some("swapOwner"),
        ISafe::changeThresholdCall::SELECTOR => Some("changeThreshold"),
        _ => None,
    }
}
