//! MultiSend packed batch encoding
//!
//! Each entry is packed with no padding:
//! - operation: 1 byte (0 = Call, 1 = DelegateCall)
//! - to: 20 bytes
//! - value: 32 bytes, big-endian
//! - data length: 32 bytes, big-endian
//! - data: `length` bytes

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::calldata::IMultiSend;
use crate::domain::{MetaTransaction, Operation};
use crate::error::{Result, VerifyError};

/// `multiSend(bytes)`
pub const MULTISEND_SELECTOR: [u8; 4] = IMultiSend::multiSendCall::SELECTOR;

const HEADER_LEN: usize = 1 + 20 + 32 + 32;

/// Decode a packed MultiSend payload into its sub-calls, in execution order.
pub fn decode_batch(packed: &[u8]) -> Result<Vec<MetaTransaction>> {
    let mut transactions = Vec::new();
    let mut offset = 0;

    while offset < packed.len() {
        let index = transactions.len();
        let header = packed.get(offset..offset + HEADER_LEN).ok_or_else(|| {
            VerifyError::decode(format!(
                "batch entry {index}: header needs {HEADER_LEN} bytes, {} left",
                packed.len() - offset
            ))
        })?;

        let operation = Operation::from_u8(header[0]).ok_or_else(|| {
            VerifyError::decode(format!(
                "batch entry {index}: invalid operation {}",
                header[0]
            ))
        })?;
        let to = Address::from_slice(&header[1..21]);
        let value = U256::from_be_slice(&header[21..53]);
        let data_length = U256::from_be_slice(&header[53..85]);
        offset += HEADER_LEN;

        let end = usize::try_from(data_length)
            .ok()
            .and_then(|len| offset.checked_add(len))
            .filter(|end| *end <= packed.len())
            .ok_or_else(|| {
                VerifyError::decode(format!(
                    "batch entry {index}: data length {data_length} exceeds remaining {} bytes",
                    packed.len() - offset
                ))
            })?;

        transactions.push(MetaTransaction {
            to,
            value,
            data: Bytes::copy_from_slice(&packed[offset..end]),
            operation,
        });
        offset = end;
    }

    Ok(transactions)
}

/// Pack sub-calls into the MultiSend payload format.
pub fn encode_batch(calls: &[MetaTransaction]) -> Bytes {
    let capacity = calls.iter().map(|c| HEADER_LEN + c.data.len()).sum();
    let mut encoded = Vec::with_capacity(capacity);

    for call in calls {
        encoded.push(call.operation.as_u8());
        encoded.extend_from_slice(call.to.as_slice());
        encoded.extend_from_slice(&call.value.to_be_bytes::<32>());
        encoded.extend_from_slice(&U256::from(call.data.len()).to_be_bytes::<32>());
        encoded.extend_from_slice(&call.data);
    }

    Bytes::from(encoded)
}

/// Whether calldata starts with the `multiSend(bytes)` selector.
pub fn is_multisend_call(calldata: &[u8]) -> bool {
    calldata.get(..4) == Some(&MULTISEND_SELECTOR[..])
}

/// Unwrap `multiSend(bytes)` calldata and decode the packed batch inside it.
pub fn decode_multisend_call(calldata: &[u8]) -> Result<Vec<MetaTransaction>> {
    let call = IMultiSend::multiSendCall::abi_decode(calldata, true)
        .map_err(|e| VerifyError::decode(format!("multiSend calldata: {e}")))?;
    decode_batch(&call.transactions)
}
