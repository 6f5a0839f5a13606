//! Review warnings for a Safe transaction

use alloy::primitives::Address;

use crate::calldata::owner_management_method;
use crate::domain::{MetaTransaction, Operation, SafeTransaction, Warning};

/// Generate warnings for a transaction and, if present, its decoded batch.
pub fn check_warnings(tx: &SafeTransaction, batch: Option<&[MetaTransaction]>) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if tx.operation == Operation::DelegateCall {
        warnings.push(Warning::DelegateCall);
    }

    if tx.gas_token != Address::ZERO {
        warnings.push(Warning::NonZeroGasToken);
    }

    if tx.refund_receiver != Address::ZERO {
        warnings.push(Warning::NonZeroRefundReceiver);
    }

    if let Some(method) = owner_management_method(&tx.data) {
        warnings.push(Warning::DangerousMethod(method.to_string()));
    }

    for (index, call) in batch.unwrap_or_default().iter().enumerate() {
        if call.operation == Operation::DelegateCall {
            warnings.push(Warning::DelegateCallInBatch(index));
        }
        if let Some(method) = owner_management_method(&call.data) {
            warnings.push(Warning::DangerousMethod(method.to_string()));
        }
    }

    warnings
}
