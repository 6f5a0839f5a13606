//! Call data decoding against a built-in set of well-known ABIs.
//!
//! Decoding is informational. Nothing here fails a verification: an unknown
//! selector or arguments that do not decode give `None`.

use std::sync::LazyLock;

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::Function;
use alloy::primitives::hex;
use alloy::sol;
use tracing::debug;

use crate::calldata::{IMultiSend, ISafe};
use crate::domain::{DecodedArg, DecodedCall};

sol! {
    #[sol(abi)]
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);

        function approve(address spender, uint256 amount) external returns (bool);

        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }

    #[sol(abi)]
    interface IERC1155 {
        function safeTransferFrom(
            address from,
            address to,
            uint256 id,
            uint256 amount,
            bytes calldata data
        ) external;

        function safeBatchTransferFrom(
            address from,
            address to,
            uint256[] calldata ids,
            uint256[] calldata amounts,
            bytes calldata data
        ) external;

        function setApprovalForAll(address operator, bool approved) external;
    }

    #[sol(abi)]
    interface ISafeProxyFactory {
        function createProxyWithNonce(
            address singleton,
            bytes memory initializer,
            uint256 saltNonce
        ) external returns (address proxy);
    }
}

static KNOWN_FUNCTIONS: LazyLock<Vec<Function>> = LazyLock::new(|| {
    [
        ISafe::abi::functions(),
        IMultiSend::abi::functions(),
        IERC20::abi::functions(),
        IERC1155::abi::functions(),
        ISafeProxyFactory::abi::functions(),
    ]
    .into_iter()
    .flat_map(|functions| functions.into_values().flatten())
    .collect()
});

/// Match `data` against the built-in ABIs by selector and decode its
/// arguments strictly.
pub fn decode_known_call(data: &[u8]) -> Option<DecodedCall> {
    let selector = data.get(..4)?;
    let function = KNOWN_FUNCTIONS
        .iter()
        .find(|f| f.selector().as_slice() == selector)?;

    let values = function
        .abi_decode_input(&data[4..], true)
        .inspect_err(|e| debug!(function = %function.name, error = %e, "arguments do not decode"))
        .ok()?;

    Some(DecodedCall {
        name: function.name.clone(),
        signature: function.signature(),
        args: function
            .inputs
            .iter()
            .zip(&values)
            .map(|(param, value)| DecodedArg {
                name: param.name.clone(),
                ty: param.ty.clone(),
                value: format_value(value),
            })
            .collect(),
    })
}

fn join(values: &[DynSolValue]) -> String {
    values.iter().map(format_value).collect::<Vec<_>>().join(", ")
}

fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(a) => a.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Bytes(b) => hex::encode_prefixed(b),
        // bytesN is right padded inside the word
        DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => format!("[{}]", join(items)),
        DynSolValue::Tuple(items) => format!("({})", join(items)),
        other => format!("{other:?}"),
    }
}
