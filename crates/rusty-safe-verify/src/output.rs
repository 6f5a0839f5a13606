use std::fmt::{self, Write};

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use rusty_safe_verify_core::{
    domain_separator, safe_tx_struct_hash, DecodedCall, VerifyResult, Warning,
};

fn mark(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "MISMATCH"
    }
}

fn amount(value: U256, decimals: u8, symbol: &str) -> String {
    match format_units(value, decimals) {
        Ok(units) => format!("{units} {symbol}"),
        Err(_) => format!("{value} wei"),
    }
}

fn describe(warning: &Warning) -> String {
    match warning {
        Warning::DelegateCall => "transaction uses DelegateCall".to_owned(),
        Warning::DelegateCallInBatch(i) => format!("batched call #{i} uses DelegateCall"),
        Warning::NonZeroGasToken => "gas token is set, gas is refunded in a token".to_owned(),
        Warning::NonZeroRefundReceiver => "refund receiver is set".to_owned(),
        Warning::DangerousMethod(name) => format!("calls owner management method {name}"),
    }
}

fn write_call(out: &mut impl Write, indent: &str, call: &DecodedCall) -> fmt::Result {
    writeln!(out, "{indent}{}", call.signature)?;
    for arg in &call.args {
        writeln!(out, "{indent}  {} ({}): {}", arg.name, arg.ty, arg.value)?;
    }
    Ok(())
}

/// Human readable report of a verification.
pub fn write_report(out: &mut impl Write, result: &VerifyResult) -> fmt::Result {
    let tx = &result.safe_tx;
    let currency = &result.chain.native_currency;

    writeln!(out, "Chain:      {} ({})", result.chain.name, result.chain_id)?;
    writeln!(out, "Safe:       {}", result.safe_address)?;
    writeln!(out, "Version:    {}", result.version)?;
    writeln!(out)?;
    writeln!(out, "Transaction:")?;
    writeln!(out, "  To:              {}", tx.to)?;
    writeln!(
        out,
        "  Value:           {}",
        amount(tx.value, currency.decimals, &currency.symbol)
    )?;
    writeln!(out, "  Data:            {}", tx.data)?;
    writeln!(out, "  Operation:       {:?}", tx.operation)?;
    writeln!(out, "  SafeTxGas:       {}", tx.safe_tx_gas)?;
    writeln!(out, "  BaseGas:         {}", tx.base_gas)?;
    writeln!(out, "  GasPrice:        {}", tx.gas_price)?;
    writeln!(out, "  GasToken:        {}", tx.gas_token)?;
    writeln!(out, "  RefundReceiver:  {}", tx.refund_receiver)?;
    writeln!(out, "  Nonce:           {}", tx.nonce)?;

    if let Some(call) = &result.decoded {
        writeln!(out)?;
        writeln!(out, "Decoded call:")?;
        write_call(out, "  ", call)?;
    }

    if let Some(batch) = &result.batch {
        writeln!(out)?;
        writeln!(out, "MultiSend batch ({} calls):", batch.len())?;
        for (i, call) in batch.iter().enumerate() {
            writeln!(
                out,
                "  #{i} {:?} {} value={} data={}",
                call.operation, call.to, call.value, call.data
            )?;
            if let Some(Some(decoded)) = result.decoded_batch.get(i) {
                write_call(out, "     ", decoded)?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Hashes:")?;
    writeln!(
        out,
        "  Domain:   {}",
        domain_separator(result.chain_id, result.safe_address, &result.version)
    )?;
    writeln!(out, "  Message:  {}", safe_tx_struct_hash(tx))?;
    writeln!(
        out,
        "  SafeTx:   {} [{}]",
        result.hash.value,
        mark(result.hash.verified)
    )?;

    writeln!(out)?;
    writeln!(out, "Signatures ({}):", result.signatures.len())?;
    for sig in &result.signatures {
        writeln!(out, "  {} [{}]", sig.signer, mark(sig.verified))?;
    }

    if !result.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings:")?;
        for warning in &result.warnings {
            writeln!(out, "  - {}", describe(warning))?;
        }
    }
    Ok(())
}
