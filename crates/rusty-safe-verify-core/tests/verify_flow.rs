mod common;

use std::collections::HashMap;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use serde_json::json;
use tracing_test::traced_test;

use common::{alice, bob, new_verifier, safe_address, sign, FakeGateway, FakeReader, SAFE_VERSION};
use rusty_safe_verify_core::calldata::ISafe;
use rusty_safe_verify_core::{
    hash_safe_transaction, GatewayTxDetails, OnChainTransaction, Operation, SafeTransaction,
    VerifyError,
};

const TX_ID: &str = "multisig_0x6d2f0fb8c2a86ffb0b3d4e5b0bcd9e0a8c1d2e3f_0xfeed";
const EXEC_HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

fn share_link() -> String {
    format!(
        "https://app.safe.global/transactions/tx?safe=eth:{}&id={TX_ID}",
        safe_address()
    )
}

fn explorer_link() -> String {
    format!("https://etherscan.io/tx/{EXEC_HASH}")
}

fn transfer(nonce: u64) -> SafeTransaction {
    SafeTransaction::new(
        "0x8cf60b289f8d31f737049b590b5e4285ff0bd1d1"
            .parse()
            .expect("recipient"),
        U256::from(1_000_000_000_000_000u64),
        Bytes::new(),
        Operation::Call,
    )
    .with_nonce(U256::from(nonce))
}

fn gateway_payload(tx: &SafeTransaction, hash: B256, confirmations: serde_json::Value) -> GatewayTxDetails {
    serde_json::from_value(json!({
        "safeAddress": safe_address(),
        "txId": TX_ID,
        "txStatus": "AWAITING_EXECUTION",
        "txData": {
            "to": { "value": tx.to },
            "value": tx.value.to_string(),
            "hexData": null,
            "operation": 0
        },
        "detailedExecutionInfo": {
            "type": "MULTISIG",
            "safeTxGas": "0",
            "baseGas": "0",
            "gasPrice": "0",
            "gasToken": Address::ZERO,
            "refundReceiver": { "value": Address::ZERO },
            "nonce": tx.nonce.to_string(),
            "safeTxHash": hash,
            "confirmations": confirmations
        }
    }))
    .expect("gateway payload")
}

fn reader(transactions: HashMap<B256, OnChainTransaction>, nonce: u64) -> FakeReader {
    FakeReader {
        transactions,
        version: SAFE_VERSION.to_owned(),
        nonce: U256::from(nonce),
        ..FakeReader::default()
    }
}

#[tokio::test]
async fn share_link_verifies_gateway_confirmations() {
    let tx = transfer(12);
    let hash = hash_safe_transaction(1, safe_address(), &tx, SAFE_VERSION);
    let (alice, bob) = (alice(), bob());

    let payload = gateway_payload(
        &tx,
        hash,
        json!([
            { "signer": { "value": alice.address() }, "signature": sign(&alice, hash) },
            { "signer": { "value": bob.address() }, "signature": sign(&bob, hash) }
        ]),
    );
    let gateway = FakeGateway {
        transactions: HashMap::from([(TX_ID.to_owned(), payload)]),
        ..FakeGateway::default()
    };
    let (verifier, reader) = new_verifier(gateway, reader(HashMap::new(), 0));

    let result = verifier.verify(&share_link()).await.expect("verify share link");

    assert_eq!(result.chain_id, 1);
    assert_eq!(result.chain.short_name, "eth");
    assert_eq!(result.safe_address, safe_address());
    assert_eq!(result.version, SAFE_VERSION);
    assert_eq!(result.safe_tx, tx);
    assert_eq!(result.hash.value, hash);
    assert!(result.hash.verified);
    assert_eq!(result.signatures.len(), 2);
    assert_eq!(result.signatures[0].signer, alice.address());
    assert_eq!(result.signatures[1].signer, bob.address());
    assert!(result.all_verified());

    let requests = verifier.resolver.gateway.requests.lock().expect("requests");
    assert_eq!(requests.as_slice(), &[(1, TX_ID.to_owned())]);
    // version is read at the latest block
    assert_eq!(
        reader.calls.lock().expect("calls").as_slice(),
        &[("VERSION", None)]
    );
}

#[tokio::test]
async fn share_link_with_tampered_payload_is_flagged() {
    let signed = transfer(12);
    let hash = hash_safe_transaction(1, safe_address(), &signed, SAFE_VERSION);
    let alice = alice();

    // gateway serves a different recipient value under the signed hash
    let mut served = signed.clone();
    served.value = U256::from(2_000_000_000_000_000u64);
    let payload = gateway_payload(
        &served,
        hash,
        json!([{ "signer": { "value": alice.address() }, "signature": sign(&alice, hash) }]),
    );
    let gateway = FakeGateway {
        transactions: HashMap::from([(TX_ID.to_owned(), payload)]),
        ..FakeGateway::default()
    };
    let (verifier, _) = new_verifier(gateway, reader(HashMap::new(), 0));

    match verifier.verify(&share_link()).await {
        Ok(result) => {
            assert!(!result.hash.verified);
            assert!(!result.signatures[0].verified);
        }
        Err(err) => assert!(matches!(err, VerifyError::InvalidSignature(_))),
    }
}

#[tokio::test]
#[traced_test]
async fn explorer_link_reads_state_before_execution() {
    let tx = transfer(7);
    let hash = hash_safe_transaction(1, safe_address(), &tx, SAFE_VERSION);
    let (alice, bob) = (alice(), bob());

    let mut packed = sign(&alice, hash).to_vec();
    packed.extend_from_slice(&sign(&bob, hash));
    let input = ISafe::execTransactionCall {
        to: tx.to,
        value: tx.value,
        data: tx.data.clone(),
        operation: 0,
        safeTxGas: U256::ZERO,
        baseGas: U256::ZERO,
        gasPrice: U256::ZERO,
        gasToken: Address::ZERO,
        refundReceiver: Address::ZERO,
        signatures: Bytes::from(packed),
    }
    .abi_encode();

    let exec_hash: B256 = EXEC_HASH.parse().expect("exec hash");
    let onchain = OnChainTransaction {
        hash: exec_hash,
        to: Some(safe_address()),
        input: Bytes::from(input),
        block_number: Some(100),
    };
    let (verifier, reader) = new_verifier(
        FakeGateway::default(),
        reader(HashMap::from([(exec_hash, onchain)]), 7),
    );

    let result = verifier
        .verify(&explorer_link())
        .await
        .expect("verify explorer link");

    assert_eq!(result.safe_tx, tx);
    assert_eq!(result.hash.value, hash);
    assert!(result.hash.verified, "no asserted hash means verified");
    assert_eq!(
        result
            .signatures
            .iter()
            .map(|s| s.signer)
            .collect::<Vec<_>>(),
        vec![alice.address(), bob.address()]
    );
    assert!(result.all_verified());
    assert_eq!(
        reader.calls.lock().expect("calls").as_slice(),
        &[("nonce", Some(99)), ("VERSION", Some(99))]
    );
    assert!(logs_contain("share link attempt failed"));
}

#[tokio::test]
async fn pending_explorer_transaction_is_unparseable() {
    let exec_hash: B256 = EXEC_HASH.parse().expect("exec hash");
    let input = ISafe::execTransactionCall {
        to: Address::ZERO,
        value: U256::ZERO,
        data: Bytes::new(),
        operation: 0,
        safeTxGas: U256::ZERO,
        baseGas: U256::ZERO,
        gasPrice: U256::ZERO,
        gasToken: Address::ZERO,
        refundReceiver: Address::ZERO,
        signatures: Bytes::new(),
    }
    .abi_encode();
    let onchain = OnChainTransaction {
        hash: exec_hash,
        to: Some(safe_address()),
        input: Bytes::from(input),
        block_number: None,
    };
    let (verifier, _) = new_verifier(
        FakeGateway::default(),
        reader(HashMap::from([(exec_hash, onchain)]), 0),
    );

    let err = verifier
        .resolver
        .resolve_explorer_link(&explorer_link())
        .await
        .expect_err("pending transaction");
    assert!(matches!(err, VerifyError::DecodeError(_)));
}

#[tokio::test]
async fn unresolvable_references_collapse_into_one_error() {
    let (verifier, _) = new_verifier(FakeGateway::default(), reader(HashMap::new(), 0));
    let expected = VerifyError::MalformedReference("cannot parse transaction reference".to_owned());

    for reference in [
        "not a url".to_owned(),
        // unknown chain prefix
        share_link().replace("safe=eth:", "safe=zzz:"),
        // gateway has no such transaction
        share_link(),
        // explorer host with no registered chain
        "https://example.org/tx/0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060"
            .to_owned(),
        // known explorer, unknown transaction
        explorer_link(),
    ] {
        let err = verifier.verify(&reference).await.expect_err(&reference);
        assert_eq!(err, expected, "{reference}");
    }
}

#[tokio::test]
async fn non_safe_transaction_is_rejected() {
    let exec_hash: B256 = EXEC_HASH.parse().expect("exec hash");
    let onchain = OnChainTransaction {
        hash: exec_hash,
        to: Some(safe_address()),
        // ERC-20 transfer(address,uint256)
        input: Bytes::from(vec![0xa9, 0x05, 0x9c, 0xbb, 0x00]),
        block_number: Some(100),
    };
    let (verifier, _) = new_verifier(
        FakeGateway::default(),
        reader(HashMap::from([(exec_hash, onchain)]), 0),
    );

    let err = verifier
        .resolver
        .resolve_explorer_link(&explorer_link())
        .await
        .expect_err("not execTransaction");
    assert!(matches!(err, VerifyError::DecodeError(_)));
}
