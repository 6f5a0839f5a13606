#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;

use rusty_safe_verify_core::calldata::ISafe;
use rusty_safe_verify_core::{
    ChainInfo, ChainReader, ChainReaderProvider, ChainRegistry, GatewayTxDetails, NativeCurrency,
    OnChainTransaction, PortError, SafeGateway, Verifier,
};

pub const SAFE_VERSION: &str = "1.3.0";

pub fn safe_address() -> Address {
    "0x6d2f0fb8c2a86ffb0b3d4e5b0bcd9e0a8c1d2e3f"
        .parse()
        .expect("valid safe address")
}

pub fn alice() -> PrivateKeySigner {
    "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
        .parse()
        .expect("alice key")
}

pub fn bob() -> PrivateKeySigner {
    "0x0123456789012345678901234567890123456789012345678901234567890123"
        .parse()
        .expect("bob key")
}

pub fn sign(signer: &PrivateKeySigner, hash: B256) -> Bytes {
    let signature = signer.sign_hash_sync(&hash).expect("sign hash");
    Bytes::copy_from_slice(&signature.as_bytes())
}

pub fn mainnet() -> ChainInfo {
    ChainInfo {
        chain_id: 1,
        name: "Ethereum Mainnet".to_owned(),
        short_name: "eth".to_owned(),
        native_currency: NativeCurrency {
            name: "Ether".to_owned(),
            symbol: "ETH".to_owned(),
            decimals: 18,
        },
        rpc_urls: vec!["https://rpc.example".to_owned()],
        explorers: vec!["https://etherscan.io".to_owned()],
    }
}

#[derive(Debug, Default)]
pub struct FakeRegistry {
    pub chains: Vec<ChainInfo>,
}

#[async_trait]
impl ChainRegistry for FakeRegistry {
    async fn chain_by_short_name(&self, short_name: &str) -> Result<Option<ChainInfo>, PortError> {
        Ok(self
            .chains
            .iter()
            .find(|c| c.short_name == short_name)
            .cloned())
    }

    async fn chain_by_explorer_host(&self, host: &str) -> Result<Option<ChainInfo>, PortError> {
        Ok(self
            .chains
            .iter()
            .find(|c| {
                c.explorers.iter().any(|e| {
                    url::Url::parse(e)
                        .ok()
                        .and_then(|u| u.host_str().map(|h| h == host))
                        .unwrap_or(false)
                })
            })
            .cloned())
    }

    async fn chain_by_id(&self, chain_id: u64) -> Result<Option<ChainInfo>, PortError> {
        Ok(self.chains.iter().find(|c| c.chain_id == chain_id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct FakeGateway {
    pub transactions: HashMap<String, GatewayTxDetails>,
    pub requests: Mutex<Vec<(u64, String)>>,
}

#[async_trait]
impl SafeGateway for FakeGateway {
    async fn transaction_details(
        &self,
        chain_id: u64,
        tx_id: &str,
    ) -> Result<GatewayTxDetails, PortError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push((chain_id, tx_id.to_owned()));
        self.transactions
            .get(tx_id)
            .cloned()
            .ok_or_else(|| PortError::Status {
                status: 404,
                url: format!("/v1/chains/{chain_id}/transactions/{tx_id}"),
            })
    }
}

/// Answers `VERSION()` and `nonce()` for any address and records the block
/// each call was made at.
#[derive(Debug, Default)]
pub struct FakeReader {
    pub transactions: HashMap<B256, OnChainTransaction>,
    pub version: String,
    pub nonce: U256,
    pub calls: Mutex<Vec<(&'static str, Option<u64>)>>,
}

#[async_trait]
impl ChainReader for FakeReader {
    async fn transaction_by_hash(
        &self,
        hash: B256,
    ) -> Result<Option<OnChainTransaction>, PortError> {
        Ok(self.transactions.get(&hash).cloned())
    }

    async fn call(&self, _to: Address, input: Bytes, block: Option<u64>) -> Result<Bytes, PortError> {
        let selector: [u8; 4] = input
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| PortError::Validation("short calldata".to_owned()))?;

        let (name, output) = match selector {
            ISafe::VERSIONCall::SELECTOR => {
                ("VERSION", (self.version.clone(),).abi_encode_params())
            }
            ISafe::nonceCall::SELECTOR => ("nonce", self.nonce.abi_encode()),
            _ => return Err(PortError::Transport("execution reverted".to_owned())),
        };
        self.calls.lock().expect("calls lock").push((name, block));
        Ok(Bytes::from(output))
    }
}

pub struct FakeReaders {
    pub reader: Arc<FakeReader>,
}

#[async_trait]
impl ChainReaderProvider for FakeReaders {
    async fn reader(&self, _chain: &ChainInfo) -> Result<Arc<dyn ChainReader>, PortError> {
        Ok(Arc::clone(&self.reader) as Arc<dyn ChainReader>)
    }
}

pub type TestVerifier = Verifier<Arc<FakeRegistry>, Arc<FakeGateway>, FakeReaders>;

pub fn new_verifier(gateway: FakeGateway, reader: FakeReader) -> (TestVerifier, Arc<FakeReader>) {
    let reader = Arc::new(reader);
    let registry = Arc::new(FakeRegistry {
        chains: vec![mainnet()],
    });
    let verifier = Verifier::new(
        registry,
        Arc::new(gateway),
        FakeReaders {
            reader: Arc::clone(&reader),
        },
    );
    (verifier, reader)
}
