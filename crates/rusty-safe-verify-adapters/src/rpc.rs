use std::collections::HashMap;
use std::future::IntoFuture;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use alloy::consensus::Transaction as _;
use alloy::eips::BlockId;
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use rusty_safe_verify_core::{
    ChainInfo, ChainReader, ChainReaderProvider, OnChainTransaction, PortError,
};

use crate::config::VerifyAdapterConfig;

/// `ChainReader` over any alloy provider.
pub struct RpcChainReader<P> {
    provider: P,
    timeout: Duration,
}

impl<P> RpcChainReader<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    async fn bounded<T, E: std::fmt::Display>(
        &self,
        method: &str,
        call: impl IntoFuture<Output = Result<T, E>>,
    ) -> Result<T, PortError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(|e| PortError::Transport(format!("{method}: {e}"))),
            Err(_) => Err(PortError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

#[async_trait]
impl<P: Provider + Send + Sync + 'static> ChainReader for RpcChainReader<P> {
    async fn transaction_by_hash(
        &self,
        hash: B256,
    ) -> Result<Option<OnChainTransaction>, PortError> {
        debug!(%hash, "eth_getTransactionByHash");
        let tx = self
            .bounded(
                "eth_getTransactionByHash",
                self.provider.get_transaction_by_hash(hash),
            )
            .await?;
        Ok(tx.map(|tx| OnChainTransaction {
            hash,
            to: tx.to(),
            input: tx.input().clone(),
            block_number: tx.block_number,
        }))
    }

    async fn call(&self, to: Address, input: Bytes, block: Option<u64>) -> Result<Bytes, PortError> {
        let block = block.map_or_else(BlockId::latest, BlockId::number);
        debug!(%to, ?block, "eth_call");
        let request = TransactionRequest::default().to(to).input(input.into());
        self.bounded("eth_call", self.provider.call(&request).block(block))
            .await
    }
}

/// Hands out one reader per chain id, created on first use.
///
/// Concurrent first requests for the same chain may each build a reader; the
/// first one stored is kept.
pub struct CachedChainReaderProvider {
    cfg: VerifyAdapterConfig,
    readers: RwLock<HashMap<u64, Arc<dyn ChainReader>>>,
}

impl CachedChainReaderProvider {
    pub fn new(cfg: VerifyAdapterConfig) -> Self {
        Self {
            cfg,
            readers: RwLock::new(HashMap::new()),
        }
    }

    /// Override first, then the chain's first usable public endpoint.
    pub fn rpc_url(&self, chain: &ChainInfo) -> Result<Url, PortError> {
        let raw = self
            .cfg
            .rpc_overrides
            .get(&chain.chain_id)
            .or_else(|| chain.rpc_urls.first())
            .ok_or_else(|| {
                PortError::Validation(format!("no RPC endpoint for chain {}", chain.chain_id))
            })?;
        Url::parse(raw).map_err(|e| PortError::Validation(format!("rpc url {raw}: {e}")))
    }

    fn cached(&self, chain_id: u64) -> Result<Option<Arc<dyn ChainReader>>, PortError> {
        let g = self
            .readers
            .read()
            .map_err(|e| PortError::Transport(format!("reader cache lock poisoned: {e}")))?;
        Ok(g.get(&chain_id).cloned())
    }
}

#[async_trait]
impl ChainReaderProvider for CachedChainReaderProvider {
    async fn reader(&self, chain: &ChainInfo) -> Result<Arc<dyn ChainReader>, PortError> {
        if let Some(reader) = self.cached(chain.chain_id)? {
            return Ok(reader);
        }

        let url = self.rpc_url(chain)?;
        debug!(chain_id = chain.chain_id, %url, "creating RPC client");
        let provider = ProviderBuilder::new().on_http(url);
        let created: Arc<dyn ChainReader> =
            Arc::new(RpcChainReader::new(provider, self.cfg.timeout()));

        let mut g = self
            .readers
            .write()
            .map_err(|e| PortError::Transport(format!("reader cache lock poisoned: {e}")))?;
        Ok(Arc::clone(g.entry(chain.chain_id).or_insert(created)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusty_safe_verify_core::NativeCurrency;

    fn chain(rpc_urls: Vec<&str>) -> ChainInfo {
        ChainInfo {
            chain_id: 100,
            name: "Gnosis".to_owned(),
            short_name: "gno".to_owned(),
            native_currency: NativeCurrency {
                name: "xDAI".to_owned(),
                symbol: "XDAI".to_owned(),
                decimals: 18,
            },
            rpc_urls: rpc_urls.into_iter().map(str::to_owned).collect(),
            explorers: vec![],
        }
    }

    #[test]
    fn test_rpc_url_override_wins() {
        let mut cfg = VerifyAdapterConfig::default();
        let provider = CachedChainReaderProvider::new(cfg.clone());
        assert_eq!(
            provider
                .rpc_url(&chain(vec!["https://rpc.gnosischain.com"]))
                .unwrap()
                .as_str(),
            "https://rpc.gnosischain.com/"
        );
        assert!(provider.rpc_url(&chain(vec![])).is_err());

        cfg.rpc_overrides
            .insert(100, "http://127.0.0.1:8545".to_owned());
        let provider = CachedChainReaderProvider::new(cfg);
        assert_eq!(
            provider
                .rpc_url(&chain(vec!["https://rpc.gnosischain.com"]))
                .unwrap()
                .as_str(),
            "http://127.0.0.1:8545/"
        );
    }

    #[tokio::test]
    async fn test_reader_is_cached_per_chain() {
        let provider = CachedChainReaderProvider::new(VerifyAdapterConfig::default());
        let gnosis = chain(vec!["http://127.0.0.1:1"]);

        let a = provider.reader(&gnosis).await.unwrap();
        let b = provider.reader(&gnosis).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
