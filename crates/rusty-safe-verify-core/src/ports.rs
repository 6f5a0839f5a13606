use std::sync::Arc;

use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ChainInfo;
use crate::gateway::GatewayTxDetails;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("validation error: {0}")]
    Validation(String),
}

/// Chain metadata lookups.
#[async_trait]
pub trait ChainRegistry: Send + Sync {
    async fn chain_by_short_name(&self, short_name: &str) -> Result<Option<ChainInfo>, PortError>;
    async fn chain_by_explorer_host(&self, host: &str) -> Result<Option<ChainInfo>, PortError>;
    async fn chain_by_id(&self, chain_id: u64) -> Result<Option<ChainInfo>, PortError>;
}

/// Safe client gateway.
#[async_trait]
pub trait SafeGateway: Send + Sync {
    async fn transaction_details(
        &self,
        chain_id: u64,
        tx_id: &str,
    ) -> Result<GatewayTxDetails, PortError>;
}

/// The fields of an on-chain transaction the resolver needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnChainTransaction {
    pub hash: B256,
    pub to: Option<Address>,
    pub input: Bytes,
    /// `None` while the transaction is pending.
    pub block_number: Option<u64>,
}

/// Read access to one chain. `block: None` reads the latest state.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn transaction_by_hash(&self, hash: B256)
        -> Result<Option<OnChainTransaction>, PortError>;
    async fn call(&self, to: Address, input: Bytes, block: Option<u64>) -> Result<Bytes, PortError>;
}

/// Hands out a reader per chain. Implementations may cache readers by chain id.
#[async_trait]
pub trait ChainReaderProvider: Send + Sync {
    async fn reader(&self, chain: &ChainInfo) -> Result<Arc<dyn ChainReader>, PortError>;
}

#[async_trait]
impl<T: ChainRegistry + ?Sized> ChainRegistry for Arc<T> {
    async fn chain_by_short_name(&self, short_name: &str) -> Result<Option<ChainInfo>, PortError> {
        (**self).chain_by_short_name(short_name).await
    }

    async fn chain_by_explorer_host(&self, host: &str) -> Result<Option<ChainInfo>, PortError> {
        (**self).chain_by_explorer_host(host).await
    }

    async fn chain_by_id(&self, chain_id: u64) -> Result<Option<ChainInfo>, PortError> {
        (**self).chain_by_id(chain_id).await
    }
}

#[async_trait]
impl<T: SafeGateway + ?Sized> SafeGateway for Arc<T> {
    async fn transaction_details(
        &self,
        chain_id: u64,
        tx_id: &str,
    ) -> Result<GatewayTxDetails, PortError> {
        (**self).transaction_details(chain_id, tx_id).await
    }
}

#[async_trait]
impl<T: ChainReaderProvider + ?Sized> ChainReaderProvider for Arc<T> {
    async fn reader(&self, chain: &ChainInfo) -> Result<Arc<dyn ChainReader>, PortError> {
        (**self).reader(chain).await
    }
}
