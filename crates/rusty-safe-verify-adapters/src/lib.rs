pub mod chain_registry;
pub mod config;
mod http;
pub mod rpc;
pub mod safe_service;

pub use chain_registry::ChainListRegistry;
pub use config::VerifyAdapterConfig;
pub use rpc::{CachedChainReaderProvider, RpcChainReader};
pub use safe_service::SafeGatewayAdapter;

use rusty_safe_verify_core::{PortError, Verifier};

pub type NetworkVerifier =
    Verifier<ChainListRegistry, SafeGatewayAdapter, CachedChainReaderProvider>;

/// A verifier wired to the chain list, the Safe gateway and public RPCs.
pub fn network_verifier(cfg: VerifyAdapterConfig) -> Result<NetworkVerifier, PortError> {
    Ok(Verifier::new(
        ChainListRegistry::with_config(&cfg)?,
        SafeGatewayAdapter::with_config(cfg.clone())?,
        CachedChainReaderProvider::new(cfg),
    ))
}
