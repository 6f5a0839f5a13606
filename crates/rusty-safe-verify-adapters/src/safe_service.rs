use async_trait::async_trait;
use tracing::debug;
use url::Url;

use rusty_safe_verify_core::{GatewayTxDetails, PortError, SafeGateway};

use crate::config::VerifyAdapterConfig;
use crate::http::{build_client, send_json};

/// Reads transactions from the Safe client gateway.
#[derive(Debug, Clone)]
pub struct SafeGatewayAdapter {
    client: reqwest::Client,
    cfg: VerifyAdapterConfig,
}

impl SafeGatewayAdapter {
    pub fn with_config(cfg: VerifyAdapterConfig) -> Result<Self, PortError> {
        Ok(Self {
            client: build_client(&cfg)?,
            cfg,
        })
    }

    pub fn transaction_url(&self, chain_id: u64, tx_id: &str) -> Result<Url, PortError> {
        let base = self.cfg.gateway_url(chain_id);
        let mut url = Url::parse(base)
            .map_err(|e| PortError::Validation(format!("gateway url {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| PortError::Validation(format!("gateway url {base} cannot be a base")))?
            .pop_if_empty()
            .extend(["v1", "chains", &chain_id.to_string(), "transactions", tx_id]);
        Ok(url)
    }
}

#[async_trait]
impl SafeGateway for SafeGatewayAdapter {
    async fn transaction_details(
        &self,
        chain_id: u64,
        tx_id: &str,
    ) -> Result<GatewayTxDetails, PortError> {
        let url = self.transaction_url(chain_id, tx_id)?;
        debug!(%url, "GET gateway transaction");
        send_json(self.client.get(url), self.cfg.http_timeout_ms).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_url() {
        let adapter = SafeGatewayAdapter::with_config(VerifyAdapterConfig::default()).unwrap();

        assert_eq!(
            adapter.transaction_url(1, "multisig_0xab_0xcd").unwrap().as_str(),
            "https://safe-client.safe.global/v1/chains/1/transactions/multisig_0xab_0xcd"
        );
        assert_eq!(
            adapter.transaction_url(1284, "x").unwrap().as_str(),
            "https://gateway.multisig.moonbeam.network/v1/chains/1284/transactions/x"
        );
    }

    #[test]
    fn test_tx_id_is_escaped() {
        let adapter = SafeGatewayAdapter::with_config(VerifyAdapterConfig::default()).unwrap();
        let url = adapter.transaction_url(1, "a/b").unwrap();
        assert!(url.as_str().ends_with("/transactions/a%2Fb"));
    }
}
