use std::collections::HashMap;
use std::time::Duration;

use rusty_safe_verify_core::gateway::DEFAULT_GATEWAY_URL;
use tracing::warn;

pub const ENV_GATEWAY_URL: &str = "RUSTY_SAFE_GATEWAY_URL";
pub const ENV_CHAIN_LIST_URL: &str = "RUSTY_SAFE_CHAIN_LIST_URL";
pub const ENV_HTTP_TIMEOUT_MS: &str = "RUSTY_SAFE_HTTP_TIMEOUT_MS";
/// Suffixed with a decimal chain id, e.g. `RUSTY_SAFE_RPC_URL_137`.
pub const ENV_RPC_URL_PREFIX: &str = "RUSTY_SAFE_RPC_URL_";

pub const DEFAULT_CHAIN_LIST_URL: &str = "https://chainid.network/chains.json";
pub const MOONBEAM_CHAIN_ID: u64 = 1284;
pub const MOONBEAM_GATEWAY_URL: &str = "https://gateway.multisig.moonbeam.network";

#[derive(Debug, Clone)]
pub struct VerifyAdapterConfig {
    pub gateway_base_url: String,
    /// Chains served by their own gateway deployment.
    pub gateway_overrides: HashMap<u64, String>,
    pub chain_list_url: String,
    pub http_timeout_ms: u64,
    /// Used instead of the chain list RPC endpoints.
    pub rpc_overrides: HashMap<u64, String>,
}

impl Default for VerifyAdapterConfig {
    fn default() -> Self {
        Self {
            gateway_base_url: DEFAULT_GATEWAY_URL.to_owned(),
            gateway_overrides: HashMap::from([(
                MOONBEAM_CHAIN_ID,
                MOONBEAM_GATEWAY_URL.to_owned(),
            )]),
            chain_list_url: DEFAULT_CHAIN_LIST_URL.to_owned(),
            http_timeout_ms: 15_000,
            rpc_overrides: HashMap::new(),
        }
    }
}

impl VerifyAdapterConfig {
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Defaults overlaid with `RUSTY_SAFE_*` variables. Unparseable values are
    /// logged and ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut cfg = Self::default();
        for (key, value) in vars {
            let key = key.as_ref();
            let value: String = value.into();
            match key {
                ENV_GATEWAY_URL => cfg.gateway_base_url = value,
                ENV_CHAIN_LIST_URL => cfg.chain_list_url = value,
                ENV_HTTP_TIMEOUT_MS => match value.parse() {
                    Ok(ms) => cfg.http_timeout_ms = ms,
                    Err(e) => warn!(key, value = %value, error = %e, "ignoring invalid timeout"),
                },
                _ => {
                    let Some(chain) = key.strip_prefix(ENV_RPC_URL_PREFIX) else {
                        continue;
                    };
                    match chain.parse::<u64>() {
                        Ok(chain_id) => {
                            cfg.rpc_overrides.insert(chain_id, value);
                        }
                        Err(e) => warn!(key, error = %e, "ignoring RPC override with bad chain id"),
                    }
                }
            }
        }
        cfg
    }

    pub fn gateway_url(&self, chain_id: u64) -> &str {
        self.gateway_overrides
            .get(&chain_id)
            .unwrap_or(&self.gateway_base_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}
