//! Chain metadata from the ethereum-lists `chains.json` feed.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

use rusty_safe_verify_core::{ChainInfo, ChainRegistry, NativeCurrency, PortError};

use crate::config::VerifyAdapterConfig;
use crate::http::{build_client, send_json};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainListEntry {
    pub name: String,
    pub chain_id: u64,
    pub short_name: String,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub rpc: Vec<String>,
    #[serde(default)]
    pub explorers: Vec<ChainListExplorer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainListExplorer {
    pub url: String,
}

/// Plain http(s) endpoints only; templated URLs such as
/// `https://mainnet.infura.io/v3/${INFURA_API_KEY}` need a key we do not have.
pub fn usable_rpc_url(url: &str) -> bool {
    !url.contains("${") && (url.starts_with("https://") || url.starts_with("http://"))
}

impl From<ChainListEntry> for ChainInfo {
    fn from(entry: ChainListEntry) -> Self {
        Self {
            chain_id: entry.chain_id,
            name: entry.name,
            short_name: entry.short_name,
            native_currency: entry.native_currency,
            rpc_urls: entry
                .rpc
                .into_iter()
                .filter(|url| usable_rpc_url(url))
                .collect(),
            explorers: entry.explorers.into_iter().map(|e| e.url).collect(),
        }
    }
}

fn bare_host(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn explorer_matches(explorer: &str, host: &str) -> bool {
    Url::parse(explorer)
        .ok()
        .and_then(|url| url.host_str().map(|h| bare_host(h).eq_ignore_ascii_case(bare_host(host))))
        .unwrap_or(false)
}

/// Fetches the chain list once and answers every lookup from memory.
#[derive(Debug)]
pub struct ChainListRegistry {
    client: reqwest::Client,
    url: String,
    timeout_ms: u64,
    chains: OnceCell<Vec<ChainInfo>>,
}

impl ChainListRegistry {
    pub fn with_config(cfg: &VerifyAdapterConfig) -> Result<Self, PortError> {
        Ok(Self {
            client: build_client(cfg)?,
            url: cfg.chain_list_url.clone(),
            timeout_ms: cfg.http_timeout_ms,
            chains: OnceCell::new(),
        })
    }

    /// A registry over a fixed list that never touches the network.
    pub fn from_chains(chains: Vec<ChainInfo>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: String::new(),
            timeout_ms: 0,
            chains: OnceCell::new_with(Some(chains)),
        }
    }

    pub async fn chains(&self) -> Result<&[ChainInfo], PortError> {
        let chains = self
            .chains
            .get_or_try_init(|| async {
                debug!(url = %self.url, "fetching chain list");
                let entries: Vec<ChainListEntry> =
                    send_json(self.client.get(&self.url), self.timeout_ms).await?;
                info!(chains = entries.len(), "loaded chain list");
                Ok::<_, PortError>(entries.into_iter().map(ChainInfo::from).collect())
            })
            .await?;
        Ok(chains.as_slice())
    }

    async fn find(&self, pred: impl Fn(&ChainInfo) -> bool) -> Result<Option<ChainInfo>, PortError> {
        Ok(self.chains().await?.iter().find(|&c| pred(c)).cloned())
    }
}

#[async_trait]
impl ChainRegistry for ChainListRegistry {
    async fn chain_by_short_name(&self, short_name: &str) -> Result<Option<ChainInfo>, PortError> {
        self.find(|c| c.short_name == short_name).await
    }

    async fn chain_by_explorer_host(&self, host: &str) -> Result<Option<ChainInfo>, PortError> {
        self.find(|c| c.explorers.iter().any(|e| explorer_matches(e, host)))
            .await
    }

    async fn chain_by_id(&self, chain_id: u64) -> Result<Option<ChainInfo>, PortError> {
        self.find(|c| c.chain_id == chain_id).await
    }
}
