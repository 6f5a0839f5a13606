//! Turns a user supplied reference into a [`ResolvedTransaction`].
//!
//! Two reference shapes are understood, tried in this order:
//! - a Safe web app share link: `...?safe=<shortName>:<address>&id=<txId>`
//! - a block explorer transaction page whose last path segment is the hash of
//!   an `execTransaction` call

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use tracing::{debug, warn};
use url::Url;

use crate::calldata::{decode_exec_transaction, ISafe};
use crate::domain::{ChainInfo, ResolvedTransaction};
use crate::error::{Result, VerifyError};
use crate::ports::{ChainReader, ChainReaderProvider, ChainRegistry, SafeGateway};

pub const UNPARSEABLE_REFERENCE: &str = "cannot parse transaction reference";

/// Components of a share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub short_name: String,
    pub tx_id: String,
}

pub fn parse_share_link(reference: &str) -> Result<ShareLink> {
    let url = Url::parse(reference)
        .map_err(|e| VerifyError::MalformedReference(format!("{reference}: {e}")))?;

    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    };

    let (safe, tx_id) = param("safe").zip(param("id")).ok_or_else(|| {
        VerifyError::MalformedReference("share link needs `safe` and `id` parameters".into())
    })?;

    let short_name = safe.split(':').next().unwrap_or_default().to_string();
    if short_name.is_empty() {
        return Err(VerifyError::MalformedReference(format!(
            "no chain prefix in safe={safe}"
        )));
    }

    Ok(ShareLink { short_name, tx_id })
}

/// Components of an explorer transaction link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerLink {
    pub host: String,
    pub tx_hash: B256,
}

pub fn parse_explorer_link(reference: &str) -> Result<ExplorerLink> {
    let url = Url::parse(reference)
        .map_err(|e| VerifyError::MalformedReference(format!("{reference}: {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| VerifyError::MalformedReference(format!("{reference}: no host")))?
        .to_string();

    let last = url
        .path_segments()
        .and_then(|segments| segments.map(str::trim).filter(|s| !s.is_empty()).last())
        .unwrap_or_default();

    if last.len() != 66 || !last.starts_with("0x") {
        return Err(VerifyError::MalformedReference(format!(
            "{last:?} is not a transaction hash"
        )));
    }
    let tx_hash = last
        .parse::<B256>()
        .map_err(|e| VerifyError::MalformedReference(format!("{last}: {e}")))?;

    Ok(ExplorerLink { host, tx_hash })
}

pub async fn safe_version(
    reader: &dyn ChainReader,
    safe_address: Address,
    block: Option<u64>,
) -> Result<String> {
    let output = reader
        .call(safe_address, Bytes::from(ISafe::VERSIONCall {}.abi_encode()), block)
        .await?;
    let decoded = ISafe::VERSIONCall::abi_decode_returns(&output, true)
        .map_err(|e| VerifyError::decode(format!("VERSION() output: {e}")))?;
    Ok(decoded.version)
}

pub async fn safe_nonce(
    reader: &dyn ChainReader,
    safe_address: Address,
    block: Option<u64>,
) -> Result<U256> {
    let output = reader
        .call(safe_address, Bytes::from(ISafe::nonceCall {}.abi_encode()), block)
        .await?;
    let decoded = ISafe::nonceCall::abi_decode_returns(&output, true)
        .map_err(|e| VerifyError::decode(format!("nonce() output: {e}")))?;
    Ok(decoded.nonce)
}

pub struct Resolver<R, G, P>
where
    R: ChainRegistry,
    G: SafeGateway,
    P: ChainReaderProvider,
{
    pub registry: R,
    pub gateway: G,
    pub readers: P,
}

impl<R, G, P> Resolver<R, G, P>
where
    R: ChainRegistry,
    G: SafeGateway,
    P: ChainReaderProvider,
{
    pub fn new(registry: R, gateway: G, readers: P) -> Self {
        Self {
            registry,
            gateway,
            readers,
        }
    }

    /// Try the share link shape, then the explorer shape. Individual failures
    /// are logged and collapsed into one `MalformedReference`.
    pub async fn resolve(&self, reference: &str) -> Result<ResolvedTransaction> {
        let share_err = match self.resolve_share_link(reference).await {
            Ok(resolved) => return Ok(resolved),
            Err(err) => {
                debug!(reference, error = %err, "share link attempt failed");
                err
            }
        };
        let explorer_err = match self.resolve_explorer_link(reference).await {
            Ok(resolved) => return Ok(resolved),
            Err(err) => err,
        };

        warn!(reference, error = %share_err, "not a resolvable share link");
        warn!(reference, error = %explorer_err, "not a resolvable explorer link");
        Err(VerifyError::MalformedReference(UNPARSEABLE_REFERENCE.into()))
    }

    pub async fn resolve_share_link(&self, reference: &str) -> Result<ResolvedTransaction> {
        let link = parse_share_link(reference)?;
        let chain = self
            .registry
            .chain_by_short_name(&link.short_name)
            .await?
            .ok_or_else(|| VerifyError::UnknownChain(link.short_name.clone()))?;

        debug!(chain_id = chain.chain_id, tx_id = %link.tx_id, "fetching transaction from gateway");
        let details = self
            .gateway
            .transaction_details(chain.chain_id, &link.tx_id)
            .await?;
        let tx = details.normalize()?;

        let reader = self.readers.reader(&chain).await?;
        let version = safe_version(reader.as_ref(), tx.safe_address, None).await?;

        Ok(ResolvedTransaction {
            chain,
            safe_address: tx.safe_address,
            safe_tx: tx.safe_tx,
            signatures: tx.signatures,
            asserted_hash: tx.asserted_hash,
            version,
        })
    }

    pub async fn resolve_explorer_link(&self, reference: &str) -> Result<ResolvedTransaction> {
        let link = parse_explorer_link(reference)?;
        let chain = self.explorer_chain(&link.host).await?;
        let reader = self.readers.reader(&chain).await?;

        debug!(chain_id = chain.chain_id, tx_hash = %link.tx_hash, "fetching transaction from chain");
        let onchain = reader
            .transaction_by_hash(link.tx_hash)
            .await?
            .ok_or_else(|| VerifyError::decode(format!("transaction {} not found", link.tx_hash)))?;

        let safe_address = onchain
            .to
            .ok_or_else(|| VerifyError::decode("transaction has no `to` address"))?;
        let exec = decode_exec_transaction(&onchain.input)?;

        // state as it was right before execution
        let block = onchain
            .block_number
            .ok_or_else(|| VerifyError::decode("transaction is still pending"))?
            .checked_sub(1)
            .ok_or_else(|| VerifyError::decode("transaction is in the genesis block"))?;

        let nonce = safe_nonce(reader.as_ref(), safe_address, Some(block)).await?;
        let version = safe_version(reader.as_ref(), safe_address, Some(block)).await?;

        Ok(ResolvedTransaction {
            chain,
            safe_address,
            safe_tx: exec.safe_tx(nonce),
            signatures: exec.signature_records(),
            asserted_hash: None,
            version,
        })
    }

    async fn explorer_chain(&self, host: &str) -> Result<ChainInfo> {
        self.registry
            .chain_by_explorer_host(host)
            .await?
            .ok_or_else(|| VerifyError::UnknownChain(host.to_string()))
    }
}
