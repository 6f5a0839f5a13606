use alloy::primitives::{Address, B256};
use tracing::{debug, info};

use crate::domain::{
    HashCheck, ResolvedTransaction, SafeTransaction, SignatureRecord, VerifiedSignature,
    VerifyResult,
};
use crate::decoder::decode_known_call;
use crate::error::{Result, VerifyError};
use crate::hashing::hash_safe_transaction;
use crate::multisend::{decode_multisend_call, is_multisend_call};
use crate::ports::{ChainReaderProvider, ChainRegistry, SafeGateway};
use crate::resolver::Resolver;
use crate::signature::{is_recoverable_version, recover_from_hash};
use crate::warnings::check_warnings;

/// Per-signature result of [`verify_signatures_lenient`].
pub type SignatureOutcome = Result<VerifiedSignature, VerifyError>;

/// Resolves references through the injected ports and verifies them.
pub struct Verifier<R, G, P>
where
    R: ChainRegistry,
    G: SafeGateway,
    P: ChainReaderProvider,
{
    pub resolver: Resolver<R, G, P>,
}

impl<R, G, P> Verifier<R, G, P>
where
    R: ChainRegistry,
    G: SafeGateway,
    P: ChainReaderProvider,
{
    pub fn new(registry: R, gateway: G, readers: P) -> Self {
        Self {
            resolver: Resolver::new(registry, gateway, readers),
        }
    }

    pub async fn verify(&self, reference: &str) -> Result<VerifyResult> {
        let resolved = self.resolver.resolve(reference).await?;
        verify_resolved(resolved)
    }
}

fn verify_one(hash: B256, record: &SignatureRecord) -> SignatureOutcome {
    let signer = recover_from_hash(hash, &record.signature)?;
    Ok(VerifiedSignature {
        signer,
        signature: record.signature.clone(),
        verified: record.signer.map_or(true, |claimed| claimed == signer),
    })
}

/// Hash and check signatures of already resolved data. A signature that
/// cannot be recovered fails the whole call.
pub fn verify_resolved(resolved: ResolvedTransaction) -> Result<VerifyResult> {
    let ResolvedTransaction {
        chain,
        safe_address,
        safe_tx,
        signatures,
        asserted_hash,
        version,
    } = resolved;

    let computed = hash_safe_transaction(chain.chain_id, safe_address, &safe_tx, &version);
    let hash = HashCheck {
        value: computed,
        verified: asserted_hash.map_or(true, |asserted| asserted == computed),
    };

    if !signatures.is_empty() && !is_recoverable_version(&version) {
        return Err(VerifyError::UnsupportedVersion(version));
    }
    let signatures = signatures
        .iter()
        .map(|record| verify_one(computed, record))
        .collect::<Result<Vec<_>>>()?;

    // the batch is informational, an undecodable payload only loses it
    let batch = if is_multisend_call(&safe_tx.data) {
        decode_multisend_call(&safe_tx.data)
            .inspect_err(|e| debug!(error = %e, "multiSend payload not decodable"))
            .ok()
    } else {
        None
    };
    let warnings = check_warnings(&safe_tx, batch.as_deref());
    let decoded = decode_known_call(&safe_tx.data);
    let decoded_batch = batch
        .iter()
        .flatten()
        .map(|call| decode_known_call(&call.data))
        .collect();

    let result = VerifyResult {
        chain_id: chain.chain_id,
        chain,
        safe_address,
        version,
        safe_tx,
        hash,
        signatures,
        batch,
        decoded,
        decoded_batch,
        warnings,
    };

    info!(
        chain_id = result.chain_id,
        safe = %result.safe_address,
        hash = %result.hash.value,
        hash_verified = result.hash.verified,
        signatures = result.signatures.len(),
        all_verified = result.all_verified(),
        "verified Safe transaction"
    );
    Ok(result)
}

/// Check each signature independently; one bad signature does not hide the
/// others.
pub fn verify_signatures_lenient(
    chain_id: u64,
    safe_address: Address,
    version: &str,
    tx: &SafeTransaction,
    signatures: &[SignatureRecord],
) -> Vec<SignatureOutcome> {
    if !is_recoverable_version(version) {
        return signatures
            .iter()
            .map(|_| Err(VerifyError::UnsupportedVersion(version.to_string())))
            .collect();
    }

    let hash = hash_safe_transaction(chain_id, safe_address, tx, version);
    signatures
        .iter()
        .map(|record| verify_one(hash, record))
        .collect()
}
