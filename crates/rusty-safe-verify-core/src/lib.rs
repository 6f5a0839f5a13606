pub mod calldata;
pub mod decoder;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod hashing;
pub mod multisend;
pub mod orchestrator;
pub mod ports;
pub mod resolver;
pub mod signature;
pub mod warnings;

pub use calldata::{decode_exec_transaction, decode_safe_call, ExecTransaction, SafeCall};
pub use decoder::decode_known_call;
pub use domain::{
    ChainInfo, DecodedArg, DecodedCall, HashCheck, MetaTransaction, NativeCurrency, Operation,
    ResolvedTransaction, SafeTransaction, SignatureRecord, VerifiedSignature, VerifyResult,
    Warning,
};
pub use error::{Result, VerifyError};
pub use gateway::{GatewayTransaction, GatewayTxDetails};
pub use hashing::{domain_separator, hash_safe_transaction, safe_tx_struct_hash};
pub use multisend::{decode_batch, decode_multisend_call, encode_batch};
pub use orchestrator::{verify_resolved, verify_signatures_lenient, SignatureOutcome, Verifier};
pub use ports::{
    ChainReader, ChainReaderProvider, ChainRegistry, OnChainTransaction, PortError, SafeGateway,
};
pub use resolver::Resolver;
pub use signature::{classify_signature, recover_from_hash, recover_signer, SignatureKind};
pub use warnings::check_warnings;
