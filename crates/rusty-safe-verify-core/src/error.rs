use thiserror::Error;

use crate::ports::PortError;

pub type Result<T, E = VerifyError> = std::result::Result<T, E>;

/// Failures of a verification call.
///
/// A signer that does not match its claim is not an error; it is reported as
/// `verified: false` in the result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("malformed reference: {0}")]
    MalformedReference(String),

    #[error("unknown chain: {0}")]
    UnknownChain(String),

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("decode error: {0}")]
    DecodeError(String),

    #[error("unsupported Safe version: {0}")]
    UnsupportedVersion(String),

    #[error("unsupported {0} signature")]
    UnsupportedSignatureScheme(&'static str),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

impl VerifyError {
    pub(crate) fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }
}

impl From<PortError> for VerifyError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Validation(msg) => Self::DecodeError(msg),
            other => Self::NetworkFailure(other.to_string()),
        }
    }
}
