use super::{
    INVALID_METHOD_CODE, SERVER_ERROR_CODE, UNSUPPORTED_ACCOUNTS_CODE, UNSUPPORTED_CHAIN_CODE,
    UNSUPPORTED_METHOD_CODE, USER_REJECTED_CODE, invalid_params, rpc_err,
};
use crate::types::Caip2ChainId;
use thiserror::Error;

/// Errors produced while serving a session signing request.
///
/// Every variant ends up in the error envelope of a
/// [`SigningResponse`](crate::types::SigningResponse).
#[derive(Debug, Error)]
pub enum RequestError {
    /// No account is loaded.
    #[error("Unsupported accounts.")]
    UnsupportedAccounts,
    /// The method is not in the dispatch table.
    #[error("Invalid method.")]
    InvalidMethod(String),
    /// `eth_sign` signs arbitrary hashes and is refused.
    #[error("eth_sign is disabled for security. Use personal_sign instead.")]
    EthSignDisabled,
    /// The params do not match the shape the method expects.
    #[error("invalid params: {0}")]
    InvalidParams(String),
    /// No RPC endpoint is configured for the requested chain.
    #[error("Unsupported chain: {}", chain_label(.0))]
    UnsupportedChain(Option<Caip2ChainId>),
    /// The operator declined the request.
    #[error("User rejected.")]
    UserRejected,
    /// The signing or broadcast primitive failed.
    #[error("{0}")]
    Signing(#[from] eyre::Error),
}

impl RequestError {
    /// The JSON-RPC error code for this error.
    pub const fn code(&self) -> i32 {
        match self {
            Self::UnsupportedAccounts => UNSUPPORTED_ACCOUNTS_CODE,
            Self::InvalidMethod(_) => INVALID_METHOD_CODE,
            Self::EthSignDisabled => UNSUPPORTED_METHOD_CODE,
            Self::InvalidParams(_) => jsonrpsee::types::error::INVALID_PARAMS_CODE,
            Self::UnsupportedChain(_) => UNSUPPORTED_CHAIN_CODE,
            Self::UserRejected => USER_REJECTED_CODE,
            Self::Signing(_) => SERVER_ERROR_CODE,
        }
    }

    /// Short label used for logging and metrics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedAccounts => "unsupported_accounts",
            Self::InvalidMethod(_) => "invalid_method",
            Self::EthSignDisabled => "eth_sign_disabled",
            Self::InvalidParams(_) => "invalid_params",
            Self::UnsupportedChain(_) => "unsupported_chain",
            Self::UserRejected => "user_rejected",
            Self::Signing(_) => "signing_failed",
        }
    }
}

fn chain_label(chain: &Option<Caip2ChainId>) -> String {
    chain.as_ref().map_or_else(|| "unknown".to_string(), ToString::to_string)
}

impl From<RequestError> for jsonrpsee::types::error::ErrorObject<'static> {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::InvalidParams(_) => invalid_params(err.to_string()),
            _ => rpc_err(err.code(), err.to_string()),
        }
    }
}
