use super::{SERVER_ERROR_CODE, UNSUPPORTED_ACCOUNTS_CODE, invalid_params, rpc_err};
use thiserror::Error;

/// Errors signing a list of payment actions.
///
/// Any of these aborts the whole batch.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No account is loaded.
    #[error("Unsupported accounts.")]
    UnsupportedAccounts,
    /// The action's params are not a JSON array.
    #[error("invalid params for payment action {index}: {reason}")]
    InvalidParams {
        /// Position of the offending action.
        index: usize,
        /// Why decoding failed.
        reason: String,
    },
    /// The typed data of a typed-data action could not be parsed.
    #[error("Invalid typed data format: {0}")]
    InvalidTypedData(String),
    /// The action asks for a method the signer does not implement.
    #[error("Unsupported signing method: {0}")]
    UnsupportedSigningMethod(String),
    /// The signing primitive failed.
    #[error(transparent)]
    Signing(#[from] eyre::Error),
}

impl From<PaymentError> for jsonrpsee::types::error::ErrorObject<'static> {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::UnsupportedAccounts => {
                rpc_err(UNSUPPORTED_ACCOUNTS_CODE, err.to_string())
            }
            PaymentError::InvalidParams { .. }
            | PaymentError::InvalidTypedData(_)
            | PaymentError::UnsupportedSigningMethod(_) => invalid_params(err.to_string()),
            PaymentError::Signing(_) => rpc_err(SERVER_ERROR_CODE, err.to_string()),
        }
    }
}
