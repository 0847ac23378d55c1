//! Wallet error types.
use core::fmt;
use jsonrpsee::core::RpcResult;
use thiserror::Error;

mod keys;
pub use keys::KeyError;

mod payment;
pub use payment::PaymentError;

mod request;
pub use request::RequestError;

mod storage;
pub use storage::StorageError;

/// WalletConnect SDK code for a request the user declined.
pub const USER_REJECTED_CODE: i32 = 5000;
/// WalletConnect SDK code for a chain the wallet cannot serve.
pub const UNSUPPORTED_CHAIN_CODE: i32 = 5100;
/// WalletConnect SDK code for a method the wallet refuses to serve.
pub const UNSUPPORTED_METHOD_CODE: i32 = 5101;
/// WalletConnect SDK code for a request arriving without an active account.
pub const UNSUPPORTED_ACCOUNTS_CODE: i32 = 5103;
/// WalletConnect SDK code for a method name the wallet does not know.
pub const INVALID_METHOD_CODE: i32 = 1001;
/// Generic JSON-RPC server error, used for failures of the signing primitives.
pub const SERVER_ERROR_CODE: i32 = -32000;

/// Errors raised while loading or persisting the wallet's recovery phrase.
#[derive(Debug, Error)]
pub enum KeystoreError {
    /// The stored or supplied phrase is not usable.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// The secret storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors talking to the [`WalletService`](crate::service::WalletService).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service task is gone.
    #[error("wallet service is not running")]
    Closed,
}

/// The overarching error type returned by the `wallet_` namespace.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Errors signing payment actions.
    #[error(transparent)]
    Payment(#[from] PaymentError),
    /// Errors reaching the wallet service.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// Errors related to the keystore.
    #[error(transparent)]
    Keystore(#[from] KeystoreError),
}

impl From<WalletError> for jsonrpsee::types::error::ErrorObject<'static> {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Payment(inner) => inner.into(),
            WalletError::Service(inner) => inner.into(),
            WalletError::Keystore(_) => internal_rpc("an internal error occurred"),
        }
    }
}

impl From<ServiceError> for jsonrpsee::types::error::ErrorObject<'static> {
    fn from(err: ServiceError) -> Self {
        internal_rpc(err.to_string())
    }
}

/// A helper trait to provide an RPC error code.
pub trait ToRpcResult<Ok, Err>: Sized {
    /// Converts result to [`RpcResult`] by converting error variant to
    /// [`jsonrpsee_types::error::ErrorObject`]
    fn to_rpc_result(self) -> RpcResult<Ok>
    where
        Err: fmt::Display;
}

macro_rules! impl_error_helpers {
    ($err:ty) => {
        impl<Ok> ToRpcResult<Ok, $err> for Result<Ok, $err> {
            fn to_rpc_result(self) -> RpcResult<Ok> {
                self.map_err(|err| err.into())
            }
        }

        impl From<$err> for String {
            fn from(err: $err) -> Self {
                err.to_string()
            }
        }
    };
}

impl_error_helpers!(WalletError);
impl_error_helpers!(RequestError);
impl_error_helpers!(PaymentError);
impl_error_helpers!(ServiceError);

/// Constructs an invalid params JSON‑RPC error.
fn invalid_params(msg: impl Into<String>) -> jsonrpsee::types::error::ErrorObject<'static> {
    rpc_err(jsonrpsee::types::error::INVALID_PARAMS_CODE, msg)
}

/// Constructs an internal JSON‑RPC error.
fn internal_rpc(msg: impl Into<String>) -> jsonrpsee::types::error::ErrorObject<'static> {
    rpc_err(jsonrpsee::types::error::INTERNAL_ERROR_CODE, msg)
}

/// Constructs a JSON‑RPC error with `code` and `message`.
fn rpc_err(code: i32, msg: impl Into<String>) -> jsonrpsee::types::error::ErrorObject<'static> {
    jsonrpsee::types::error::ErrorObject::owned(code, msg.into(), None::<()>)
}
