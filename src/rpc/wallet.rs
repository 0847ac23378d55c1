//! The `wallet_` namespace.
//!
//! - `wallet_sessionRequest` answers a session signing request with a JSON-RPC envelope.
//! - `wallet_rejectRequest` answers a session signing request the operator declined.
//! - `wallet_signPaymentActions` signs payment actions in order.
//! - `wallet_parsePaymentLink` normalises a scanned payment link.

use crate::{
    error::ToRpcResult,
    pay::{extract_payment_link, is_payment_link},
    service::WalletServiceHandle,
    types::{Health, PaymentAction, SigningRequest, SigningResponse},
    version::WALLETKIT_VERSION,
};
use alloy::primitives::{Address, Bytes};
use jsonrpsee::{
    core::{RpcResult, async_trait},
    proc_macros::rpc,
};
use tracing::debug;
use url::Url;

/// Wallet `wallet_` RPC namespace.
#[rpc(server, client, namespace = "wallet")]
pub trait WalletApi {
    /// Checks the health of the wallet and returns its version.
    #[method(name = "health", aliases = ["health"])]
    async fn health(&self) -> RpcResult<Health>;

    /// Address of the active account, if one is loaded.
    #[method(name = "getAddress")]
    async fn get_address(&self) -> RpcResult<Option<Address>>;

    /// Handles a session signing request.
    ///
    /// Failures are reported inside the returned envelope, not as JSON-RPC errors.
    #[method(name = "sessionRequest")]
    async fn session_request(&self, request: SigningRequest) -> RpcResult<SigningResponse>;

    /// Rejects a session signing request.
    #[method(name = "rejectRequest")]
    async fn reject_request(&self, id: u64) -> RpcResult<SigningResponse>;

    /// Signs payment actions, returning one signature per action in input order.
    #[method(name = "signPaymentActions")]
    async fn sign_payment_actions(&self, actions: Vec<PaymentAction>) -> RpcResult<Vec<Bytes>>;

    /// Normalises a payment link into its HTTPS form.
    ///
    /// Returns `null` for inputs that are not payment links or have no HTTPS form.
    #[method(name = "parsePaymentLink")]
    async fn parse_payment_link(&self, link: String) -> RpcResult<Option<Url>>;
}

/// Implementation of the `wallet_` namespace.
#[derive(Debug, Clone)]
pub struct Wallet {
    service: WalletServiceHandle,
}

impl Wallet {
    /// Create a new wallet RPC module.
    pub fn new(service: WalletServiceHandle) -> Self {
        Self { service }
    }
}

#[async_trait]
impl WalletApiServer for Wallet {
    async fn health(&self) -> RpcResult<Health> {
        Ok(Health {
            status: "ok".into(),
            version: WALLETKIT_VERSION.into(),
            address: self.service.address(),
        })
    }

    async fn get_address(&self) -> RpcResult<Option<Address>> {
        Ok(self.service.address())
    }

    async fn session_request(&self, request: SigningRequest) -> RpcResult<SigningResponse> {
        debug!(id = request.id, method = %request.method, "session request");
        self.service.session_request(request).await.to_rpc_result()
    }

    async fn reject_request(&self, id: u64) -> RpcResult<SigningResponse> {
        self.service.reject(id).await.to_rpc_result()
    }

    async fn sign_payment_actions(&self, actions: Vec<PaymentAction>) -> RpcResult<Vec<Bytes>> {
        debug!(count = actions.len(), "sign payment actions");
        self.service.sign_payment_actions(actions).await.to_rpc_result()
    }

    async fn parse_payment_link(&self, link: String) -> RpcResult<Option<Url>> {
        if !is_payment_link(&link) {
            return Ok(None);
        }
        Ok(extract_payment_link(&link))
    }
}
