//! Signing-method dispatcher.
//!
//! Turns session signing requests into JSON-RPC responses using the active [`WalletSigner`].

use crate::{
    chains::Chains,
    error::RequestError,
    signers::WalletSigner,
    types::{SigningCall, SigningMethod, SigningRequest, SigningResponse},
};
use metrics::counter;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Dispatches signing requests to the wallet.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    /// The active account, if one is loaded.
    wallet: Option<Arc<dyn WalletSigner>>,
    /// Chains transactions can be broadcast to.
    chains: Chains,
}

impl Dispatcher {
    /// Creates a new [`Dispatcher`].
    pub fn new(wallet: Option<Arc<dyn WalletSigner>>, chains: Chains) -> Self {
        Self { wallet, chains }
    }

    /// The active account.
    pub fn wallet(&self) -> Option<&Arc<dyn WalletSigner>> {
        self.wallet.as_ref()
    }

    /// Replaces the active account.
    pub fn set_wallet(&mut self, wallet: Option<Arc<dyn WalletSigner>>) {
        self.wallet = wallet;
    }

    /// The chain registry.
    pub fn chains(&self) -> &Chains {
        &self.chains
    }

    /// Handles a signing request.
    ///
    /// Always returns a response carrying the request id; failures are reported in the error
    /// envelope.
    pub async fn handle_request(&self, request: SigningRequest) -> SigningResponse {
        let id = request.id;
        let method = request.method.clone();

        match self.try_handle(request).await {
            Ok(result) => {
                record_outcome(&method, "ok");
                SigningResponse::result(id, result)
            }
            Err(err) => {
                warn!(id, %method, kind = err.kind(), %err, "signing request failed");
                record_outcome(&method, err.kind());
                SigningResponse::error(id, err)
            }
        }
    }

    /// The response for a request the user declined.
    pub fn reject(&self, id: u64) -> SigningResponse {
        debug!(id, "rejecting signing request");
        counter!(
            "wallet.requests",
            "method" => "reject",
            "outcome" => RequestError::UserRejected.kind()
        )
        .increment(1);
        SigningResponse::error(id, RequestError::UserRejected)
    }

    async fn try_handle(&self, request: SigningRequest) -> Result<Value, RequestError> {
        let wallet = self.wallet.as_ref().ok_or(RequestError::UnsupportedAccounts)?;
        let method = request
            .method
            .parse::<SigningMethod>()
            .map_err(|_| RequestError::InvalidMethod(request.method.clone()))?;
        let call = SigningCall::decode(method, &request.params)?;

        debug!(id = request.id, %method, chain = ?request.chain_id, "handling signing request");

        match call {
            SigningCall::EthSign => Err(RequestError::EthSignDisabled),
            SigningCall::PersonalSign { message } => {
                Ok(wallet.sign_message(&message).await?.to_string().into())
            }
            SigningCall::SignTypedData(typed_data) => {
                Ok(wallet.sign_typed_data(&typed_data).await?.to_string().into())
            }
            SigningCall::SignTransaction(mut tx) => {
                if tx.chain_id.is_none() {
                    tx.chain_id = request.chain_id.as_ref().and_then(|chain| chain.eip155_id());
                }
                Ok(wallet.sign_transaction(*tx).await?.to_string().into())
            }
            SigningCall::SendTransaction(tx) => {
                let (chain_id, rpc_url) = self.chains.rpc_endpoint(request.chain_id.as_ref())?;
                Ok(wallet.send_transaction(*tx, chain_id, &rpc_url).await?.to_string().into())
            }
        }
    }
}

fn record_outcome(method: &str, outcome: &'static str) {
    // Unknown names are collapsed to keep label cardinality bounded.
    let method = method
        .parse::<SigningMethod>()
        .map_or_else(|_| "unknown".to_string(), |method| method.to_string());
    counter!("wallet.requests", "method" => method, "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chains::default_chains,
        eip712::{parse_typed_data, tests::mail},
        error::{
            INVALID_METHOD_CODE, SERVER_ERROR_CODE, UNSUPPORTED_ACCOUNTS_CODE,
            UNSUPPORTED_CHAIN_CODE, UNSUPPORTED_METHOD_CODE, USER_REJECTED_CODE,
        },
        signers::EvmWallet,
        types::Caip2ChainId,
    };
    use alloy::{
        consensus::{Transaction, TxEnvelope},
        dyn_abi::TypedData,
        eips::Decodable2718,
        primitives::{Address, Bytes, ChainId, TxHash, hex},
        rpc::types::TransactionRequest,
    };
    use serde_json::json;
    use url::Url;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    /// A signer whose every primitive fails.
    #[derive(Debug)]
    struct LockedSigner;

    #[async_trait::async_trait]
    impl WalletSigner for LockedSigner {
        fn address(&self) -> Address {
            Address::ZERO
        }

        async fn sign_message(&self, _message: &str) -> eyre::Result<Bytes> {
            eyre::bail!("device locked")
        }

        async fn sign_typed_data(&self, _typed_data: &TypedData) -> eyre::Result<Bytes> {
            eyre::bail!("device locked")
        }

        async fn sign_transaction(&self, _tx: TransactionRequest) -> eyre::Result<Bytes> {
            eyre::bail!("device locked")
        }

        async fn send_transaction(
            &self,
            _tx: TransactionRequest,
            _chain_id: ChainId,
            _rpc_url: &Url,
        ) -> eyre::Result<TxHash> {
            eyre::bail!("device locked")
        }
    }

    fn wallet() -> Arc<dyn WalletSigner> {
        Arc::new(EvmWallet::create(Some(TEST_MNEMONIC)).unwrap().wallet)
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Some(wallet()), Chains::new(default_chains()))
    }

    fn error_code(response: &SigningResponse) -> i32 {
        response.as_error().expect("expected an error response").code()
    }

    #[tokio::test]
    async fn response_id_matches_request() {
        let dispatcher = dispatcher();
        for (id, method, params) in [
            (1, "personal_sign", json!(["hello", TEST_ADDRESS])),
            (2, "eth_sign", json!([TEST_ADDRESS, "0x00"])),
            (3, "eth_signTypedData_v4", json!([TEST_ADDRESS, mail()])),
            (4, "eth_signTransaction", json!([{}])),
            (5, "eth_sendTransaction", json!([{}])),
            (6, "wallet_switchEthereumChain", json!([])),
        ] {
            let params = params.as_array().cloned().unwrap();
            let response = dispatcher.handle_request(SigningRequest::new(id, method, params)).await;
            assert_eq!(response.id(), id, "{method}");
        }
    }

    #[tokio::test]
    async fn no_wallet_means_unsupported_accounts() {
        let dispatcher = Dispatcher::new(None, Chains::new(default_chains()));
        for method in ["personal_sign", "eth_signTypedData_v4", "eth_sign", "not_a_method"] {
            let response = dispatcher
                .handle_request(SigningRequest::new(9, method, vec![json!("hello")]))
                .await;
            assert_eq!(error_code(&response), UNSUPPORTED_ACCOUNTS_CODE, "{method}");
            assert_eq!(response.as_error().unwrap().message(), "Unsupported accounts.");
        }
    }

    #[tokio::test]
    async fn unknown_method_is_invalid_regardless_of_params() {
        let dispatcher = dispatcher();
        for params in [vec![], vec![json!(null)], vec![json!({ "a": 1 }), json!([1, 2])]] {
            let response =
                dispatcher.handle_request(SigningRequest::new(11, "eth_accounts", params)).await;
            assert_eq!(error_code(&response), INVALID_METHOD_CODE);
        }
    }

    #[tokio::test]
    async fn eth_sign_is_refused() {
        let response = dispatcher()
            .handle_request(SigningRequest::new(
                12,
                "eth_sign",
                vec![json!(TEST_ADDRESS), json!("0xdeadbeef")],
            ))
            .await;
        let error = response.as_error().unwrap();
        assert_eq!(error.code(), UNSUPPORTED_METHOD_CODE);
        assert_eq!(error.message(), "eth_sign is disabled for security. Use personal_sign instead.");
    }

    #[tokio::test]
    async fn personal_sign_hex_matches_plain_text() {
        let dispatcher = dispatcher();
        let hex = dispatcher
            .handle_request(SigningRequest::new(
                1,
                "personal_sign",
                vec![json!(format!("0x{}", hex::encode("hello world"))), json!(TEST_ADDRESS)],
            ))
            .await;
        let plain = dispatcher
            .handle_request(SigningRequest::new(
                2,
                "personal_sign",
                vec![json!("hello world"), json!(TEST_ADDRESS)],
            ))
            .await;

        assert!(!hex.is_error());
        assert_eq!(hex.as_result(), plain.as_result());

        let signature = hex.as_result().and_then(Value::as_str).unwrap();
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 2 + 65 * 2);
    }

    #[tokio::test]
    async fn typed_data_v4_strips_domain_and_is_deterministic() {
        let dispatcher = dispatcher();
        let request = || {
            SigningRequest::new(
                21,
                "eth_signTypedData_v4",
                vec![json!(TEST_ADDRESS), json!(mail().to_string())],
            )
        };

        let first = dispatcher.handle_request(request()).await;
        let second = dispatcher.handle_request(request()).await;
        assert!(!first.is_error());
        assert_eq!(first, second);

        let expected = wallet().sign_typed_data(&parse_typed_data(&mail()).unwrap()).await.unwrap();
        assert_eq!(first.as_result(), Some(&json!(expected.to_string())));
    }

    #[tokio::test]
    async fn malformed_params_are_invalid() {
        let dispatcher = dispatcher();
        for (method, params) in [
            ("personal_sign", vec![]),
            ("eth_signTypedData", vec![json!(TEST_ADDRESS)]),
            ("eth_signTypedData_v3", vec![json!(TEST_ADDRESS), json!("{")]),
            ("eth_signTransaction", vec![json!(42)]),
        ] {
            let response = dispatcher.handle_request(SigningRequest::new(30, method, params)).await;
            assert_eq!(
                error_code(&response),
                jsonrpsee::types::error::INVALID_PARAMS_CODE,
                "{method}"
            );
        }
    }

    #[tokio::test]
    async fn sign_transaction_fills_request_chain() {
        let tx = json!({
            "to": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "value": "0x1",
            "nonce": "0x0",
            "gas": "0x5208",
            "maxFeePerGas": "0x77359400",
            "maxPriorityFeePerGas": "0x3b9aca00"
        });
        let response = dispatcher()
            .handle_request(
                SigningRequest::new(40, "eth_signTransaction", vec![tx])
                    .with_chain_id(Caip2ChainId::eip155(10)),
            )
            .await;

        let raw = response.as_result().and_then(Value::as_str).unwrap();
        let raw = hex::decode(raw).unwrap();
        let envelope = TxEnvelope::decode_2718(&mut raw.as_slice()).unwrap();
        assert_eq!(envelope.chain_id(), Some(10));
    }

    #[tokio::test]
    async fn send_transaction_without_rpc_is_unsupported_chain() {
        let dispatcher = Dispatcher::new(Some(wallet()), Chains::default());
        let response = dispatcher
            .handle_request(
                SigningRequest::new(7, "eth_sendTransaction", vec![json!({ "to": TEST_ADDRESS })])
                    .with_chain_id(Caip2ChainId::eip155(1)),
            )
            .await;

        assert_eq!(response.id(), 7);
        let error = response.as_error().unwrap();
        assert_eq!(error.code(), UNSUPPORTED_CHAIN_CODE);
        assert!(error.message().contains("Unsupported chain"));

        let response = dispatcher
            .handle_request(SigningRequest::new(8, "eth_sendTransaction", vec![json!({})]))
            .await;
        assert_eq!(response.as_error().unwrap().message(), "Unsupported chain: unknown");
    }

    #[tokio::test]
    async fn underlying_failure_message_is_passed_through() {
        let dispatcher = Dispatcher::new(Some(Arc::new(LockedSigner)), Chains::default());
        let response = dispatcher
            .handle_request(SigningRequest::new(50, "personal_sign", vec![json!("hi")]))
            .await;

        let error = response.as_error().unwrap();
        assert_eq!(error.code(), SERVER_ERROR_CODE);
        assert_eq!(error.message(), "device locked");
    }

    #[test]
    fn reject_is_user_rejected() {
        let response = dispatcher().reject(99);
        assert_eq!(response.id(), 99);
        assert_eq!(error_code(&response), USER_REJECTED_CODE);
        assert_eq!(response.as_error().unwrap().message(), "User rejected.");
    }
}
