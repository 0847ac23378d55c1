//! The wallet service.
//!
//! A single task owns the [`Dispatcher`] and processes requests strictly in arrival order.
//! Callers talk to it through a cloneable [`WalletServiceHandle`].

use crate::{
    dispatcher::Dispatcher,
    error::{PaymentError, ServiceError, WalletError},
    pay::sign_payment_actions,
    types::{PaymentAction, SigningRequest, SigningResponse},
};
use alloy::primitives::{Address, Bytes};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

/// Capacity of the event channel. Slow subscribers miss older events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Messages accepted by the [`WalletService`].
#[derive(Debug)]
pub enum WalletServiceMessage {
    /// Handle a session signing request.
    SessionRequest(SigningRequest, oneshot::Sender<SigningResponse>),
    /// Reject a session signing request.
    Reject(u64, oneshot::Sender<SigningResponse>),
    /// Sign a batch of payment actions.
    SignPaymentActions(Vec<PaymentAction>, oneshot::Sender<Result<Vec<Bytes>, PaymentError>>),
}

/// How a session request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The request was signed.
    Signed,
    /// The request failed with the given JSON-RPC error code.
    Failed {
        /// Error code of the response.
        code: i32,
    },
}

impl From<&SigningResponse> for RequestOutcome {
    fn from(response: &SigningResponse) -> Self {
        match response.as_error() {
            Some(error) => Self::Failed { code: error.code() },
            None => Self::Signed,
        }
    }
}

/// Events emitted by the [`WalletService`] after each processed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// A session request was answered.
    RequestHandled {
        /// Request id.
        id: u64,
        /// Request method.
        method: String,
        /// Outcome of the request.
        outcome: RequestOutcome,
    },
    /// A session request was rejected.
    RequestRejected {
        /// Request id.
        id: u64,
    },
    /// A batch of payment actions was signed.
    PaymentActionsSigned {
        /// Number of signatures produced.
        count: usize,
    },
    /// Signing a batch of payment actions failed.
    PaymentActionsFailed {
        /// The error message.
        reason: String,
    },
}

/// Handle to communicate with the [`WalletService`].
#[derive(Debug, Clone)]
pub struct WalletServiceHandle {
    command_tx: mpsc::UnboundedSender<WalletServiceMessage>,
    events_tx: broadcast::Sender<WalletEvent>,
    /// The account never changes once the service runs, so it is answered without a round trip.
    address: Option<Address>,
}

impl WalletServiceHandle {
    /// Handles a session signing request.
    pub async fn session_request(
        &self,
        request: SigningRequest,
    ) -> Result<SigningResponse, ServiceError> {
        self.request(|tx| WalletServiceMessage::SessionRequest(request, tx)).await
    }

    /// Rejects a session signing request.
    pub async fn reject(&self, id: u64) -> Result<SigningResponse, ServiceError> {
        self.request(|tx| WalletServiceMessage::Reject(id, tx)).await
    }

    /// Signs payment actions in order.
    pub async fn sign_payment_actions(
        &self,
        actions: Vec<PaymentAction>,
    ) -> Result<Vec<Bytes>, WalletError> {
        Ok(self.request(|tx| WalletServiceMessage::SignPaymentActions(actions, tx)).await??)
    }

    /// Address of the active account.
    ///
    /// Answers even while the service is busy with a slow request.
    pub const fn address(&self) -> Option<Address> {
        self.address
    }

    /// Subscribes to [`WalletEvent`]s.
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events_tx.subscribe()
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> WalletServiceMessage,
    ) -> Result<T, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.command_tx.send(message(tx)).map_err(|_| ServiceError::Closed)?;
        rx.await.map_err(|_| ServiceError::Closed)
    }
}

/// Service owning the wallet.
#[derive(Debug)]
pub struct WalletService {
    /// The dispatcher serving session requests.
    dispatcher: Dispatcher,
    /// Incoming messages for the service.
    command_rx: mpsc::UnboundedReceiver<WalletServiceMessage>,
    /// Outgoing events.
    events_tx: broadcast::Sender<WalletEvent>,
}

impl WalletService {
    /// Creates a new [`WalletService`].
    pub fn new(dispatcher: Dispatcher) -> (Self, WalletServiceHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let address = dispatcher.wallet().map(|wallet| wallet.address());
        let this = Self { dispatcher, command_rx, events_tx: events_tx.clone() };
        (this, WalletServiceHandle { command_tx, events_tx, address })
    }

    /// Creates a new [`WalletService`] and spawns it.
    pub fn spawn(dispatcher: Dispatcher) -> WalletServiceHandle {
        let (this, handle) = Self::new(dispatcher);
        tokio::spawn(this.into_future());
        handle
    }

    /// Runs the service until every handle is dropped.
    pub async fn into_future(mut self) {
        while let Some(message) = self.command_rx.recv().await {
            self.on_message(message).await;
        }
        info!("wallet service stopped");
    }

    async fn on_message(&mut self, message: WalletServiceMessage) {
        match message {
            WalletServiceMessage::SessionRequest(request, reply) => {
                let method = request.method.clone();
                let response = self.dispatcher.handle_request(request).await;
                let event = WalletEvent::RequestHandled {
                    id: response.id(),
                    method,
                    outcome: RequestOutcome::from(&response),
                };
                let _ = reply.send(response);
                self.emit(event);
            }
            WalletServiceMessage::Reject(id, reply) => {
                let _ = reply.send(self.dispatcher.reject(id));
                self.emit(WalletEvent::RequestRejected { id });
            }
            WalletServiceMessage::SignPaymentActions(actions, reply) => {
                let result = match self.dispatcher.wallet() {
                    Some(wallet) => sign_payment_actions(wallet.as_ref(), &actions).await,
                    None => Err(PaymentError::UnsupportedAccounts),
                };
                let event = match &result {
                    Ok(signatures) => WalletEvent::PaymentActionsSigned { count: signatures.len() },
                    Err(err) => WalletEvent::PaymentActionsFailed { reason: err.to_string() },
                };
                let _ = reply.send(result);
                self.emit(event);
            }
        }
    }

    fn emit(&self, event: WalletEvent) {
        debug!(?event, "wallet event");
        // No subscribers is fine.
        let _ = self.events_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chains::Chains,
        error::{INVALID_METHOD_CODE, UNSUPPORTED_ACCOUNTS_CODE, USER_REJECTED_CODE},
        signers::{EvmWallet, WalletSigner},
    };
    use serde_json::json;
    use std::sync::Arc;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    fn spawn_service() -> WalletServiceHandle {
        let wallet: Arc<dyn WalletSigner> =
            Arc::new(EvmWallet::create(Some(TEST_MNEMONIC)).unwrap().wallet);
        WalletService::spawn(Dispatcher::new(Some(wallet), Chains::default()))
    }

    #[tokio::test]
    async fn responses_in_order_with_events() {
        let handle = spawn_service();
        let mut events = handle.subscribe();

        let requests = (0..5).map(|id| {
            let handle = handle.clone();
            async move {
                handle
                    .session_request(SigningRequest::new(id, "personal_sign", vec![json!("hi")]))
                    .await
            }
        });
        let responses = futures_util::future::join_all(requests).await;

        for (id, response) in responses.into_iter().enumerate() {
            let response = response.unwrap();
            assert_eq!(response.id(), id as u64);
            assert!(!response.is_error());
        }

        for _ in 0..5 {
            let event = events.recv().await.unwrap();
            assert!(matches!(
                event,
                WalletEvent::RequestHandled { outcome: RequestOutcome::Signed, .. }
            ));
        }
    }

    #[tokio::test]
    async fn reject_and_failures_are_broadcast() {
        let handle = spawn_service();
        let mut events = handle.subscribe();

        let response = handle.reject(3).await.unwrap();
        assert_eq!(response.as_error().unwrap().code(), USER_REJECTED_CODE);
        assert_eq!(events.recv().await.unwrap(), WalletEvent::RequestRejected { id: 3 });

        handle.session_request(SigningRequest::new(4, "eth_foo", vec![])).await.unwrap();
        assert_eq!(
            events.recv().await.unwrap(),
            WalletEvent::RequestHandled {
                id: 4,
                method: "eth_foo".into(),
                outcome: RequestOutcome::Failed { code: INVALID_METHOD_CODE },
            }
        );
    }

    #[tokio::test]
    async fn payment_actions() {
        let handle = spawn_service();
        let mut events = handle.subscribe();

        let action = PaymentAction::new("eip155:1", "personal_sign", r#"["hello"]"#);
        let signatures = handle.sign_payment_actions(vec![action.clone(), action]).await.unwrap();
        assert_eq!(signatures.len(), 2);
        assert_eq!(events.recv().await.unwrap(), WalletEvent::PaymentActionsSigned { count: 2 });

        let err = handle
            .sign_payment_actions(vec![PaymentAction::new("eip155:1", "eth_sign", "[]")])
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::Payment(PaymentError::UnsupportedSigningMethod(_))));
        assert!(matches!(events.recv().await.unwrap(), WalletEvent::PaymentActionsFailed { .. }));
    }

    #[tokio::test]
    async fn address_of_active_account() {
        let handle = spawn_service();
        assert_eq!(
            handle.address(),
            Some(alloy::primitives::address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
        );

        let empty = WalletService::spawn(Dispatcher::new(None, Chains::default()));
        assert_eq!(empty.address(), None);
    }

    /// A signer whose signing calls never complete.
    #[derive(Debug)]
    struct StalledSigner;

    #[async_trait::async_trait]
    impl WalletSigner for StalledSigner {
        fn address(&self) -> Address {
            Address::repeat_byte(0x11)
        }

        async fn sign_message(&self, _message: &str) -> eyre::Result<Bytes> {
            std::future::pending().await
        }

        async fn sign_typed_data(
            &self,
            _typed_data: &alloy::dyn_abi::TypedData,
        ) -> eyre::Result<Bytes> {
            std::future::pending().await
        }

        async fn sign_transaction(
            &self,
            _tx: alloy::rpc::types::TransactionRequest,
        ) -> eyre::Result<Bytes> {
            std::future::pending().await
        }

        async fn send_transaction(
            &self,
            _tx: alloy::rpc::types::TransactionRequest,
            _chain_id: alloy::primitives::ChainId,
            _rpc_url: &url::Url,
        ) -> eyre::Result<alloy::primitives::TxHash> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn address_answers_while_busy() {
        let handle =
            WalletService::spawn(Dispatcher::new(Some(Arc::new(StalledSigner)), Chains::default()));

        let stalled = tokio::spawn({
            let handle = handle.clone();
            async move {
                handle
                    .session_request(SigningRequest::new(1, "personal_sign", vec![json!("hi")]))
                    .await
            }
        });
        tokio::task::yield_now().await;

        assert_eq!(handle.address(), Some(Address::repeat_byte(0x11)));
        assert!(!stalled.is_finished());
        stalled.abort();
    }

    #[tokio::test]
    async fn payment_actions_without_wallet() {
        let handle = WalletService::spawn(Dispatcher::new(None, Chains::default()));
        let action = PaymentAction::new("eip155:1", "personal_sign", r#"["hello"]"#);

        let err = handle.sign_payment_actions(vec![action]).await.unwrap_err();
        assert!(matches!(err, WalletError::Payment(PaymentError::UnsupportedAccounts)));

        let error: jsonrpsee::types::ErrorObjectOwned = err.into();
        assert_eq!(error.code(), UNSUPPORTED_ACCOUNTS_CODE);
        assert_eq!(error.message(), "Unsupported accounts.");
    }

    #[tokio::test]
    async fn closed_service() {
        let (service, handle) = WalletService::new(Dispatcher::new(None, Chains::default()));
        drop(service);

        assert!(matches!(handle.reject(1).await, Err(ServiceError::Closed)));
        assert!(matches!(
            handle.sign_payment_actions(vec![]).await,
            Err(WalletError::Service(ServiceError::Closed))
        ));
    }
}
