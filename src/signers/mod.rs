//! Wallet key providers.

mod evm;
pub use evm::{EvmWallet, EvmWalletCreateResult, personal_message_text};

use alloy::{
    dyn_abi::TypedData,
    primitives::{Address, Bytes, ChainId, TxHash},
    rpc::types::TransactionRequest,
};
use url::Url;

/// Signing capabilities of a wallet account.
///
/// Failures of the underlying primitives are propagated unchanged.
#[async_trait::async_trait]
pub trait WalletSigner: std::fmt::Debug + Send + Sync {
    /// Address of the account.
    fn address(&self) -> Address;

    /// Signs a personal message ([EIP-191]).
    ///
    /// `0x`-prefixed hex is signed as the decoded bytes, anything else as UTF-8 text.
    ///
    /// [EIP-191]: https://eips.ethereum.org/EIPS/eip-191
    async fn sign_message(&self, message: &str) -> eyre::Result<Bytes>;

    /// Signs the [EIP-712] signing hash of `typed_data`.
    ///
    /// [EIP-712]: https://eips.ethereum.org/EIPS/eip-712
    async fn sign_typed_data(&self, typed_data: &TypedData) -> eyre::Result<Bytes>;

    /// Signs a transaction without broadcasting it.
    ///
    /// Returns the [EIP-2718] encoded signed envelope.
    ///
    /// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
    async fn sign_transaction(&self, tx: TransactionRequest) -> eyre::Result<Bytes>;

    /// Fills, signs and broadcasts a transaction through `rpc_url`.
    async fn send_transaction(
        &self,
        tx: TransactionRequest,
        chain_id: ChainId,
        rpc_url: &Url,
    ) -> eyre::Result<TxHash>;
}
