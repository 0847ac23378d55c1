//! A BIP-39 backed EVM account.

use super::WalletSigner;
use crate::{constants::DEFAULT_DERIVATION_PATH, error::KeyError};
use alloy::{
    dyn_abi::TypedData,
    eips::Encodable2718,
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, ChainId, TxHash, hex},
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::{
        Signer,
        k256::ecdsa::SigningKey,
        local::{
            PrivateKeySigner,
            coins_bip39::{English, Mnemonic},
        },
    },
};
use std::{borrow::Cow, fmt, str::FromStr};
use tracing::debug;
use url::Url;

/// Number of words in a generated recovery phrase.
const GENERATED_WORD_COUNT: usize = 12;

/// The outcome of [`EvmWallet::create`].
pub struct EvmWalletCreateResult {
    /// The wallet.
    pub wallet: EvmWallet,
    /// The normalised recovery phrase, to be persisted by the caller.
    pub mnemonic: String,
}

impl fmt::Debug for EvmWalletCreateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmWalletCreateResult").field("wallet", &self.wallet).finish_non_exhaustive()
    }
}

/// An EVM account derived at `m/44'/60'/0'/0/0` from a recovery phrase.
#[derive(Clone)]
pub struct EvmWallet {
    signer: PrivateKeySigner,
    wallet: EthereumWallet,
}

impl fmt::Debug for EvmWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EvmWallet").field(&self.signer.address()).finish()
    }
}

impl EvmWallet {
    /// Creates a wallet from `mnemonic`, or from a freshly generated 12-word phrase.
    ///
    /// The phrase is normalised to single-spaced lowercase words before it is validated.
    pub fn create(mnemonic: Option<&str>) -> Result<EvmWalletCreateResult, KeyError> {
        let mnemonic = match mnemonic {
            Some(phrase) => Mnemonic::<English>::from_str(&normalize_phrase(phrase))
                .map_err(|err| KeyError::InvalidMnemonic(err.to_string()))?,
            None => Mnemonic::<English>::new_with_count(
                &mut rand::thread_rng(),
                GENERATED_WORD_COUNT,
            )
            .map_err(|err| KeyError::Derivation(err.to_string()))?,
        };

        let key = mnemonic
            .derive_key(DEFAULT_DERIVATION_PATH, None)
            .map_err(|err| KeyError::Derivation(err.to_string()))?;
        let key: &SigningKey = key.as_ref();

        Ok(EvmWalletCreateResult {
            wallet: Self::from_signer(PrivateKeySigner::from_signing_key(key.clone())),
            mnemonic: mnemonic.to_phrase(),
        })
    }

    /// Wraps an existing local signer.
    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        let wallet = EthereumWallet::new(signer.clone());
        Self { signer, wallet }
    }
}

#[async_trait::async_trait]
impl WalletSigner for EvmWallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign_message(&self, message: &str) -> eyre::Result<Bytes> {
        let text = personal_message_text(message);
        debug!(len = text.len(), "signing personal message");
        Ok(self.signer.sign_message(text.as_bytes()).await?.as_bytes().into())
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> eyre::Result<Bytes> {
        let hash = typed_data.eip712_signing_hash()?;
        debug!(%hash, primary_type = %typed_data.primary_type, "signing typed data");
        Ok(self.signer.sign_hash(&hash).await?.as_bytes().into())
    }

    async fn sign_transaction(&self, mut tx: TransactionRequest) -> eyre::Result<Bytes> {
        tx.from.get_or_insert(self.address());
        let envelope = tx.build(&self.wallet).await?;
        debug!(hash = %envelope.tx_hash(), "signed transaction");
        Ok(envelope.encoded_2718().into())
    }

    async fn send_transaction(
        &self,
        mut tx: TransactionRequest,
        chain_id: ChainId,
        rpc_url: &Url,
    ) -> eyre::Result<TxHash> {
        tx.from.get_or_insert(self.address());
        tx.set_chain_id(chain_id);

        let provider =
            ProviderBuilder::new().wallet(self.wallet.clone()).connect_http(rpc_url.clone());
        let pending = provider.send_transaction(tx).await?;
        debug!(chain_id, tx_hash = %pending.tx_hash(), "broadcast transaction");

        Ok(*pending.tx_hash())
    }
}

/// The text signed for a `personal_sign` message.
///
/// A message matching `^0x[0-9a-fA-F]*$` is hex-decoded, with odd-length input left-padded by a
/// zero nibble, and read as UTF-8. Invalid sequences become U+FFFD. Anything else is signed as is.
pub fn personal_message_text(message: &str) -> Cow<'_, str> {
    let Some(digits) = message.strip_prefix("0x") else {
        return Cow::Borrowed(message);
    };
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Cow::Borrowed(message);
    }

    let decoded = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    };
    match decoded {
        Ok(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
        Err(_) => Cow::Borrowed(message),
    }
}

fn normalize_phrase(phrase: &str) -> String {
    phrase.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join(" ")
}
