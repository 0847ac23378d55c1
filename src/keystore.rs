//! Wallet bootstrap from secret storage.

use crate::{
    constants::MNEMONIC_STORAGE_KEY,
    error::KeystoreError,
    signers::{EvmWallet, WalletSigner},
    storage::{SecretStorage, SecretStorageApi},
};
use tracing::info;

/// The wallet produced by [`load_or_create_wallet`].
#[derive(Debug)]
pub struct LoadedWallet {
    /// The wallet.
    pub wallet: EvmWallet,
    /// Whether a new recovery phrase was generated and persisted.
    pub created: bool,
}

/// Restores the wallet from the stored recovery phrase, or generates and persists a new one.
///
/// A stored phrase that fails validation is an error; it is never replaced silently.
pub async fn load_or_create_wallet(storage: &SecretStorage) -> Result<LoadedWallet, KeystoreError> {
    if let Some(phrase) = storage.get(MNEMONIC_STORAGE_KEY).await? {
        let created = EvmWallet::create(Some(phrase.as_str()))?;
        info!(address = %created.wallet.address(), "restored wallet");
        return Ok(LoadedWallet { wallet: created.wallet, created: false });
    }

    let created = EvmWallet::create(None)?;
    storage.set(MNEMONIC_STORAGE_KEY, &created.mnemonic).await?;
    info!(address = %created.wallet.address(), "created wallet");

    Ok(LoadedWallet { wallet: created.wallet, created: true })
}

/// Validates `phrase` and stores it, replacing any stored phrase.
pub async fn import_mnemonic(
    storage: &SecretStorage,
    phrase: &str,
) -> Result<EvmWallet, KeystoreError> {
    let created = EvmWallet::create(Some(phrase))?;
    storage.set(MNEMONIC_STORAGE_KEY, &created.mnemonic).await?;
    info!(address = %created.wallet.address(), "imported wallet");

    Ok(created.wallet)
}
