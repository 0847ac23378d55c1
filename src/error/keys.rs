use thiserror::Error;

/// Errors related to the wallet's key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The recovery phrase is malformed: unknown words, bad word count or bad checksum.
    #[error("Invalid mnemonic provided: {0}")]
    InvalidMnemonic(String),
    /// The account key could not be derived from a valid phrase.
    #[error("failed to derive account key: {0}")]
    Derivation(String),
}

impl KeyError {
    /// Whether this is [`KeyError::InvalidMnemonic`].
    pub const fn is_invalid_mnemonic(&self) -> bool {
        matches!(self, Self::InvalidMnemonic(_))
    }
}
