//! Wallet version.

/// The version of the wallet daemon.
pub const WALLETKIT_VERSION: &str = env!("CARGO_PKG_VERSION");
