//! Wallet constants.

/// BIP-44 derivation path of the wallet account.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Secret storage key holding the recovery phrase.
pub const MNEMONIC_STORAGE_KEY: &str = "EIP155_MNEMONIC_1";

/// Default port of the JSON-RPC server.
pub const DEFAULT_RPC_PORT: u16 = 9229;

/// Default maximum number of concurrent connections to the JSON-RPC server.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 100;

/// Default config file name.
pub const DEFAULT_CONFIG_PATH: &str = "walletkit.yaml";
