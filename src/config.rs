//! Wallet configuration.
use crate::{
    chains::{ChainConfig, default_chains},
    constants::{DEFAULT_MAX_CONNECTIONS, DEFAULT_RPC_PORT},
    storage::SecretStorage,
    types::Caip2ChainId,
};
use eyre::Context;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use url::Url;

/// Wallet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Chains transactions can be broadcast to.
    #[serde(default = "default_chains")]
    pub chains: BTreeMap<Caip2ChainId, ChainConfig>,
    /// Secret storage configuration.
    #[serde(default)]
    pub keystore: KeystoreConfig,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            chains: default_chains(),
            keystore: KeystoreConfig::default(),
        }
    }
}

impl WalletConfig {
    /// Sets the IP address to serve the RPC on.
    pub fn with_address(mut self, address: IpAddr) -> Self {
        self.server.address = address;
        self
    }

    /// Sets the port to serve the RPC on.
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Sets the port to serve the metrics on, if any.
    pub fn with_metrics_port(mut self, port: Option<u16>) -> Self {
        self.server.metrics_port = port.or(self.server.metrics_port);
        self
    }

    /// Sets the maximum number of concurrent connections the server can handle.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.server.max_connections = max_connections;
        self
    }

    /// Set the chains.
    pub fn with_chains(self, chains: BTreeMap<Caip2ChainId, ChainConfig>) -> Self {
        Self { chains, ..self }
    }

    /// Sets the RPC endpoints of the given chains, adding chains that are not configured yet.
    pub fn with_endpoints(mut self, endpoints: &[(Caip2ChainId, Url)]) -> Self {
        for (chain, endpoint) in endpoints {
            if !chain.is_eip155() {
                warn!(%chain, "only eip155 chains can broadcast transactions");
            }
            self.chains
                .entry(chain.clone())
                .and_modify(|config| config.endpoint = endpoint.clone())
                .or_insert_with(|| ChainConfig::new(None, endpoint.clone()));
        }
        self
    }

    /// Sets the path of the file-backed secret storage.
    pub fn with_keystore_path(mut self, path: Option<PathBuf>) -> Self {
        self.keystore.path = path.or(self.keystore.path);
        self
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_reader(&file)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address to serve the RPC on.
    pub address: IpAddr,
    /// The port to serve the RPC on.
    pub port: u16,
    /// The port to serve the metrics on. Metrics are disabled if unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,
    /// The maximum number of concurrent connections the server can handle.
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_RPC_PORT,
            metrics_port: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Secret storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreConfig {
    /// Path of the secrets file. Secrets are kept in memory if unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl KeystoreConfig {
    /// Opens the configured secret storage.
    pub fn open(&self) -> SecretStorage {
        match &self.path {
            Some(path) => {
                info!(path = %path.display(), "Using file-backed secret storage.");
                SecretStorage::file(path)
            }
            None => {
                warn!("Using in-memory secret storage. The wallet will not survive a restart.");
                SecretStorage::in_memory()
            }
        }
    }
}
