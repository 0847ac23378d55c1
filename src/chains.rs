//! Chain registry mapping CAIP-2 ids to RPC endpoints.

use crate::{error::RequestError, types::Caip2ChainId};
use alloy::primitives::ChainId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// A single configured chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Human readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// JSON-RPC endpoint used to broadcast transactions.
    pub endpoint: Url,
}

impl ChainConfig {
    /// Creates a new [`ChainConfig`].
    pub fn new(name: Option<&str>, endpoint: Url) -> Self {
        Self { name: name.map(str::to_string), endpoint }
    }
}

/// Built-in chains: Ethereum, Optimism, Polygon and Avalanche C-Chain mainnets.
pub fn default_chains() -> BTreeMap<Caip2ChainId, ChainConfig> {
    [
        (1, "Ethereum", "https://cloudflare-eth.com/"),
        (10, "Optimism", "https://mainnet.optimism.io"),
        (137, "Polygon", "https://polygon-rpc.com/"),
        (43114, "Avalanche C-Chain", "https://api.avax.network/ext/bc/C/rpc"),
    ]
    .into_iter()
    .filter_map(|(id, name, endpoint)| {
        Some((Caip2ChainId::eip155(id), ChainConfig::new(Some(name), endpoint.parse().ok()?)))
    })
    .collect()
}

/// The chains the wallet can broadcast to.
#[derive(Debug, Clone, Default)]
pub struct Chains {
    chains: BTreeMap<Caip2ChainId, ChainConfig>,
}

impl Chains {
    /// Creates a new instance of [`Chains`].
    pub fn new(chains: BTreeMap<Caip2ChainId, ChainConfig>) -> Self {
        Self { chains }
    }

    /// Get a configured chain.
    pub fn get(&self, chain: &Caip2ChainId) -> Option<&ChainConfig> {
        self.chains.get(chain)
    }

    /// Iterator over configured chains.
    pub fn iter(&self) -> impl Iterator<Item = (&Caip2ChainId, &ChainConfig)> {
        self.chains.iter()
    }

    /// Number of configured chains.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Whether no chain is configured.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Resolves the numeric chain id and RPC endpoint for `chain`.
    ///
    /// Fails with [`RequestError::UnsupportedChain`] if no chain is given, the chain is not an
    /// `eip155` chain, or it has no configured endpoint.
    pub fn rpc_endpoint(
        &self,
        chain: Option<&Caip2ChainId>,
    ) -> Result<(ChainId, Url), RequestError> {
        let unsupported = || RequestError::UnsupportedChain(chain.cloned());

        let chain = chain.ok_or_else(unsupported)?;
        let chain_id = chain.eip155_id().ok_or_else(unsupported)?;
        let config = self.chains.get(chain).ok_or_else(unsupported)?;

        Ok((chain_id, config.endpoint.clone()))
    }
}

impl FromIterator<(Caip2ChainId, ChainConfig)> for Chains {
    fn from_iter<T: IntoIterator<Item = (Caip2ChainId, ChainConfig)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
