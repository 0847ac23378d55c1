//! [CAIP-2](https://chainagnostic.org/CAIPs/caip-2) chain identifiers.

use alloy::primitives::ChainId;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{fmt, str::FromStr};

/// The CAIP-2 namespace of EVM chains.
pub const EIP155_NAMESPACE: &str = "eip155";

/// Errors parsing a [`Caip2ChainId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Caip2Error {
    /// No `:` separator.
    #[error("chain id `{0}` is not of the form namespace:reference")]
    MissingSeparator(String),
    /// The namespace is not 3-8 characters of `[-a-z0-9]`.
    #[error("invalid CAIP-2 namespace `{0}`")]
    InvalidNamespace(String),
    /// The reference is not 1-32 characters of `[-_a-zA-Z0-9]`.
    #[error("invalid CAIP-2 reference `{0}`")]
    InvalidReference(String),
}

/// A chain identifier such as `eip155:1`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct Caip2ChainId {
    namespace: String,
    reference: String,
}

impl Caip2ChainId {
    /// The `eip155` identifier of an EVM chain.
    pub fn eip155(chain_id: ChainId) -> Self {
        Self { namespace: EIP155_NAMESPACE.to_string(), reference: chain_id.to_string() }
    }

    /// The namespace, e.g. `eip155`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The chain reference within the namespace, e.g. `1`.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Whether this identifies an EVM chain.
    pub fn is_eip155(&self) -> bool {
        self.namespace == EIP155_NAMESPACE
    }

    /// The numeric chain id, for `eip155` identifiers with a decimal reference.
    pub fn eip155_id(&self) -> Option<ChainId> {
        self.is_eip155().then(|| self.reference.parse().ok()).flatten()
    }
}

impl fmt::Display for Caip2ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

impl FromStr for Caip2ChainId {
    type Err = Caip2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, reference) =
            s.split_once(':').ok_or_else(|| Caip2Error::MissingSeparator(s.to_string()))?;

        if !(3..=8).contains(&namespace.len())
            || !namespace.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(Caip2Error::InvalidNamespace(namespace.to_string()));
        }

        if !(1..=32).contains(&reference.len())
            || !reference.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(Caip2Error::InvalidReference(reference.to_string()));
        }

        Ok(Self { namespace: namespace.to_string(), reference: reference.to_string() })
    }
}

impl From<ChainId> for Caip2ChainId {
    fn from(chain_id: ChainId) -> Self {
        Self::eip155(chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_eip155() {
        let chain: Caip2ChainId = "eip155:8453".parse().unwrap();
        assert_eq!(chain.namespace(), "eip155");
        assert_eq!(chain.reference(), "8453");
        assert_eq!(chain.eip155_id(), Some(8453));
        assert_eq!(chain, Caip2ChainId::eip155(8453));
        assert_eq!(chain.to_string(), "eip155:8453");
    }

    #[test]
    fn parse_other_namespaces() {
        let chain: Caip2ChainId = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp".parse().unwrap();
        assert!(!chain.is_eip155());
        assert_eq!(chain.eip155_id(), None);
    }

    #[test]
    fn reject_malformed() {
        assert!(matches!("eip155".parse::<Caip2ChainId>(), Err(Caip2Error::MissingSeparator(_))));
        assert!(matches!("EIP155:1".parse::<Caip2ChainId>(), Err(Caip2Error::InvalidNamespace(_))));
        assert!(matches!("ab:1".parse::<Caip2ChainId>(), Err(Caip2Error::InvalidNamespace(_))));
        assert!(matches!("eip155:".parse::<Caip2ChainId>(), Err(Caip2Error::InvalidReference(_))));
        assert!(matches!(
            "eip155:1:2".parse::<Caip2ChainId>(),
            Err(Caip2Error::InvalidReference(_))
        ));
    }

    #[test]
    fn serde_as_string() {
        let chain = Caip2ChainId::eip155(10);
        assert_eq!(serde_json::to_string(&chain).unwrap(), "\"eip155:10\"");
        assert_eq!(serde_json::from_str::<Caip2ChainId>("\"eip155:10\"").unwrap(), chain);
    }
}
