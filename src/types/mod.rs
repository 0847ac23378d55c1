//! Shared primitive types.
mod caip;
pub use caip::*;

mod method;
pub use method::*;

mod payment;
pub use payment::*;

mod request;
pub use request::*;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Response of `wallet_health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Always `"ok"` while the service is running.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Address of the loaded account, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}
