use serde::{Deserialize, Serialize};

/// A signing action issued by the payment service.
///
/// `params` is a JSON-encoded array of positional params for `method`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAction {
    /// CAIP-2 chain id the action targets. Informational only.
    pub chain_id: String,
    /// Signing method, e.g. `eth_signTypedData_v4`.
    pub method: String,
    /// JSON-encoded params array.
    pub params: String,
}

impl PaymentAction {
    /// Creates a new action.
    pub fn new(
        chain_id: impl Into<String>,
        method: impl Into<String>,
        params: impl Into<String>,
    ) -> Self {
        Self { chain_id: chain_id.into(), method: method.into(), params: params.into() }
    }
}
