//! Session request and response envelopes.

use super::Caip2ChainId;
use crate::error::RequestError;
use jsonrpsee::types::{ErrorObjectOwned, TwoPointZero};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A signing request delivered by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    /// Request id, echoed in the response.
    pub id: u64,
    /// JSON-RPC method name, e.g. `personal_sign`.
    pub method: String,
    /// Positional params.
    #[serde(default)]
    pub params: Vec<Value>,
    /// Chain the dapp addressed the request to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Caip2ChainId>,
}

impl SigningRequest {
    /// Creates a new request without a chain.
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self { id, method: method.into(), params, chain_id: None }
    }

    /// Sets the chain of the request.
    pub fn with_chain_id(mut self, chain_id: Caip2ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }
}

/// A JSON-RPC 2.0 response to a [`SigningRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SigningResponse {
    /// The request failed.
    Error {
        /// Id of the request.
        id: u64,
        /// Always `"2.0"`.
        jsonrpc: TwoPointZero,
        /// Error code and message.
        error: ErrorObjectOwned,
    },
    /// The request succeeded.
    Result {
        /// Id of the request.
        id: u64,
        /// Always `"2.0"`.
        jsonrpc: TwoPointZero,
        /// The signature, signed transaction or transaction hash.
        result: Value,
    },
}

impl SigningResponse {
    /// A successful response.
    pub fn result(id: u64, result: impl Into<Value>) -> Self {
        Self::Result { id, jsonrpc: TwoPointZero, result: result.into() }
    }

    /// A failed response.
    pub fn error(id: u64, error: RequestError) -> Self {
        Self::Error { id, jsonrpc: TwoPointZero, error: error.into() }
    }

    /// Id of the request this responds to.
    pub const fn id(&self) -> u64 {
        match self {
            Self::Error { id, .. } | Self::Result { id, .. } => *id,
        }
    }

    /// Whether this is an error response.
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The result payload, if successful.
    pub const fn as_result(&self) -> Option<&Value> {
        match self {
            Self::Result { result, .. } => Some(result),
            Self::Error { .. } => None,
        }
    }

    /// The error object, if failed.
    pub const fn as_error(&self) -> Option<&ErrorObjectOwned> {
        match self {
            Self::Error { error, .. } => Some(error),
            Self::Result { .. } => None,
        }
    }
}
