//! Signing methods and their decoded params.

use crate::{eip712::parse_typed_data, error::RequestError};
use alloy::{dyn_abi::TypedData, rpc::types::TransactionRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

/// JSON-RPC signing methods understood by the wallet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
pub enum SigningMethod {
    /// `eth_sign`: `[address, message]`. Always refused.
    #[strum(serialize = "eth_sign")]
    #[serde(rename = "eth_sign")]
    EthSign,
    /// `personal_sign`: `[message, address]`.
    #[strum(serialize = "personal_sign")]
    #[serde(rename = "personal_sign")]
    PersonalSign,
    /// `eth_signTypedData`: `[address, typedData]`.
    #[strum(serialize = "eth_signTypedData")]
    #[serde(rename = "eth_signTypedData")]
    EthSignTypedData,
    /// `eth_signTypedData_v3`: `[address, typedData]`.
    #[strum(serialize = "eth_signTypedData_v3")]
    #[serde(rename = "eth_signTypedData_v3")]
    EthSignTypedDataV3,
    /// `eth_signTypedData_v4`: `[address, typedData]`.
    #[strum(serialize = "eth_signTypedData_v4")]
    #[serde(rename = "eth_signTypedData_v4")]
    EthSignTypedDataV4,
    /// `eth_signTransaction`: `[tx]`.
    #[strum(serialize = "eth_signTransaction")]
    #[serde(rename = "eth_signTransaction")]
    EthSignTransaction,
    /// `eth_sendTransaction`: `[tx]`.
    #[strum(serialize = "eth_sendTransaction")]
    #[serde(rename = "eth_sendTransaction")]
    EthSendTransaction,
}

impl SigningMethod {
    /// Whether this is one of the `eth_signTypedData` variants.
    pub const fn is_typed_data(&self) -> bool {
        matches!(self, Self::EthSignTypedData | Self::EthSignTypedDataV3 | Self::EthSignTypedDataV4)
    }
}

/// A signing request decoded into the shape its method expects.
#[derive(Debug, Clone)]
pub enum SigningCall {
    /// `eth_sign`. Params are not inspected.
    EthSign,
    /// Sign a personal message.
    PersonalSign {
        /// The message, either plain text or `0x`-prefixed hex.
        message: String,
    },
    /// Sign EIP-712 typed data.
    SignTypedData(Box<TypedData>),
    /// Sign a transaction without broadcasting it.
    SignTransaction(Box<TransactionRequest>),
    /// Sign and broadcast a transaction.
    SendTransaction(Box<TransactionRequest>),
}

impl SigningCall {
    /// Decodes positional params for `method`.
    ///
    /// Malformed params are rejected with [`RequestError::InvalidParams`].
    pub fn decode(method: SigningMethod, params: &[Value]) -> Result<Self, RequestError> {
        match method {
            SigningMethod::EthSign => Ok(Self::EthSign),
            SigningMethod::PersonalSign => Ok(Self::PersonalSign { message: message(params)? }),
            SigningMethod::EthSignTypedData
            | SigningMethod::EthSignTypedDataV3
            | SigningMethod::EthSignTypedDataV4 => {
                Ok(Self::SignTypedData(Box::new(typed_data(params)?)))
            }
            SigningMethod::EthSignTransaction => {
                Ok(Self::SignTransaction(Box::new(transaction(params)?)))
            }
            SigningMethod::EthSendTransaction => {
                Ok(Self::SendTransaction(Box::new(transaction(params)?)))
            }
        }
    }
}

/// `params[0]` as a message string.
fn message(params: &[Value]) -> Result<String, RequestError> {
    params
        .first()
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| RequestError::InvalidParams("expected a message string at params[0]".into()))
}

/// `params[1]` as typed data.
fn typed_data(params: &[Value]) -> Result<TypedData, RequestError> {
    let raw = params
        .get(1)
        .ok_or_else(|| RequestError::InvalidParams("expected typed data at params[1]".into()))?;
    parse_typed_data(raw)
        .map_err(|err| RequestError::InvalidParams(format!("Invalid typed data format: {err}")))
}

/// `params[0]` as a transaction request.
fn transaction(params: &[Value]) -> Result<TransactionRequest, RequestError> {
    let raw = params
        .first()
        .ok_or_else(|| RequestError::InvalidParams("expected a transaction at params[0]".into()))?;
    serde_json::from_value(raw.clone())
        .map_err(|err| RequestError::InvalidParams(format!("invalid transaction: {err}")))
}
