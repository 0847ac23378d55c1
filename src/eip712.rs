//! EIP-712 related helpers.

use alloy::dyn_abi::TypedData;
use serde::de::Error as _;
use serde_json::Value;

/// The name of the domain type in an EIP-712 type table.
pub const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";

/// Parses typed data as sent by dapps in `eth_signTypedData*` params.
///
/// The payload may be a JSON string or an already-decoded object. The `EIP712Domain` entry is
/// removed from the type table, since the domain separator is computed from the domain itself.
pub fn parse_typed_data(raw: &Value) -> serde_json::Result<TypedData> {
    let mut data = match raw {
        Value::String(s) => serde_json::from_str::<Value>(s)?,
        Value::Object(_) => raw.clone(),
        other => {
            return Err(serde_json::Error::custom(format!(
                "expected typed data as a string or object, got {other}"
            )));
        }
    };

    strip_domain_type(&mut data);
    serde_json::from_value(data)
}

/// Removes the `EIP712Domain` entry from the `types` table of a typed-data payload.
///
/// Returns `true` if an entry was removed.
pub fn strip_domain_type(data: &mut Value) -> bool {
    data.get_mut("types")
        .and_then(Value::as_object_mut)
        .is_some_and(|types| types.remove(EIP712_DOMAIN_TYPE).is_some())
}
