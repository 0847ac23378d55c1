//! Payment-action signing.

mod link;
pub use link::{PAY_HOST, extract_payment_link, is_payment_link};

use crate::{
    eip712::parse_typed_data,
    error::PaymentError,
    signers::WalletSigner,
    types::{PaymentAction, SigningMethod},
};
use alloy::primitives::Bytes;
use metrics::counter;
use serde_json::Value;
use tracing::debug;

/// Signs `actions` in order, returning one signature per action.
///
/// Actions are signed one at a time. The first failure aborts the call and no signatures are
/// returned.
pub async fn sign_payment_actions(
    wallet: &dyn WalletSigner,
    actions: &[PaymentAction],
) -> Result<Vec<Bytes>, PaymentError> {
    let mut signatures = Vec::with_capacity(actions.len());

    for (index, action) in actions.iter().enumerate() {
        debug!(
            index,
            method = %action.method,
            chain_id = %action.chain_id,
            "signing payment action"
        );

        match sign_action(wallet, index, action).await {
            Ok(signature) => signatures.push(signature),
            Err(err) => {
                counter!("wallet.payment_actions", "outcome" => "error").increment(1);
                return Err(err);
            }
        }
    }

    counter!("wallet.payment_actions", "outcome" => "ok").increment(signatures.len() as u64);
    Ok(signatures)
}

async fn sign_action(
    wallet: &dyn WalletSigner,
    index: usize,
    action: &PaymentAction,
) -> Result<Bytes, PaymentError> {
    let params: Vec<Value> = serde_json::from_str(&action.params)
        .map_err(|err| PaymentError::InvalidParams { index, reason: err.to_string() })?;

    match action.method.parse::<SigningMethod>() {
        Ok(method) if method.is_typed_data() => {
            let raw = params.get(1).ok_or_else(|| PaymentError::InvalidParams {
                index,
                reason: "expected typed data at params[1]".into(),
            })?;
            let typed_data = parse_typed_data(raw)
                .map_err(|err| PaymentError::InvalidTypedData(err.to_string()))?;
            Ok(wallet.sign_typed_data(&typed_data).await?)
        }
        Ok(SigningMethod::PersonalSign) => {
            let message = params.first().and_then(Value::as_str).ok_or_else(|| {
                PaymentError::InvalidParams {
                    index,
                    reason: "expected a message string at params[0]".into(),
                }
            })?;
            Ok(wallet.sign_message(message).await?)
        }
        _ => Err(PaymentError::UnsupportedSigningMethod(action.method.clone())),
    }
}
