//! # walletkit
//!
//! Wallet-side handling of session signing requests and payment actions for EVM accounts.
//!
//! - [`dispatcher`] turns `personal_sign`, `eth_signTypedData*` and transaction requests into
//!   JSON-RPC responses.
//! - [`pay`] signs the actions of a payment, in order.
//! - [`keystore`] restores the account from secret storage or creates one.

pub mod chains;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod eip712;
pub mod error;
pub mod keystore;
pub mod metrics;
pub mod pay;
pub mod rpc;
pub mod service;
pub mod signers;
pub mod spawn;
pub mod storage;
pub mod types;
pub mod version;
