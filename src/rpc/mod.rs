//! RPC modules.

mod wallet;

pub use wallet::*;
