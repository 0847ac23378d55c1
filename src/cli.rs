//! # Wallet CLI
use crate::{
    config::WalletConfig,
    constants::{DEFAULT_CONFIG_PATH, DEFAULT_MAX_CONNECTIONS, DEFAULT_RPC_PORT},
    spawn::try_spawn_with_args,
    types::Caip2ChainId,
};
use clap::Parser;
use eyre::OptionExt;
use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
};
use url::Url;

/// A wallet daemon answering session signing requests and payment actions.
#[derive(Parser)]
#[command(author, about = "Wallet", long_about = None)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, a default one will be used and stored under the given path.
    #[arg(long, value_name = "CONFIG", env = "WALLETKIT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// The address to serve the RPC on.
    #[arg(long = "http.addr", value_name = "ADDR", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub address: IpAddr,
    /// The port to serve the RPC on.
    #[arg(long = "http.port", value_name = "PORT", default_value_t = DEFAULT_RPC_PORT)]
    pub port: u16,
    /// The port to serve the metrics on.
    #[arg(long = "http.metrics-port", value_name = "PORT")]
    pub metrics_port: Option<u16>,
    /// The maximum number of concurrent connections the server can handle.
    #[arg(long = "http.max-connections", value_name = "COUNT", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
    /// Path of the secrets file holding the recovery phrase.
    ///
    /// Without it, the phrase is only kept in memory.
    #[arg(long = "keystore", value_name = "PATH")]
    pub keystore: Option<PathBuf>,
    /// A recovery phrase to import, replacing any stored one.
    #[arg(long, value_name = "PHRASE", env = "WALLETKIT_MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,
    /// The RPC endpoint of a chain, as `<caip2>=<url>`, e.g. `eip155:1=https://eth.llamarpc.com`.
    #[arg(long = "endpoint", value_name = "CHAIN=RPC_ENDPOINT", value_parser = parse_chain_url)]
    pub endpoints: Vec<(Caip2ChainId, Url)>,
}

impl Args {
    /// Run the wallet service.
    pub async fn run(self) -> eyre::Result<()> {
        let config_path = self.config.clone();
        try_spawn_with_args(self, &config_path).await?.server.stopped().await;

        Ok(())
    }

    /// Merges [`Args`] values into an existing [`WalletConfig`] instance.
    pub fn merge_wallet_config(&self, config: WalletConfig) -> WalletConfig {
        config
            .with_endpoints(&self.endpoints)
            .with_address(self.address)
            .with_port(self.port)
            .with_metrics_port(self.metrics_port)
            .with_max_connections(self.max_connections)
            .with_keystore_path(self.keystore.clone())
    }
}

/// Parses a `<caip2>=<url>` pair.
fn parse_chain_url(arg: &str) -> eyre::Result<(Caip2ChainId, Url)> {
    let (chain, url) = arg.split_once('=').ok_or_eyre("expected chain=url argument")?;

    Ok((chain.parse()?, url.parse()?))
}
