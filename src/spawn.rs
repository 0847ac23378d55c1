//! Wallet spawn utilities.
use crate::{
    chains::Chains,
    cli::Args,
    config::WalletConfig,
    dispatcher::Dispatcher,
    keystore::{LoadedWallet, import_mnemonic, load_or_create_wallet},
    metrics::{self, RpcMetricsService},
    rpc::{Wallet, WalletApiServer},
    service::{WalletService, WalletServiceHandle},
    signers::WalletSigner,
    storage::SecretStorage,
};
use alloy::primitives::Address;
use jsonrpsee::server::{
    RpcServiceBuilder, Server, ServerHandle, middleware::http::ProxyGetRequestLayer,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, path::Path, sync::Arc};
use tower::ServiceBuilder;
use tracing::info;

/// Context returned once the wallet is launched.
#[derive(Debug, Clone)]
pub struct WalletHandle {
    /// The socket address to which the server is bound.
    pub local_addr: SocketAddr,
    /// Handle to RPC server.
    pub server: ServerHandle,
    /// Handle to the wallet service.
    pub service: WalletServiceHandle,
    /// Secret storage holding the recovery phrase.
    pub storage: SecretStorage,
    /// Address of the wallet account.
    pub address: Address,
    /// Metrics collector handle, if metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl WalletHandle {
    /// Returns the url to the http server
    pub fn http_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }
}

/// Attempts to spawn the wallet service using CLI arguments and a configuration file.
///
/// If the configuration file is missing, it is created from defaults merged with the arguments.
/// A recovery phrase passed on the command line replaces the stored one.
pub async fn try_spawn_with_args<P: AsRef<Path>>(
    args: Args,
    config_path: P,
) -> eyre::Result<WalletHandle> {
    let config = if !config_path.as_ref().exists() {
        let config = args.merge_wallet_config(WalletConfig::default());
        config.save_to_file(&config_path)?;
        config
    } else {
        // File exists: load and override with CLI values.
        args.merge_wallet_config(WalletConfig::load_from_file(&config_path)?)
    };

    let storage = config.keystore.open();
    if let Some(phrase) = &args.mnemonic {
        import_mnemonic(&storage, phrase).await?;
    }

    try_spawn_with_storage(config, storage).await
}

/// Spawns the wallet service using the provided [`WalletConfig`].
pub async fn try_spawn(config: WalletConfig) -> eyre::Result<WalletHandle> {
    let storage = config.keystore.open();
    try_spawn_with_storage(config, storage).await
}

/// Spawns the wallet service using the provided [`WalletConfig`] and [`SecretStorage`].
pub async fn try_spawn_with_storage(
    config: WalletConfig,
    storage: SecretStorage,
) -> eyre::Result<WalletHandle> {
    // setup metrics exporter
    let metrics = config
        .server
        .metrics_port
        .map(|port| metrics::setup_exporter((config.server.address, port)))
        .transpose()?;

    let LoadedWallet { wallet, created } = load_or_create_wallet(&storage).await?;
    let address = wallet.address();

    let chains = Chains::new(config.chains);
    for (chain, chain_config) in chains.iter() {
        info!(%chain, endpoint = %chain_config.endpoint, "Configured chain");
    }

    let wallet: Arc<dyn WalletSigner> = Arc::new(wallet);
    let service = WalletService::spawn(Dispatcher::new(Some(wallet), chains));
    let rpc = Wallet::new(service.clone()).into_rpc();

    // start server
    let server = Server::builder()
        .http_only()
        .max_connections(config.server.max_connections)
        .set_http_middleware(
            ServiceBuilder::new().layer(ProxyGetRequestLayer::new("/health", "health")?),
        )
        .set_rpc_middleware(RpcServiceBuilder::new().layer_fn(RpcMetricsService::new))
        .build((config.server.address, config.server.port))
        .await?;
    let addr = server.local_addr()?;
    info!(%addr, "Started wallet service");
    info!(%address, created, "Wallet account");

    Ok(WalletHandle {
        local_addr: addr,
        server: server.start(rpc),
        service,
        storage,
        address,
        metrics,
    })
}
