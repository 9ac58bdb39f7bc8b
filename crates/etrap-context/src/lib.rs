//! The orchestrator's (C9) owned state: configuration plus the broker,
//! object-store, and anchor clients, wired once at startup and passed
//! by reference into task functions — no ambient singletons, grounded
//! on the teacher's `RelayerContext` (`ctx.evm_provider(..)`,
//! `ctx.shutdown_signal()`).

use std::sync::Arc;

use etrap_anchor::AnchorClient;
use etrap_config::AgentConfig;
use etrap_objectstore::ObjectStore;
use etrap_stream::StreamBroker;
use etrap_utils::metric::Metrics;

pub struct AgentContext {
    pub config: AgentConfig,
    pub broker: Arc<dyn StreamBroker>,
    pub object_store: Arc<dyn ObjectStore>,
    pub anchor: Arc<dyn AnchorClient>,
    pub metrics: Arc<Metrics>,
    shutdown_tx: tokio::sync::broadcast::Sender<()>,
}

impl AgentContext {
    /// Assembles a context around already-constructed clients. Tests and
    /// the fake end-to-end harness use this directly with in-memory
    /// fakes; [`AgentContext::connect`] is the production path.
    pub fn new(
        config: AgentConfig,
        broker: Arc<dyn StreamBroker>,
        object_store: Arc<dyn ObjectStore>,
        anchor: Arc<dyn AnchorClient>,
    ) -> Self {
        let (shutdown_tx, _) = tokio::sync::broadcast::channel(1);
        Self {
            config,
            broker,
            object_store,
            anchor,
            metrics: Arc::new(Metrics::default()),
            shutdown_tx,
        }
    }

    /// Connects the real transports named by `config` (§6): Redis
    /// Streams, an S3-compatible object store, and an EVM contract
    /// signer, exactly the set of clients `service::ignite` builds
    /// before wiring watcher tasks in the teacher.
    pub async fn connect(config: AgentConfig) -> etrap_utils::Result<Self> {
        let broker = etrap_stream::RedisBroker::connect(
            &config.broker.host,
            config.broker.port,
            config.broker.password.as_deref(),
        )
        .await?;

        let object_store =
            etrap_objectstore::S3ObjectStore::connect(&config.object_store.region).await;
        object_store.ensure_bucket(&config.object_store.bucket).await?;

        let contract_address: ethereum_types::Address = config
            .anchor
            .contract_address
            .parse()
            .map_err(|e| etrap_utils::Error::ConfigurationError(format!("invalid contract_address: {e}")))?;
        let signer_key = std::fs::read_to_string(&config.anchor.credential_path)
            .map_err(|e| {
                etrap_utils::Error::ConfigurationError(format!(
                    "cannot read credential_path {}: {e}",
                    config.anchor.credential_path
                ))
            })?;
        let anchor = etrap_anchor::EvmAnchorClient::connect(
            config.anchor.rpc_url(),
            contract_address,
            signer_key.trim(),
            config.anchor.chain_id,
        )
        .await
        .map_err(|e| etrap_utils::Error::ConfigurationError(e.to_string()))?;

        Ok(Self::new(
            config,
            Arc::new(broker),
            Arc::new(object_store),
            Arc::new(anchor),
        ))
    }

    /// A fresh receiver on the shutdown broadcast; every long-running
    /// task subscribes once at spawn time (teacher:
    /// `RelayerContext::shutdown_signal()`).
    pub fn shutdown_signal(&self) -> tokio::sync::broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Broadcasts shutdown to every subscriber. Idempotent: a second
    /// call is a no-op once there are no receivers left, per
    /// `broadcast::Sender::send`'s semantics.
    pub fn trigger_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
