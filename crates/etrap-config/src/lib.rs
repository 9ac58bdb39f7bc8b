//! §6 configuration schema: every option the core recognizes, loaded
//! from a layered TOML file with `ETRAP_`-prefixed environment overrides
//! (the `config` crate, the same layering style as the teacher's
//! `WebbRelayerConfig`). A local `.env` is read by the binary before
//! loading so development credentials don't need to be exported by hand.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// `blockchain_network` selects the JSON-RPC endpoint (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockchainNetwork {
    Testnet,
    Mainnet,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatcherSettings {
    pub max_batch_size: usize,
    pub min_batch_size: usize,
    pub idle_timeout_secs: u64,
    pub force_seal_after_secs: u64,
}

impl BatcherSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn force_seal_after(&self) -> Duration {
        Duration::from_secs(self.force_seal_after_secs)
    }

    pub fn to_batcher_config(&self) -> etrap_batcher::BatcherConfig {
        etrap_batcher::BatcherConfig {
            max_batch_size: self.max_batch_size,
            min_batch_size: self.min_batch_size,
            idle_timeout: self.idle_timeout(),
            force_seal_after: self.force_seal_after(),
        }
    }
}

impl Default for BatcherSettings {
    fn default() -> Self {
        let defaults = etrap_batcher::BatcherConfig::default();
        Self {
            max_batch_size: defaults.max_batch_size,
            min_batch_size: defaults.min_batch_size,
            idle_timeout_secs: defaults.idle_timeout.as_secs(),
            force_seal_after_secs: defaults.force_seal_after.as_secs(),
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct BrokerSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub stream_pattern: String,
    pub consumer_group: String,
    pub consumer_name: String,
}

impl std::fmt::Debug for BrokerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("stream_pattern", &self.stream_pattern)
            .field("consumer_group", &self.consumer_group)
            .field("consumer_name", &self.consumer_name)
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct ObjectStoreSettings {
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl std::fmt::Debug for ObjectStoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreSettings")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field(
                "access_key_id",
                &self.access_key_id.as_ref().map(|_| "<redacted>"),
            )
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct AnchorSettings {
    pub network: BlockchainNetwork,
    pub testnet_rpc_url: String,
    pub mainnet_rpc_url: String,
    pub account: String,
    pub credential_path: String,
    pub contract_address: String,
    pub chain_id: u64,
}

impl std::fmt::Debug for AnchorSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorSettings")
            .field("network", &self.network)
            .field("account", &self.account)
            .field("credential_path", &"<redacted>")
            .field("contract_address", &self.contract_address)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

impl AnchorSettings {
    pub fn rpc_url(&self) -> &str {
        match self.network {
            BlockchainNetwork::Testnet => &self.testnet_rpc_url,
            BlockchainNetwork::Mainnet => &self.mainnet_rpc_url,
        }
    }
}

/// Every option in §6, as one value an [`etrap_context::AgentContext`]
/// owns and task functions borrow from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    pub organization_id: String,
    pub broker: BrokerSettings,
    pub batcher: BatcherSettings,
    pub object_store: ObjectStoreSettings,
    pub anchor: AnchorSettings,
}

/// Loads the layered configuration: `path` (TOML, if present) overlaid
/// by `ETRAP__`-prefixed environment variables (double-underscore
/// separated throughout, e.g. `ETRAP__BROKER__HOST`), matching the
/// teacher's config-crate layering. Fails with `ConfigurationError`
/// (§7, fatal at startup) on any parse or validation error.
pub fn load(path: impl AsRef<Path>) -> etrap_utils::Result<AgentConfig> {
    let path = path.as_ref();
    let mut builder = config::Config::builder();
    if path.exists() {
        builder = builder.add_source(config::File::from(path));
    }
    builder = builder.add_source(
        config::Environment::with_prefix("ETRAP")
            .separator("__")
            .try_parsing(true),
    );
    let raw = builder
        .build()
        .map_err(|e| etrap_utils::Error::ConfigurationError(e.to_string()))?;
    raw.try_deserialize()
        .map_err(|e| etrap_utils::Error::ConfigurationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_toml() -> &'static str {
        r#"
organization_id = "org1"

[broker]
host = "localhost"
port = 6379
stream_pattern = "etrap.public.*"
consumer_group = "etrap-agent"
consumer_name = "agent-1"

[batcher]
max_batch_size = 500
min_batch_size = 1
idle_timeout_secs = 60
force_seal_after_secs = 300

[object_store]
bucket = "etrap-org1"
region = "us-east-1"

[anchor]
network = "testnet"
testnet_rpc_url = "https://testnet.example.com"
mainnet_rpc_url = "https://mainnet.example.com"
account = "0xabc"
credential_path = "/secrets/signer.key"
contract_address = "0x0000000000000000000000000000000000000001"
chain_id = 11155111
"#
    }

    #[test]
    fn loads_full_config_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(sample_toml().as_bytes()).unwrap();
        let config = load(file.path()).unwrap();
        assert_eq!(config.organization_id, "org1");
        assert_eq!(config.broker.port, 6379);
        assert_eq!(config.batcher.max_batch_size, 500);
        assert_eq!(config.anchor.network, BlockchainNetwork::Testnet);
        assert_eq!(config.anchor.rpc_url(), "https://testnet.example.com");
    }

    #[test]
    fn missing_file_without_env_overrides_is_a_configuration_error() {
        let err = load("/nonexistent/etrap-agent.toml").unwrap_err();
        assert!(matches!(err, etrap_utils::Error::ConfigurationError(_)));
    }

    #[test]
    fn env_overrides_take_precedence_over_the_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(sample_toml().as_bytes()).unwrap();
        std::env::set_var("ETRAP__BROKER__HOST", "redis.internal");
        let config = load(file.path()).unwrap();
        std::env::remove_var("ETRAP__BROKER__HOST");
        assert_eq!(config.broker.host, "redis.internal");
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(sample_toml().as_bytes()).unwrap();
        let config = load(file.path()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("/secrets/signer.key"));
    }
}
