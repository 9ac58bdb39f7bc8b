use std::sync::Arc;

use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::middleware::SignerMiddleware;
use ethers::prelude::LocalWallet;
use ethers::providers::{Http, Provider};
use ethers::signers::Signer;
use ethers::types::Address;

use crate::client::AnchorClient;
use crate::outcome::MintOutcome;
use crate::types::{BatchSummary, TokenMetadata};

abigen!(
    BatchAnchor,
    r#"[
        function mintBatch(string tokenId, address owner, string tokenURI, string merkleRoot) external payable returns (uint256)
    ]"#
);

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Production [`AnchorClient`] calling `mint_batch` on an EVM contract
/// through `ethers` (§4.8). `blockchain_network` selects which RPC
/// endpoint a caller constructs this with — testnet or mainnet — the
/// same way the teacher's per-chain config picks an `http_endpoint`.
pub struct EvmAnchorClient {
    contract: BatchAnchor<SignerClient>,
}

impl EvmAnchorClient {
    pub async fn connect(
        rpc_url: &str,
        contract_address: Address,
        signer_key: &str,
        chain_id: u64,
    ) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?;
        let wallet: LocalWallet = signer_key.parse::<LocalWallet>()?.with_chain_id(chain_id);
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        Ok(Self {
            contract: BatchAnchor::new(contract_address, client),
        })
    }
}

#[async_trait]
impl AnchorClient for EvmAnchorClient {
    async fn mint_batch(
        &self,
        token_id: &str,
        owner: &str,
        metadata: &TokenMetadata,
        summary: &BatchSummary,
    ) -> anyhow::Result<MintOutcome> {
        let owner: Address = owner.parse()?;
        let token_uri = metadata.reference_url.clone();
        let call = self.contract.mint_batch(
            token_id.to_string(),
            owner,
            token_uri,
            summary.merkle_root.clone(),
        );
        let send_result = call.send().await;
        let pending = match send_result {
            Ok(pending) => pending,
            Err(e) => {
                // The contract's idempotency signal: a duplicate
                // `token_id` reverts with a recognizable reason string
                // rather than succeeding a second time (§4.8).
                return if e.to_string().to_lowercase().contains("already minted") {
                    Ok(MintOutcome::AlreadyExists)
                } else {
                    Err(e.into())
                };
            }
        };
        let receipt = pending.await?;
        let tx_hash = receipt
            .map(|r| format!("{:#x}", r.transaction_hash))
            .unwrap_or_default();
        Ok(MintOutcome::Minted { tx_hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assumes a local devnet (e.g. `anvil`) on `localhost:8545` with the
    /// `BatchAnchor` contract already deployed at `ETRAP_TEST_CONTRACT`,
    /// signed by anvil's default account 0.
    #[tokio::test]
    #[ignore = "needs evm node"]
    async fn connects_and_mints_against_a_real_node() {
        let contract_address: Address = std::env::var("ETRAP_TEST_CONTRACT")
            .expect("ETRAP_TEST_CONTRACT must name a deployed BatchAnchor contract")
            .parse()
            .unwrap();
        let signer_key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let client = EvmAnchorClient::connect("http://localhost:8545", contract_address, signer_key, 31337)
            .await
            .unwrap();

        let metadata = TokenMetadata {
            title: "integration test batch".to_string(),
            description: "d".to_string(),
            reference_url: "https://example.com/batch-data.json".to_string(),
        };
        let summary = BatchSummary {
            database_name: "shop".to_string(),
            table_names: vec!["orders".to_string()],
            timestamp: 0,
            tx_count: 1,
            merkle_root: "root".to_string(),
            object_store_bucket: "bucket".to_string(),
            object_store_key_prefix: "shop/orders/x".to_string(),
        };
        let owner = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
        let outcome = client
            .mint_batch("integration-test-token", owner, &metadata, &summary)
            .await
            .unwrap();
        assert!(matches!(outcome, MintOutcome::Minted { .. }));
    }
}
