use async_trait::async_trait;

use crate::outcome::MintOutcome;
use crate::types::{BatchSummary, TokenMetadata};

/// C8's capability seam onto the blockchain contract (§4.8). A single
/// call; the retry/backoff policy lives in [`crate::retry::mint_with_retry`],
/// one layer up, so implementations stay a thin transport shim.
#[async_trait]
pub trait AnchorClient: Send + Sync {
    async fn mint_batch(
        &self,
        token_id: &str,
        owner: &str,
        metadata: &TokenMetadata,
        summary: &BatchSummary,
    ) -> anyhow::Result<MintOutcome>;
}
