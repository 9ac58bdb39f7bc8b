use std::time::Duration;

use crate::client::AnchorClient;
use crate::outcome::MintOutcome;
use crate::types::{BatchSummary, TokenMetadata};

const MAX_ATTEMPTS: u32 = 3;
const BACKOFFS_MS: [u64; MAX_ATTEMPTS as usize - 1] = [1_000, 2_000];

/// Drives [`AnchorClient::mint_batch`] through the §4.8 retry policy: up
/// to 3 attempts, backing off 1s then 2s between them (the third attempt
/// would back off 4s, but there is no fourth attempt to precede).
/// `MintOutcome::AlreadyExists` short-circuits as success on any attempt.
pub async fn mint_with_retry(
    client: &dyn AnchorClient,
    token_id: &str,
    owner: &str,
    metadata: &TokenMetadata,
    summary: &BatchSummary,
) -> etrap_utils::Result<MintOutcome> {
    let mut last_error = String::new();
    for attempt in 1..=MAX_ATTEMPTS {
        match client.mint_batch(token_id, owner, metadata, summary).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) => {
                last_error = e.to_string();
                tracing::warn!(token_id, attempt, error = %last_error, "mint attempt failed");
                if let Some(&delay_ms) = BACKOFFS_MS.get((attempt - 1) as usize) {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
    Err(etrap_utils::Error::MintFailed {
        batch_id: token_id
            .to_string()
            .try_into()
            .unwrap_or_else(|_| panic!("token_id {token_id} is not a valid batch id")),
        attempts: MAX_ATTEMPTS,
        reason: last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeAnchorClient;
    use etrap_types::BatchId;

    fn metadata() -> TokenMetadata {
        TokenMetadata {
            title: "batch".to_string(),
            description: "d".to_string(),
            reference_url: "https://example.com/batch-data.json".to_string(),
        }
    }

    fn summary() -> BatchSummary {
        BatchSummary {
            database_name: "shop".to_string(),
            table_names: vec!["orders".to_string()],
            timestamp: 0,
            tx_count: 1,
            merkle_root: "root".to_string(),
            object_store_bucket: "bucket".to_string(),
            object_store_key_prefix: "shop/orders/x".to_string(),
        }
    }

    #[tokio::test]
    async fn succeeds_on_first_attempt() {
        let client = FakeAnchorClient::new();
        let batch_id = BatchId::new("2025-06-14", 1, None);
        let outcome = mint_with_retry(&client, batch_id.as_str(), "owner", &metadata(), &summary())
            .await
            .unwrap();
        assert!(matches!(outcome, MintOutcome::Minted { .. }));
        assert_eq!(client.attempts(batch_id.as_str()), 1);
    }

    #[tokio::test]
    async fn retries_transient_failures_and_eventually_succeeds() {
        let client = FakeAnchorClient::new();
        let batch_id = BatchId::new("2025-06-14", 1, None);
        client.fail_next(batch_id.as_str(), 2);
        let outcome = mint_with_retry(&client, batch_id.as_str(), "owner", &metadata(), &summary())
            .await
            .unwrap();
        assert!(matches!(outcome, MintOutcome::Minted { .. }));
        assert_eq!(client.attempts(batch_id.as_str()), 3);
    }

    #[tokio::test]
    async fn gives_up_after_three_attempts() {
        let client = FakeAnchorClient::new();
        let batch_id = BatchId::new("2025-06-14", 1, None);
        client.fail_next(batch_id.as_str(), 10);
        let err = mint_with_retry(&client, batch_id.as_str(), "owner", &metadata(), &summary())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            etrap_utils::Error::MintFailed { attempts: 3, .. }
        ));
        assert_eq!(client.attempts(batch_id.as_str()), 3);
    }

    #[tokio::test]
    async fn already_exists_is_treated_as_success() {
        let client = FakeAnchorClient::new();
        let batch_id = BatchId::new("2025-06-14", 1, None);
        client.mark_already_minted(batch_id.as_str());
        let outcome = mint_with_retry(&client, batch_id.as_str(), "owner", &metadata(), &summary())
            .await
            .unwrap();
        assert_eq!(outcome, MintOutcome::AlreadyExists);
        assert_eq!(client.attempts(batch_id.as_str()), 1);
    }
}
