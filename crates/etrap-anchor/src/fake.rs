use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::AnchorClient;
use crate::outcome::MintOutcome;
use crate::types::{BatchSummary, TokenMetadata};

#[derive(Default)]
struct State {
    attempts: HashMap<String, u32>,
    fail_remaining: HashMap<String, u32>,
    already_minted: std::collections::HashSet<String>,
}

/// An in-process [`AnchorClient`] for tests: tracks attempt counts per
/// `token_id` and lets a test script transient failures or simulate a
/// prior mint via [`FakeAnchorClient::mark_already_minted`].
#[derive(Default)]
pub struct FakeAnchorClient {
    state: Mutex<State>,
}

impl FakeAnchorClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, token_id: &str, count: u32) {
        self.state
            .lock()
            .unwrap()
            .fail_remaining
            .insert(token_id.to_string(), count);
    }

    pub fn mark_already_minted(&self, token_id: &str) {
        self.state
            .lock()
            .unwrap()
            .already_minted
            .insert(token_id.to_string());
    }

    pub fn attempts(&self, token_id: &str) -> u32 {
        self.state
            .lock()
            .unwrap()
            .attempts
            .get(token_id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl AnchorClient for FakeAnchorClient {
    async fn mint_batch(
        &self,
        token_id: &str,
        _owner: &str,
        _metadata: &TokenMetadata,
        _summary: &BatchSummary,
    ) -> anyhow::Result<MintOutcome> {
        let mut state = self.state.lock().unwrap();
        *state.attempts.entry(token_id.to_string()).or_insert(0) += 1;

        if state.already_minted.contains(token_id) {
            return Ok(MintOutcome::AlreadyExists);
        }
        if let Some(remaining) = state.fail_remaining.get_mut(token_id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(anyhow::anyhow!("simulated mint failure"));
            }
        }
        state.already_minted.insert(token_id.to_string());
        Ok(MintOutcome::Minted {
            tx_hash: format!("0xfake-{token_id}"),
        })
    }
}
