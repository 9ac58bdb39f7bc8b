//! C8: calls the blockchain contract's idempotent `mint_batch` endpoint
//! with retry/backoff (§4.8).

mod client;
mod evm;
mod fake;
mod outcome;
mod retry;
mod types;

pub use client::AnchorClient;
pub use evm::EvmAnchorClient;
pub use fake::FakeAnchorClient;
pub use outcome::MintOutcome;
pub use retry::mint_with_retry;
pub use types::{BatchSummary, TokenMetadata};
