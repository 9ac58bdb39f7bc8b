/// The result of a single `mint_batch` call. `AlreadyExists` is the
/// contract's idempotent-replay signal (§4.8) and is treated as success
/// by the retry wrapper, not as a failure to retry past.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintOutcome {
    Minted { tx_hash: String },
    AlreadyExists,
}
