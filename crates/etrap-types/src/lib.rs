//! Shared data model for the etrap-agent CDC ingestion and anchoring
//! pipeline (ChangeEvent, Batch, Transaction, MerkleTree, Indices — §3).
//!
//! This crate is intentionally inert: it holds types and the small
//! amount of construction logic that belongs with them (envelope
//! parsing, id formatting, index building), not the algorithms that
//! operate over them. Canonicalization lives in `etrap-canonical`,
//! hashing and tree construction in `etrap-merkle`.

mod batch;
mod column_value;
mod event;
mod ids;
mod merkle;
mod operation;
pub mod stable_json;
pub mod timestamp;
mod transaction;

pub use batch::{Batch, Indices};
pub use column_value::{ColumnMap, ColumnValue};
pub use event::{ChangeEvent, EnvelopeError, RawColumnMap, RawEnvelope, RawSource};
pub use ids::{BatchId, InvalidBatchId, TransactionId};
pub use merkle::{MerkleLeaf, MerkleTree, ProofIndex, ProofPath, ProofStep, Side};
pub use operation::OperationKind;
pub use transaction::{CanonicalPayload, Transaction, TransactionMeta};
