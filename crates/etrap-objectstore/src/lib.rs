//! C7: uploads a sealed batch's artifacts to the object store under the
//! key layout and commit-ordering rules of §4.7.

mod fake;
mod keys;
mod publisher;
mod s3;
mod store;

pub use fake::FakeObjectStore;
pub use keys::{batch_prefix, object_key};
pub use publisher::publish;
pub use s3::S3ObjectStore;
pub use store::ObjectStore;
