//! C5: stream discovery, consumer-group membership, decoding, and
//! deferred acknowledgement (§4.5).

mod broker;
mod decode;
mod entry;
mod fake;
mod reconnect;
mod redis_broker;

pub use broker::StreamBroker;
pub use decode::decode_entry;
pub use entry::StreamEntry;
pub use fake::FakeBroker;
pub use reconnect::{connect_with_backoff, reconnect_backoff};
pub use redis_broker::RedisBroker;
