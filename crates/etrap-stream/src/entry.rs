/// One raw entry read off a stream: the broker-assigned id plus the
/// envelope payload found under the well-known `value` field (§6).
#[derive(Debug, Clone)]
pub struct StreamEntry {
    pub stream_name: String,
    pub entry_id: String,
    pub envelope: serde_json::Value,
}
