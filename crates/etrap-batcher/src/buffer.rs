use etrap_types::ChangeEvent;

/// The per-`(database, table)` open buffer (§4.4): events in arrival
/// order, plus the timestamps needed to evaluate the idle/force-seal
/// triggers.
#[derive(Debug)]
pub(crate) struct Buffer {
    pub events: Vec<ChangeEvent>,
    pub first_inserted_at_ms: i64,
    pub last_inserted_at_ms: i64,
}

impl Buffer {
    pub fn new(now_ms: i64) -> Self {
        Self {
            events: Vec::new(),
            first_inserted_at_ms: now_ms,
            last_inserted_at_ms: now_ms,
        }
    }

    pub fn push(&mut self, event: ChangeEvent, now_ms: i64) {
        self.events.push(event);
        self.last_inserted_at_ms = now_ms;
    }
}
