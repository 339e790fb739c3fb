use std::sync::Mutex;

use super::BattleEvent;
use crate::api::OutputSink;
use crate::registry::SessionId;

/// Keeps every emitted event in memory. Handy for tests and replays.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<BattleEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BattleEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Every narration line of `session`, flattened in order.
    pub fn lines(&self, session: SessionId) -> Vec<String> {
        self.events()
            .iter()
            .filter(|event| event.session() == session)
            .flat_map(|event| event.lines().to_vec())
            .collect()
    }

    /// Narration lines of every session, in emission order.
    pub fn all_lines(&self) -> Vec<String> {
        self.events()
            .iter()
            .flat_map(|event| event.lines().to_vec())
            .collect()
    }
}

impl OutputSink for MemorySink {
    fn emit(&self, event: BattleEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(_) => tracing::warn!("memory sink lock poisoned, dropping event"),
        }
    }
}
