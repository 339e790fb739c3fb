//! Output port for battle narration and results.
use crate::events::BattleEvent;

/// Receives every event a battle produces, in order.
///
/// Implementations must not block: they are called from inside the battle
/// task between turns.
pub trait OutputSink: Send + Sync {
    fn emit(&self, event: BattleEvent);
}

/// Discards everything.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&self, _event: BattleEvent) {}
}
