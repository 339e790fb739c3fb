//! Topic-based event bus for battle output.
//!
//! Battles narrate through [`crate::api::OutputSink`]. The [`EventBus`] is the
//! default sink: events are published to topics, and consumers subscribe only
//! to the topics they need.

mod bus;
mod sink;
mod types;

pub use bus::{EventBus, Topic};
pub use sink::MemorySink;
pub use types::BattleEvent;
