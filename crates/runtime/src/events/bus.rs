//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::BattleEvent;
use crate::api::OutputSink;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Narration lines
    Log,
    /// Round and stage progression
    Turn,
    /// Session start and final reports
    Outcome,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Log, Topic::Turn, Topic::Outcome];

    pub fn of(event: &BattleEvent) -> Topic {
        match event {
            BattleEvent::Log { .. } => Topic::Log,
            BattleEvent::RoundStarted { .. } | BattleEvent::StageEntered { .. } => Topic::Turn,
            BattleEvent::Started { .. } | BattleEvent::Finished { .. } => Topic::Outcome,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort: events published while
/// nobody listens are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<BattleEvent>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: BattleEvent) {
        let topic = Topic::of(&event);
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> Option<broadcast::Receiver<BattleEvent>> {
        self.channels.get(&topic).map(broadcast::Sender::subscribe)
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<BattleEvent>> {
        topics
            .iter()
            .filter_map(|&topic| self.subscribe(topic).map(|rx| (topic, rx)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for EventBus {
    fn emit(&self, event: BattleEvent) {
        self.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SessionId;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut logs = bus.subscribe(Topic::Log).unwrap();
        let mut turns = bus.subscribe(Topic::Turn).unwrap();

        bus.emit(BattleEvent::Log {
            session: SessionId(1),
            lines: vec!["hello".into()],
        });

        let event = logs.recv().await.unwrap();
        assert_eq!(event.lines(), ["hello".to_string()]);
        assert!(turns.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(BattleEvent::RoundStarted {
            session: SessionId(2),
            round: 3,
        });
    }
}
