use combat_core::{BattleMode, BattleReport, UserId};
use serde::{Deserialize, Serialize};

use crate::registry::SessionId;

/// Everything a battle reports to the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A session was registered and its battle is about to run.
    Started {
        session: SessionId,
        mode: BattleMode,
        participants: Vec<UserId>,
    },
    /// Narration lines, in the order they happened.
    Log { session: SessionId, lines: Vec<String> },
    /// A new round begins.
    RoundStarted { session: SessionId, round: u32 },
    /// A dungeon run enters one of its stages.
    StageEntered {
        session: SessionId,
        stage: u32,
        title: String,
    },
    /// Terminal record, emitted once per session after settlement.
    Finished {
        session: SessionId,
        report: BattleReport,
    },
}

impl BattleEvent {
    pub fn session(&self) -> SessionId {
        match self {
            Self::Started { session, .. }
            | Self::Log { session, .. }
            | Self::RoundStarted { session, .. }
            | Self::StageEntered { session, .. }
            | Self::Finished { session, .. } => *session,
        }
    }

    pub fn lines(&self) -> &[String] {
        match self {
            Self::Log { lines, .. } => lines,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::BattleOutcome;
    use serde_json::json;

    #[test]
    fn events_serialize_as_tagged_json() {
        let event = BattleEvent::StageEntered {
            session: SessionId(7),
            stage: 2,
            title: "Resting Area".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({ "StageEntered": { "session": 7, "stage": 2, "title": "Resting Area" } })
        );
    }

    #[test]
    fn finished_reports_survive_json() {
        let event = BattleEvent::Finished {
            session: SessionId(1),
            report: BattleReport::empty(BattleOutcome::Fled, 3),
        };
        let text = serde_json::to_string(&event).unwrap();
        let back: BattleEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.session(), SessionId(1));
        assert!(back.lines().is_empty());
    }
}
