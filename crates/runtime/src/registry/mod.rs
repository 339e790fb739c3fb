//! Exclusive ownership of participants by active battles.
//!
//! A user may be bound to at most one active session across the PVE, PVP and
//! dungeon sets. Registration is an atomic check-and-insert under one lock,
//! so concurrent battle starts for the same user cannot both succeed. The
//! returned [`SessionGuard`] releases the binding when dropped, which covers
//! every exit path of a battle task, including errors and panics.
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use combat_core::UserId;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::api::{Result, RuntimeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum SessionKind {
    Pve,
    Pvp,
    Dungeon,
}

/// Lookup result for a registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: SessionId,
    pub kind: SessionKind,
    pub participants: Vec<UserId>,
}

#[derive(Default)]
struct RegistryState {
    pve: HashMap<UserId, SessionId>,
    pvp: HashMap<UserId, SessionId>,
    dungeon: HashMap<UserId, SessionId>,
    sessions: HashMap<SessionId, SessionInfo>,
}

impl RegistryState {
    fn set(&mut self, kind: SessionKind) -> &mut HashMap<UserId, SessionId> {
        match kind {
            SessionKind::Pve => &mut self.pve,
            SessionKind::Pvp => &mut self.pvp,
            SessionKind::Dungeon => &mut self.dungeon,
        }
    }

    fn active(&self, user: UserId) -> Option<SessionId> {
        self.pve
            .get(&user)
            .or_else(|| self.pvp.get(&user))
            .or_else(|| self.dungeon.get(&user))
            .copied()
    }
}

/// Shared registry of active sessions. Cloning shares the same state.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    state: Arc<Mutex<RegistryState>>,
    next_id: Arc<AtomicU64>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // Every critical section leaves the maps consistent, so a poisoned
        // lock still holds usable data.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Binds `participants` to a new session of `kind`.
    ///
    /// Fails without changing anything if any participant is already bound in
    /// any of the three sets, or appears twice in `participants`.
    pub fn register(&self, kind: SessionKind, participants: &[UserId]) -> Result<SessionGuard> {
        if participants.is_empty() {
            return Err(RuntimeError::EmptyParty);
        }
        for (index, user) in participants.iter().enumerate() {
            if participants[..index].contains(user) {
                return Err(RuntimeError::DuplicateParticipant { user: *user });
            }
        }

        let mut state = self.lock();
        for user in participants {
            if let Some(existing) = state.active(*user) {
                let kind = state
                    .sessions
                    .get(&existing)
                    .map_or(kind, |info| info.kind);
                tracing::debug!(%user, %existing, "registration rejected");
                return Err(RuntimeError::AlreadyInBattle { user: *user, kind });
            }
        }

        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let set = state.set(kind);
        for user in participants {
            set.insert(*user, id);
        }
        state.sessions.insert(
            id,
            SessionInfo {
                id,
                kind,
                participants: participants.to_vec(),
            },
        );
        drop(state);

        tracing::info!(session = %id, %kind, ?participants, "session registered");
        Ok(SessionGuard {
            registry: self.clone(),
            id,
            kind,
        })
    }

    pub fn lookup(&self, user: UserId) -> Option<SessionInfo> {
        let state = self.lock();
        let id = state.active(user)?;
        state.sessions.get(&id).cloned()
    }

    pub fn is_active(&self, user: UserId) -> bool {
        self.lookup(user).is_some()
    }

    /// Removes `participants` from every set. Unknown users are ignored, so
    /// calling this more than once is harmless.
    pub fn unregister(&self, participants: &[UserId]) {
        let mut state = self.lock();
        for user in participants {
            for kind in [SessionKind::Pve, SessionKind::Pvp, SessionKind::Dungeon] {
                state.set(kind).remove(user);
            }
        }
        let RegistryState {
            pve,
            pvp,
            dungeon,
            sessions,
        } = &mut *state;
        sessions.retain(|id, _| {
            pve.values().any(|s| s == id)
                || pvp.values().any(|s| s == id)
                || dungeon.values().any(|s| s == id)
        });
    }

    /// Releases every binding that still points at `id`.
    fn release(&self, id: SessionId, kind: SessionKind) {
        let mut state = self.lock();
        state.set(kind).retain(|_, session| *session != id);
        let removed = state.sessions.remove(&id).is_some();
        drop(state);
        if removed {
            tracing::info!(session = %id, %kind, "session released");
        }
    }

    /// Number of sessions currently registered.
    pub fn active_sessions(&self) -> usize {
        self.lock().sessions.len()
    }
}

/// Keeps a session registered for as long as it lives.
#[must_use = "dropping the guard releases the session immediately"]
pub struct SessionGuard {
    registry: SessionRegistry,
    id: SessionId,
    kind: SessionKind,
}

impl SessionGuard {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.release(self.id, self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_users_in_any_set() {
        let registry = SessionRegistry::new();
        let _duel = registry
            .register(SessionKind::Pvp, &[UserId(1), UserId(2)])
            .unwrap();

        let err = registry
            .register(SessionKind::Dungeon, &[UserId(3), UserId(2)])
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RuntimeError::AlreadyInBattle {
                user: UserId(2),
                kind: SessionKind::Pvp
            }
        ));
        // nothing from the failed attempt sticks
        assert!(!registry.is_active(UserId(3)));
    }

    #[test]
    fn dropping_the_guard_releases_everyone() {
        let registry = SessionRegistry::new();
        let guard = registry
            .register(SessionKind::Dungeon, &[UserId(1), UserId(2)])
            .unwrap();
        assert_eq!(
            registry.lookup(UserId(2)).map(|info| info.id),
            Some(guard.id())
        );

        drop(guard);
        assert!(!registry.is_active(UserId(1)));
        assert!(!registry.is_active(UserId(2)));
        assert_eq!(registry.active_sessions(), 0);
        assert!(registry.register(SessionKind::Pve, &[UserId(1)]).is_ok());
    }

    #[test]
    fn unregister_is_idempotent() {
        let registry = SessionRegistry::new();
        let guard = registry.register(SessionKind::Pve, &[UserId(7)]).unwrap();
        registry.unregister(&[UserId(7)]);
        registry.unregister(&[UserId(7)]);
        assert!(!registry.is_active(UserId(7)));
        drop(guard);
        assert_eq!(registry.active_sessions(), 0);
    }

    #[test]
    fn stale_guard_does_not_release_a_newer_session() {
        let registry = SessionRegistry::new();
        let old = registry.register(SessionKind::Pve, &[UserId(5)]).unwrap();
        registry.unregister(&[UserId(5)]);
        let new = registry.register(SessionKind::Pve, &[UserId(5)]).unwrap();

        drop(old);
        assert_eq!(
            registry.lookup(UserId(5)).map(|info| info.id),
            Some(new.id())
        );
    }

    #[test]
    fn duplicate_and_empty_participants_are_rejected() {
        let registry = SessionRegistry::new();
        assert!(matches!(
            registry.register(SessionKind::Pvp, &[UserId(4), UserId(4)]),
            Err(RuntimeError::DuplicateParticipant { user: UserId(4) })
        ));
        assert!(matches!(
            registry.register(SessionKind::Pve, &[]),
            Err(RuntimeError::EmptyParty)
        ));
    }
}
