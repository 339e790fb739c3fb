//! High-level entry points for starting battles.
//!
//! [`CombatService`] owns the session registry and the collaborators every
//! battle needs, and exposes one async method per battle mode. Each method
//! registers the participants, runs the battle to completion, settles it and
//! releases the session on every exit path, including errors and a dropped
//! future.
use std::sync::Arc;

use combat_core::{BattleMode, BattleReport, DungeonMode, GameError, UserId};
use tokio::sync::broadcast;

use crate::api::{ActionProvider, OutputSink, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{BattleEvent, EventBus, Topic};
use crate::oracle::OracleManager;
use crate::registry::{SessionGuard, SessionKind, SessionRegistry};
use crate::repository::Stores;
use crate::rng::{RngFactory, entropy_factory};
use crate::scheduler::{
    DuelRequest, DungeonRequest, HuntRequest, Services, run_duel, run_dungeon, run_hunt,
};

/// Cloneable façade over the combat engine.
///
/// Battles started through clones of one service share a single
/// [`SessionRegistry`], so a user can only ever be in one of them.
#[derive(Clone)]
pub struct CombatService {
    inner: Arc<Inner>,
}

struct Inner {
    services: Services,
    registry: SessionRegistry,
    rng_factory: RngFactory,
    /// Present when the default event bus is the output sink.
    events: Option<EventBus>,
}

impl CombatService {
    pub fn builder() -> CombatServiceBuilder {
        CombatServiceBuilder::new()
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.inner.registry
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.services.config
    }

    /// Subscribe to one topic of the default event bus.
    ///
    /// Returns `None` when the service was built with a custom sink.
    pub fn subscribe(&self, topic: Topic) -> Option<broadcast::Receiver<BattleEvent>> {
        self.inner.events.as_ref()?.subscribe(topic)
    }

    /// Manual hunt against a random enemy for the player's level. Random
    /// encounters may turn elite.
    pub async fn hunt(&self, user: UserId, provider: &dyn ActionProvider) -> Result<BattleReport> {
        let guard = self.begin(SessionKind::Pve, &[user])?;
        let result = self.random_hunt(&guard, user, Some(provider)).await;
        self.finish(guard, result)
    }

    /// Manual hunt against a named enemy. The player must have outgrown the
    /// enemy's level band; named hunts never roll elites.
    pub async fn hunt_named(
        &self,
        user: UserId,
        enemy: &str,
        provider: &dyn ActionProvider,
    ) -> Result<BattleReport> {
        let guard = self.begin(SessionKind::Pve, &[user])?;
        let result = self.named_hunt(&guard, user, enemy, provider).await;
        self.finish(guard, result)
    }

    /// Hunt without input or pacing: the player attacks every turn and any
    /// attribute points from a level-up are banked.
    pub async fn autohunt(&self, user: UserId) -> Result<BattleReport> {
        let guard = self.begin(SessionKind::Pve, &[user])?;
        let result = self.random_hunt(&guard, user, None).await;
        self.finish(guard, result)
    }

    /// Duel between two players. Both fight at full HP and MP.
    pub async fn duel(
        &self,
        challenger: UserId,
        challenged: UserId,
        ranked: bool,
        provider: &dyn ActionProvider,
    ) -> Result<BattleReport> {
        let guard = self.begin(SessionKind::Pvp, &[challenger, challenged])?;
        let request = DuelRequest {
            challenger,
            challenged,
            ranked,
            provider,
        };
        let result = run_duel(&self.inner.services, guard.id(), request, self.rng()).await;
        self.finish(guard, result)
    }

    /// Four-stage dungeon run. `party[0]` leads; a single member runs solo
    /// with the solo reward multiplier.
    pub async fn dungeon(
        &self,
        party: &[UserId],
        dungeon: &str,
        provider: &dyn ActionProvider,
    ) -> Result<BattleReport> {
        let guard = self.begin(SessionKind::Dungeon, party)?;
        let result = self.dungeon_run(&guard, party, dungeon, provider).await;
        self.finish(guard, result)
    }

    async fn random_hunt(
        &self,
        guard: &SessionGuard,
        user: UserId,
        provider: Option<&dyn ActionProvider>,
    ) -> Result<BattleReport> {
        let services = &self.inner.services;
        let sheet = services.character(user)?;
        let mut rng = self.rng();
        let enemy = services
            .oracles
            .enemies()
            .random(sheet.level, rng.as_mut())
            .ok_or(RuntimeError::NoEnemyForLevel { level: sheet.level })?
            .roll_encounter(rng.as_mut());

        let request = HuntRequest {
            user,
            enemy,
            provider,
        };
        run_hunt(services, guard.id(), request, rng).await
    }

    async fn named_hunt(
        &self,
        guard: &SessionGuard,
        user: UserId,
        name: &str,
        provider: &dyn ActionProvider,
    ) -> Result<BattleReport> {
        let services = &self.inner.services;
        let sheet = services.character(user)?;
        let enemy =
            services
                .oracles
                .enemies()
                .by_name(name)
                .ok_or_else(|| RuntimeError::UnknownEnemy {
                    name: name.to_string(),
                })?;
        if !enemy.huntable_at(sheet.level) {
            return Err(RuntimeError::LevelTooLow {
                user,
                level: sheet.level,
                required: enemy.max_level + 1,
            });
        }

        let request = HuntRequest {
            user,
            enemy,
            provider: Some(provider),
        };
        run_hunt(services, guard.id(), request, self.rng()).await
    }

    async fn dungeon_run(
        &self,
        guard: &SessionGuard,
        party: &[UserId],
        name: &str,
        provider: &dyn ActionProvider,
    ) -> Result<BattleReport> {
        let services = &self.inner.services;
        let dungeon =
            services
                .oracles
                .dungeons()
                .by_name(name)
                .ok_or_else(|| RuntimeError::UnknownDungeon {
                    name: name.to_string(),
                })?;
        for &user in party {
            let sheet = services.character(user)?;
            if sheet.level < dungeon.level_requirement {
                return Err(RuntimeError::LevelTooLow {
                    user,
                    level: sheet.level,
                    required: dungeon.level_requirement,
                });
            }
        }

        let mode = if party.len() == 1 {
            DungeonMode::Solo
        } else {
            DungeonMode::Party
        };
        let request = DungeonRequest {
            party: party.to_vec(),
            dungeon,
            mode,
            provider,
        };
        run_dungeon(services, guard.id(), request, self.rng()).await
    }

    fn rng(&self) -> Box<dyn combat_core::RngSource + Send> {
        (self.inner.rng_factory)()
    }

    fn begin(&self, kind: SessionKind, participants: &[UserId]) -> Result<SessionGuard> {
        let guard = self.inner.registry.register(kind, participants)?;
        self.inner.services.sink.emit(BattleEvent::Started {
            session: guard.id(),
            mode: battle_mode(kind),
            participants: participants.to_vec(),
        });
        Ok(guard)
    }

    fn finish(&self, guard: SessionGuard, result: Result<BattleReport>) -> Result<BattleReport> {
        match &result {
            Ok(report) => {
                tracing::info!(
                    session = %guard.id(),
                    outcome = ?report.outcome,
                    rounds = report.rounds,
                    xp = report.xp_gained,
                    gold = report.gold_gained,
                    "battle finished"
                );
                self.inner.services.sink.emit(BattleEvent::Finished {
                    session: guard.id(),
                    report: report.clone(),
                });
            }
            Err(err) if err.severity().is_internal() => {
                tracing::error!(
                    session = %guard.id(),
                    code = err.error_code(),
                    error = %err,
                    "battle aborted"
                );
            }
            Err(err) => {
                tracing::warn!(
                    session = %guard.id(),
                    code = err.error_code(),
                    error = %err,
                    "battle rejected"
                );
            }
        }
        drop(guard);
        result
    }
}

fn battle_mode(kind: SessionKind) -> BattleMode {
    match kind {
        SessionKind::Pve => BattleMode::Pve,
        SessionKind::Pvp => BattleMode::Pvp,
        SessionKind::Dungeon => BattleMode::Dungeon,
    }
}

/// Builder for [`CombatService`].
pub struct CombatServiceBuilder {
    config: RuntimeConfig,
    stores: Option<Stores>,
    oracles: Option<OracleManager>,
    sink: Option<Arc<dyn OutputSink>>,
    rng_factory: Option<RngFactory>,
    registry: Option<SessionRegistry>,
}

impl CombatServiceBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            stores: None,
            oracles: None,
            sink: None,
            rng_factory: None,
            registry: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required storage collaborators
    pub fn stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Set required catalogs
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Replace the default [`EventBus`] output.
    pub fn sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Source of per-battle randomness. Defaults to OS entropy.
    pub fn rng_factory(mut self, factory: RngFactory) -> Self {
        self.rng_factory = Some(factory);
        self
    }

    /// Share a registry with other services.
    pub fn registry(mut self, registry: SessionRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<CombatService> {
        let stores = self.stores.ok_or(RuntimeError::MissingStores)?;
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;

        let (sink, events) = match self.sink {
            Some(sink) => (sink, None),
            None => {
                let bus = EventBus::with_capacity(self.config.event_buffer_size);
                (Arc::new(bus.clone()) as Arc<dyn OutputSink>, Some(bus))
            }
        };

        Ok(CombatService {
            inner: Arc::new(Inner {
                services: Services {
                    stores,
                    oracles,
                    sink,
                    config: self.config,
                },
                registry: self.registry.unwrap_or_default(),
                rng_factory: self.rng_factory.unwrap_or_else(entropy_factory),
                events,
            }),
        })
    }
}
