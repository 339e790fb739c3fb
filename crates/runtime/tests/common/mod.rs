#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use combat_core::{
    Attributes, CharacterClass, CharacterSheet, DungeonInfo, EnemyTemplate, InventoryEntry,
    ItemDefinition, ItemId, RngSource, SequenceRng, Side, Skill, UserId,
};
use combat_runtime::{
    ActionProvider, CharacterStore, CombatService, DungeonOracleImpl, EnemyOracleImpl,
    InMemoryStore, InventoryStore, LootOracleImpl, MemorySink, OracleManager, PlayerInput,
    Prompt, Result, RngFactory, RuntimeConfig, SkillOracleImpl, Stores,
};

pub const HERO: UserId = UserId(1);
pub const RIVAL: UserId = UserId(2);

/// Level-1 warrior with 10 in every attribute: attack 10, defense 12,
/// 50 HP and 20 MP.
pub fn warrior(user: UserId, name: &str) -> CharacterSheet {
    CharacterSheet::new(
        user,
        name,
        CharacterClass::Warrior,
        Attributes::uniform(10),
        50,
        20,
    )
}

/// Every draw is 0.5: damage multipliers are exactly 1.0, loot and elite
/// rolls fail, and escapes succeed once dexterity exceeds 10.
pub fn steady_rng() -> RngFactory {
    Arc::new(|| Box::new(SequenceRng::constant(0.5)) as Box<dyn RngSource + Send>)
}

#[derive(Default)]
pub struct Content {
    pub skills: Vec<Skill>,
    pub enemies: EnemyOracleImpl,
    pub loot: LootOracleImpl,
    pub dungeons: DungeonOracleImpl,
}

impl Content {
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_enemy(mut self, enemy: EnemyTemplate) -> Self {
        self.enemies.add_enemy(enemy);
        self
    }

    pub fn with_dungeon(mut self, dungeon: DungeonInfo) -> Self {
        self.dungeons.add_dungeon(dungeon);
        self
    }

    pub fn with_boss_drop(mut self, boss: &str, item: ItemDefinition) -> Self {
        self.loot.add_boss_drop(boss, item);
        self
    }
}

pub struct World {
    pub store: Arc<InMemoryStore>,
    pub sink: Arc<MemorySink>,
    pub service: CombatService,
}

impl World {
    pub fn new(content: Content) -> Self {
        Self::with_config(content, RuntimeConfig::default())
    }

    pub fn with_config(content: Content, config: RuntimeConfig) -> Self {
        Self::build(content, config, |store| store)
    }

    /// Battles draw items through `inventory`, built around the world's
    /// own store.
    pub fn with_inventory<I>(
        content: Content,
        inventory: impl FnOnce(Arc<InMemoryStore>) -> Arc<I>,
    ) -> Self
    where
        I: InventoryStore + 'static,
    {
        Self::build(content, RuntimeConfig::default(), inventory)
    }

    fn build<I>(
        content: Content,
        config: RuntimeConfig,
        inventory: impl FnOnce(Arc<InMemoryStore>) -> Arc<I>,
    ) -> Self
    where
        I: InventoryStore + 'static,
    {
        let store = Arc::new(InMemoryStore::new());
        let sink = Arc::new(MemorySink::new());
        let mut stores = Stores::in_memory(store.clone());
        stores.inventory = inventory(store.clone());
        let oracles = OracleManager::new(
            Arc::new(SkillOracleImpl::new(content.skills)),
            Arc::new(content.enemies),
            Arc::new(content.loot),
            Arc::new(content.dungeons),
        );
        let service = CombatService::builder()
            .config(config)
            .stores(stores)
            .oracles(oracles)
            .sink(sink.clone())
            .rng_factory(steady_rng())
            .build()
            .unwrap();
        Self {
            store,
            sink,
            service,
        }
    }

    pub fn add(&self, sheet: CharacterSheet) {
        self.store.insert_character(sheet).unwrap();
    }

    pub fn sheet(&self, user: UserId) -> CharacterSheet {
        CharacterStore::get(self.store.as_ref(), user)
            .unwrap()
            .unwrap()
    }

    pub fn said(&self, needle: &str) -> bool {
        self.sink
            .all_lines()
            .iter()
            .any(|line| line.contains(needle))
    }
}

/// Lists the store's items, but every removal finds the stack already gone,
/// as if another command spent it first.
pub struct VanishingInventory(pub Arc<InMemoryStore>);

impl InventoryStore for VanishingInventory {
    fn get(&self, user: UserId) -> combat_runtime::repository::Result<Vec<InventoryEntry>> {
        InventoryStore::get(self.0.as_ref(), user)
    }

    fn remove(
        &self,
        _user: UserId,
        _item: ItemId,
        _quantity: u32,
        _enhancement: u32,
    ) -> combat_runtime::repository::Result<bool> {
        Ok(false)
    }

    fn add(
        &self,
        user: UserId,
        item: &ItemDefinition,
        quantity: u32,
        enhancement: u32,
    ) -> combat_runtime::repository::Result<()> {
        self.0.add(user, item, quantity, enhancement)
    }
}

/// Answers prompts from a fixed script, then never answers again.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<PlayerInput>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedProvider {
    pub fn new(script: impl IntoIterator<Item = PlayerInput>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            prompts: Mutex::default(),
        }
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn provide(&self, prompt: &Prompt) -> Result<PlayerInput> {
        self.prompts.lock().unwrap().push(prompt.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(input) => Ok(input),
            None => std::future::pending().await,
        }
    }
}

/// Attacks whenever asked to act and stalls on every other prompt.
pub struct StallingProvider;

#[async_trait]
impl ActionProvider for StallingProvider {
    async fn provide(&self, prompt: &Prompt) -> Result<PlayerInput> {
        match prompt {
            Prompt::Action { view, .. } => Ok(PlayerInput::Attack {
                target: view.living(Side::Opposition).next().map(|c| c.id),
            }),
            _ => std::future::pending().await,
        }
    }
}

pub fn attack() -> PlayerInput {
    PlayerInput::Attack { target: None }
}
