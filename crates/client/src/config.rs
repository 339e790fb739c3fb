//! Demo configuration loaded from the environment.
use std::env;

#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// Seed for every battle's random stream. `None` draws from entropy.
    pub seed: Option<u64>,
    /// Autohunts launched concurrently, one per seeded hero.
    pub hunts: usize,
    pub dungeon: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: None,
            hunts: 3,
            dungeon: "Goblin Warren".to_string(),
        }
    }
}

impl DemoConfig {
    /// Environment variables:
    /// - `DEMO_SEED` - fixed RNG seed (default: entropy)
    /// - `DEMO_HUNTS` - concurrent autohunts (default: 3)
    /// - `DEMO_DUNGEON` - dungeon for the solo run (default: Goblin Warren)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.seed = read_env::<u64>("DEMO_SEED");
        if let Some(hunts) = read_env::<usize>("DEMO_HUNTS") {
            config.hunts = hunts;
        }
        if let Ok(dungeon) = env::var("DEMO_DUNGEON") {
            config.dungeon = dungeon;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
