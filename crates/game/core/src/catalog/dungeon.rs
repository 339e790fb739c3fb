use crate::config::BattleConfig;
use crate::env::RngSource;

/// Static dungeon definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonInfo {
    pub name: String,
    pub level_requirement: u32,
    /// Enemy catalog key of the final guardian.
    pub boss: String,
    /// Themed pool regular stages draw from.
    pub enemy_pool: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DungeonMode {
    Solo,
    Party,
}

impl DungeonMode {
    pub const fn reward_multiplier(self) -> u32 {
        match self {
            Self::Solo => BattleConfig::SOLO_DUNGEON_MULTIPLIER,
            Self::Party => 1,
        }
    }
}

/// The four fixed stages of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DungeonStage {
    FirstHorde,
    Rest,
    SecondHorde,
    Boss,
}

impl DungeonStage {
    pub const ALL: [Self; BattleConfig::DUNGEON_STAGES as usize] =
        [Self::FirstHorde, Self::Rest, Self::SecondHorde, Self::Boss];

    /// 1-based stage number.
    pub const fn number(self) -> u32 {
        match self {
            Self::FirstHorde => 1,
            Self::Rest => 2,
            Self::SecondHorde => 3,
            Self::Boss => 4,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::FirstHorde => "First Horde",
            Self::Rest => "Resting Area",
            Self::SecondHorde => "Second Horde",
            Self::Boss => "The Dungeon Boss",
        }
    }
}

impl DungeonInfo {
    /// Rolls how many enemies a combat stage spawns.
    ///
    /// Solo runs face 2–3; a party of `n` faces `n..=n+2`.
    pub fn roll_enemy_count<R: RngSource + ?Sized>(
        &self,
        mode: DungeonMode,
        party_size: usize,
        rng: &mut R,
    ) -> u32 {
        match mode {
            DungeonMode::Solo => rng.range_inclusive(
                BattleConfig::SOLO_MIN_ENEMIES,
                BattleConfig::SOLO_MAX_ENEMIES,
            ),
            DungeonMode::Party => {
                let n = party_size as u32;
                rng.range_inclusive(n, n + BattleConfig::PARTY_EXTRA_ENEMIES)
            }
        }
    }

    /// Picks enemy catalog names for one combat stage from the themed pool.
    pub fn roll_stage_enemies<R: RngSource + ?Sized>(
        &self,
        mode: DungeonMode,
        party_size: usize,
        rng: &mut R,
    ) -> Vec<String> {
        if self.enemy_pool.is_empty() {
            return Vec::new();
        }
        let count = self.roll_enemy_count(mode, party_size, rng);
        (0..count)
            .map(|_| self.enemy_pool[rng.index(self.enemy_pool.len())].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;

    fn crypt() -> DungeonInfo {
        DungeonInfo {
            name: "Haunted Crypt".into(),
            level_requirement: 5,
            boss: "Lich".into(),
            enemy_pool: vec!["Skeleton".into(), "Undead Warrior".into()],
        }
    }

    #[test]
    fn solo_spawns_two_or_three() {
        let dungeon = crypt();
        let mut low = SequenceRng::constant(0.0);
        let mut high = SequenceRng::constant(0.999);
        assert_eq!(dungeon.roll_enemy_count(DungeonMode::Solo, 1, &mut low), 2);
        assert_eq!(dungeon.roll_enemy_count(DungeonMode::Solo, 1, &mut high), 3);
    }

    #[test]
    fn party_spawns_scale_with_size() {
        let dungeon = crypt();
        let mut low = SequenceRng::constant(0.0);
        let mut high = SequenceRng::constant(0.999);
        assert_eq!(dungeon.roll_enemy_count(DungeonMode::Party, 3, &mut low), 3);
        assert_eq!(dungeon.roll_enemy_count(DungeonMode::Party, 3, &mut high), 5);
    }

    #[test]
    fn stage_enemies_come_from_pool() {
        let dungeon = crypt();
        let mut rng = SequenceRng::new(vec![0.0, 0.0, 0.9]);
        let names = dungeon.roll_stage_enemies(DungeonMode::Solo, 1, &mut rng);
        assert_eq!(names, vec!["Skeleton".to_string(), "Undead Warrior".to_string()]);
    }
}
