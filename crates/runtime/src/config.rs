//! Runtime configuration: input deadlines, pacing and buffer sizes.
use std::env;
use std::time::Duration;

/// Deadlines for every suspension point of a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Main action menu.
    pub action: Duration,
    /// Skill and item submenus.
    pub submenu: Duration,
    /// Each attribute point after a milestone level-up.
    pub attribute: Duration,
    /// Dungeon rest stage; the run continues automatically afterwards.
    pub rest: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            action: Duration::from_secs(60),
            submenu: Duration::from_secs(30),
            attribute: Duration::from_secs(60),
            rest: Duration::from_secs(120),
        }
    }
}

/// Delays that keep narration readable. Zero disables a delay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacingConfig {
    /// Before the opposing side acts.
    pub turn: Duration,
    /// After a dungeon stage banner.
    pub stage_intro: Duration,
    /// Between dungeon stages.
    pub stage_transition: Duration,
}

impl PacingConfig {
    /// No pauses at all.
    pub const fn instant() -> Self {
        Self {
            turn: Duration::ZERO,
            stage_intro: Duration::ZERO,
            stage_transition: Duration::ZERO,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            turn: Duration::from_secs(1),
            stage_intro: Duration::from_secs(2),
            stage_transition: Duration::from_secs(3),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub timeouts: TimeoutConfig,
    pub pacing: PacingConfig,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeouts: TimeoutConfig::default(),
            pacing: PacingConfig::default(),
            event_buffer_size: 100,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `COMBAT_ACTION_TIMEOUT_SECS`
    /// - `COMBAT_SUBMENU_TIMEOUT_SECS`
    /// - `COMBAT_ATTRIBUTE_TIMEOUT_SECS`
    /// - `COMBAT_REST_TIMEOUT_SECS`
    /// - `COMBAT_PACING_MILLIS` (turn pacing only)
    /// - `COMBAT_EVENT_BUFFER`
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = read_env::<u64>("COMBAT_ACTION_TIMEOUT_SECS") {
            config.timeouts.action = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("COMBAT_SUBMENU_TIMEOUT_SECS") {
            config.timeouts.submenu = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("COMBAT_ATTRIBUTE_TIMEOUT_SECS") {
            config.timeouts.attribute = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("COMBAT_REST_TIMEOUT_SECS") {
            config.timeouts.rest = Duration::from_secs(secs.max(1));
        }
        if let Some(millis) = read_env::<u64>("COMBAT_PACING_MILLIS") {
            config.pacing.turn = Duration::from_millis(millis);
        }
        if let Some(capacity) = read_env::<usize>("COMBAT_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
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
