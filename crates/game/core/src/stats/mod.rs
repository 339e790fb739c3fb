//! Attributes, classes, equipment aggregates and derived combat stats.
//!
//! ```text
//! [ Attributes + Class ] --+
//! [ EquipmentBonuses ] ----+--> StatResolver --> effective attack / defense
//! [ StatusEffects ] -------+
//! ```
pub mod attributes;
pub mod bonus;
pub mod resolver;
pub mod resources;

pub use attributes::{Attribute, Attributes, CharacterClass, ClassKind};
pub use bonus::{EquipmentBonuses, SpecialBonus};
pub use resolver::StatResolver;
pub use resources::ResourceMeter;

/// Rounds to the nearest integer, ties to the even neighbour.
///
/// Every rounded quantity in the game (damage spread, skill magnitudes, elite
/// scaling, bonus percentages) goes through this helper.
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}
