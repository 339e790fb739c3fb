//! Combat math.
//!
//! Pure functions used by the action resolver: damage from a basic attack,
//! skill damage variants, poison ticks and lifesteal.

pub mod damage;

pub use damage::{
    attack_damage, lifesteal, piercing_damage, poison_damage, scaled_attack_damage, skill_damage,
};
