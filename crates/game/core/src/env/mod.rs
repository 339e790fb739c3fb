//! Sources of nondeterminism injected into the engine.
mod rng;

pub use rng::{PcgRng, RngSource, SequenceRng};
