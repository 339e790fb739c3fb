//! Public runtime API surface.
//!
//! This module gathers the ports the host application plugs into: the input
//! provider, the output sink and the error types every entry point returns.

pub mod errors;
pub mod providers;
pub mod sink;

pub use errors::{Result, RuntimeError};
pub use providers::{
    ActionProvider, AutoAttackProvider, ItemOption, PlayerInput, Prompt, SkillOption,
};
pub use sink::{NullSink, OutputSink};
