//! Turn simulation engine for a persistent world of factions.
//!
//! Each turn every active faction chooses and executes one action, a decay
//! pass may strike any of them, and the turn counter advances. State lives
//! behind the [`store::WorldStore`] trait.

pub mod actions;
pub mod admin;
pub mod config;
pub mod engine;
pub mod setup;
pub mod stats;
pub mod store;
pub mod systems;

pub use config::SimConfig;
pub use engine::{EngineError, TurnEngine, TurnOutcome, WriteFailure, WriteOperation};
pub use stats::WorldOverview;
pub use store::{JsonFileStore, MemoryStore, StoreError, WorldStore};
