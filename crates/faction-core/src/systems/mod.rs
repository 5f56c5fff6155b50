//! Turn Systems
//!
//! The per-faction steps of a turn: action selection, action execution, and
//! internal decay.

pub mod decay;
pub mod execute;
pub mod select;

pub use decay::{apply_decay, maybe_decay, DecayOutcome, DECAY_CHANCE, DISASTERS};
pub use execute::{execute, ActionOutcome};
pub use select::{average_strength, choose, weight_table};
