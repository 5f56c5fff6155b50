//! World Setup
//!
//! Sample world creation.

pub mod factions;

pub use factions::*;
