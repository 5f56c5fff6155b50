//! Turn Engine
//!
//! Runs one complete turn against an injected [`WorldStore`]: every active
//! faction chooses and executes an action, then every active faction rolls for
//! decay, then the turn counter advances.

use std::fmt;

use faction_events::{ActionKind, Faction, FactionId, WorldEvent};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::store::{StoreError, WorldStore};
use crate::systems::{choose, execute, maybe_decay, DECAY_CHANCE};

/// A turn that could not start because its inputs could not be read
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not read the current turn: {0}")]
    CurrentTurn(#[source] StoreError),
    #[error("could not list active factions: {0}")]
    ActiveFactions(#[source] StoreError),
}

/// Which write failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    SaveFaction(FactionId),
    AppendEvent { faction: FactionId, action: ActionKind },
    AdvanceTurn,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOperation::SaveFaction(id) => write!(f, "save faction {}", id),
            WriteOperation::AppendEvent { faction, action } => {
                write!(f, "append {} event for faction {}", action, faction)
            }
            WriteOperation::AdvanceTurn => f.write_str("advance turn"),
        }
    }
}

/// A store write that failed during a turn
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct WriteFailure {
    pub operation: WriteOperation,
    #[source]
    pub source: StoreError,
}

/// Everything one call to [`TurnEngine::run_turn`] produced
#[derive(Debug)]
pub struct TurnOutcome {
    /// The turn that was simulated
    pub turn: u64,
    /// Main action events for every faction, then decay events, in order.
    /// Events whose append failed are included without an id.
    pub events: Vec<WorldEvent>,
    /// Writes that failed; the turn carried on past each of them
    pub failures: Vec<WriteFailure>,
    /// Whether the turn counter moved to `turn + 1`
    pub advanced: bool,
}

impl TurnOutcome {
    fn new(turn: u64) -> Self {
        Self {
            turn,
            events: Vec::new(),
            failures: Vec::new(),
            advanced: false,
        }
    }

    /// True when every write of the turn succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of decay events in this turn
    pub fn decay_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.action == ActionKind::InternalDecay)
            .count()
    }
}

/// Orchestrates turns over a store with its own random stream
pub struct TurnEngine<S, R = SmallRng> {
    store: S,
    rng: R,
    decay_chance: f64,
}

impl<S: WorldStore> TurnEngine<S, SmallRng> {
    /// Reproducible engine seeded from `seed`
    pub fn with_seed(store: S, seed: u64) -> Self {
        Self::new(store, SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy(store: S) -> Self {
        Self::new(store, SmallRng::from_entropy())
    }

    /// Seed and decay chance taken from the `[simulation]` settings
    pub fn from_config(store: S, config: &SimulationConfig) -> Self {
        let engine = match config.seed {
            Some(seed) => Self::with_seed(store, seed),
            None => Self::from_entropy(store),
        };
        engine.with_decay_chance(config.decay_chance)
    }
}

impl<S: WorldStore, R: Rng> TurnEngine<S, R> {
    pub fn new(store: S, rng: R) -> Self {
        Self {
            store,
            rng,
            decay_chance: DECAY_CHANCE,
        }
    }

    /// Override the per-faction decay probability, clamped to [0, 1]
    pub fn with_decay_chance(mut self, chance: f64) -> Self {
        self.decay_chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
        self
    }

    pub fn decay_chance(&self) -> f64 {
        self.decay_chance
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Simulate one turn.
    ///
    /// Returns `Err` only when the turn number or the active factions cannot
    /// be read; nothing is written in that case. With no active factions the
    /// outcome is empty and the turn does not advance. Failed writes are
    /// collected in the outcome and never stop the remaining factions.
    pub fn run_turn(&mut self) -> Result<TurnOutcome, EngineError> {
        let turn = self.store.current_turn().map_err(EngineError::CurrentTurn)?;
        let mut factions = self
            .store
            .list_active_factions()
            .map_err(EngineError::ActiveFactions)?;

        let mut outcome = TurnOutcome::new(turn);
        if factions.is_empty() {
            info!(turn, "No active factions; turn not advanced");
            return Ok(outcome);
        }

        info!(turn, factions = factions.len(), "Turn started");

        for index in 0..factions.len() {
            let actor = factions[index].clone();
            let kind = choose(&actor, &factions, &mut self.rng);
            debug!(turn, faction = %actor.name, action = %kind, "Action chosen");

            let result = execute(&actor, kind, &factions, turn, &mut self.rng);
            if let Some(target) = result.target {
                self.save(&target, &mut outcome);
                if let Some(slot) = factions.iter_mut().find(|f| f.id == target.id) {
                    *slot = target;
                }
            }
            self.save(&result.actor, &mut outcome);
            factions[index] = result.actor;
            self.append(result.event, &mut outcome);
        }

        for index in 0..factions.len() {
            let Some(decay) = maybe_decay(&factions[index], turn, self.decay_chance, &mut self.rng)
            else {
                continue;
            };
            self.save(&decay.faction, &mut outcome);
            factions[index] = decay.faction;
            self.append(decay.event, &mut outcome);
        }

        match self.store.advance_turn() {
            Ok(next) => {
                outcome.advanced = true;
                debug!(turn = next, "Turn counter advanced");
            }
            Err(source) => self.record(
                &mut outcome,
                WriteFailure {
                    operation: WriteOperation::AdvanceTurn,
                    source,
                },
            ),
        }

        info!(
            turn,
            events = outcome.events.len(),
            decays = outcome.decay_count(),
            failures = outcome.failures.len(),
            "Turn finished"
        );
        Ok(outcome)
    }

    fn save(&mut self, faction: &Faction, outcome: &mut TurnOutcome) {
        if let Err(source) = self.store.save_or_update_faction(faction) {
            self.record(
                outcome,
                WriteFailure {
                    operation: WriteOperation::SaveFaction(faction.id),
                    source,
                },
            );
        }
    }

    fn append(&mut self, event: WorldEvent, outcome: &mut TurnOutcome) {
        match self.store.append_world_event(&event) {
            Ok(id) => outcome.events.push(event.with_id(id)),
            Err(source) => {
                self.record(
                    outcome,
                    WriteFailure {
                        operation: WriteOperation::AppendEvent {
                            faction: event.faction_id,
                            action: event.action,
                        },
                        source,
                    },
                );
                outcome.events.push(event);
            }
        }
    }

    fn record(&self, outcome: &mut TurnOutcome, failure: WriteFailure) {
        warn!(turn = outcome.turn, "{}", failure);
        outcome.failures.push(failure);
    }
}
