//! Faction Simulation CLI
//!
//! Runs turns against a world stored in a data directory and exposes the
//! administrative operations as subcommands.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use faction_core::admin::{self, AdminError, FactionEdit, Intervention};
use faction_core::config::{ConfigError, DEFAULT_TUNING_PATH};
use faction_core::setup;
use faction_core::{
    EngineError, JsonFileStore, SimConfig, StoreError, TurnEngine, WorldOverview, WorldStore,
};
use faction_events::{
    ActionKind, Alignment, FactionDraft, FactionId, FactionType, RelationshipId, RelationshipType, Resource,
    Resources,
};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "faction_sim")]
#[command(about = "A turn-based faction simulation")]
struct Cli {
    /// Tuning file
    #[arg(long, global = true, default_value = DEFAULT_TUNING_PATH)]
    config: PathBuf,

    /// World directory (overrides [store].data_dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the world directory
    Init {
        /// Seed the world with sample factions
        #[arg(long)]
        sample: bool,
    },
    /// Simulate turns and print their events
    Run {
        /// Number of turns (defaults to [simulation].default_turns)
        #[arg(long)]
        turns: Option<u32>,
        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Current turn and faction table
    Status,
    /// World overview
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the event log, newest first
    Events {
        /// Only events of this turn
        #[arg(long)]
        turn: Option<u64>,
        /// Show at most this many events
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Manage factions
    Faction {
        #[command(subcommand)]
        action: FactionCommand,
    },
    /// Manage relationships
    Relationship {
        #[command(subcommand)]
        action: RelationshipCommand,
    },
    /// Write custom events
    Event {
        #[command(subcommand)]
        action: EventCommand,
    },
    /// Apply an intervention file
    Apply { path: PathBuf },
}

#[derive(Subcommand, Debug)]
enum FactionCommand {
    /// Create a faction
    Add {
        name: String,
        #[arg(long = "type")]
        faction_type: FactionType,
        #[arg(long)]
        alignment: Alignment,
        #[arg(long)]
        gold: Option<u32>,
        #[arg(long)]
        troops: Option<u32>,
        #[arg(long)]
        magic: Option<u32>,
        #[arg(long)]
        influence: Option<u32>,
    },
    /// Change name, type or alignment
    Edit {
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        faction_type: Option<FactionType>,
        #[arg(long)]
        alignment: Option<Alignment>,
    },
    /// Add to (or take from) one resource
    Adjust {
        id: u32,
        resource: Resource,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Exclude a faction from the simulation
    Deactivate { id: u32 },
    /// Return a faction to the simulation
    Activate { id: u32 },
    /// Remove a faction permanently
    Delete { id: u32 },
}

#[derive(Subcommand, Debug)]
enum RelationshipCommand {
    /// Create a relationship between two factions
    Add {
        faction1: u32,
        faction2: u32,
        #[arg(long = "type")]
        relationship_type: RelationshipType,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        strength: i32,
    },
    /// Shift a relationship's strength
    Adjust {
        id: u32,
        #[arg(allow_negative_numbers = true)]
        delta: i32,
        #[arg(long = "type")]
        relationship_type: Option<RelationshipType>,
    },
}

#[derive(Subcommand, Debug)]
enum EventCommand {
    /// Log a custom event at the current turn
    Log {
        faction: u32,
        #[arg(long)]
        action: ActionKind,
        description: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Admin(#[from] AdminError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("could not encode output: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = SimConfig::load_if_present(&cli.config);

    let filter_directive = config
        .as_ref()
        .map(|c| c.logging.filter.clone())
        .unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: SimConfig) -> Result<(), CliError> {
    let data_dir = cli.data_dir.unwrap_or_else(|| config.store.data_dir.clone());
    let mut store = JsonFileStore::open(&data_dir)?;

    match cli.command {
        Command::Init { sample } => {
            if sample {
                if store.list_all_factions()?.is_empty() {
                    let created = setup::seed_world(&mut store, &config.starting_resources)?;
                    println!("Seeded {} factions.", created.len());
                } else {
                    warn!("World already has factions; sample not added");
                }
            }
            store.persist_world()?;
            println!("World ready at {}", data_dir.display());
        }

        Command::Run { turns, seed } => {
            let mut simulation = config.simulation.clone();
            if seed.is_some() {
                simulation.seed = seed;
            }
            let turns = turns.unwrap_or(simulation.default_turns);
            let mut engine = TurnEngine::from_config(store, &simulation);

            for _ in 0..turns {
                let outcome = engine.run_turn()?;
                if outcome.events.is_empty() && !outcome.advanced {
                    println!("No active factions; nothing to simulate.");
                    break;
                }
                println!("=== Turn {} ===", outcome.turn);
                for event in &outcome.events {
                    println!("{}", event.description);
                }
                for failure in &outcome.failures {
                    eprintln!("Warning: {}", failure);
                }
            }
        }

        Command::Status => {
            println!("Turn: {}", store.current_turn()?);
            for faction in store.list_all_factions()? {
                let marker = if faction.active { ' ' } else { 'x' };
                println!("[{}] #{} {}", marker, faction.id, faction);
            }
        }

        Command::Stats { json } => {
            let overview = WorldOverview::from_store(&store)?;
            if json {
                println!("{}", overview.to_json()?);
            } else {
                println!("{}", overview);
            }
        }

        Command::Events { turn, limit } => {
            let events = match turn {
                Some(turn) => store.events_for_turn(turn)?,
                None => store.list_events()?,
            };
            for event in events.iter().take(limit.unwrap_or(usize::MAX)) {
                println!("{} {}", event.timestamp, event);
            }
        }

        Command::Faction { action } => run_faction(&mut store, action, &config)?,

        Command::Relationship { action } => match action {
            RelationshipCommand::Add {
                faction1,
                faction2,
                relationship_type,
                strength,
            } => {
                let rel = admin::create_relationship(
                    &mut store,
                    FactionId(faction1),
                    FactionId(faction2),
                    relationship_type,
                    strength,
                )?;
                println!("Created {}", rel);
            }
            RelationshipCommand::Adjust {
                id,
                delta,
                relationship_type,
            } => {
                let rel =
                    admin::adjust_relationship(&mut store, RelationshipId(id), delta, relationship_type)?;
                println!("Updated {}", rel);
            }
        },

        Command::Event { action } => match action {
            EventCommand::Log {
                faction,
                action,
                description,
            } => {
                let event = admin::log_event(&mut store, FactionId(faction), action, &description)?;
                println!("{}", event);
            }
        },

        Command::Apply { path } => {
            let intervention = Intervention::load(&path)?;
            match intervention.apply(&mut store)? {
                Some(event) => println!("{}", event),
                None => println!("Applied {}", path.display()),
            }
        }
    }

    Ok(())
}

fn run_faction(
    store: &mut JsonFileStore,
    action: FactionCommand,
    config: &SimConfig,
) -> Result<(), CliError> {
    match action {
        FactionCommand::Add {
            name,
            faction_type,
            alignment,
            gold,
            troops,
            magic,
            influence,
        } => {
            let base = config.starting_resources;
            let resources = Resources::new(
                gold.unwrap_or(base.gold),
                troops.unwrap_or(base.troops),
                magic.unwrap_or(base.magic),
                influence.unwrap_or(base.influence),
            );
            let draft = FactionDraft::new(name, faction_type, alignment).with_resources(resources);
            let faction = admin::create_faction(store, draft)?;
            println!("Created #{} {}", faction.id, faction);
        }
        FactionCommand::Edit {
            id,
            name,
            faction_type,
            alignment,
        } => {
            let edit = FactionEdit {
                name,
                faction_type,
                alignment,
            };
            let faction = admin::edit_faction(store, FactionId(id), edit)?;
            println!("Updated #{} {}", faction.id, faction);
        }
        FactionCommand::Adjust {
            id,
            resource,
            amount,
        } => {
            let (_, event) = admin::adjust_resource(store, FactionId(id), resource, amount)?;
            println!("{}", event.description);
        }
        FactionCommand::Deactivate { id } => {
            let faction = admin::set_active(store, FactionId(id), false)?;
            println!("{} is no longer active.", faction.name);
        }
        FactionCommand::Activate { id } => {
            let faction = admin::set_active(store, FactionId(id), true)?;
            println!("{} is active again.", faction.name);
        }
        FactionCommand::Delete { id } => {
            admin::delete_faction(store, FactionId(id))?;
            println!("Deleted faction {}.", id);
        }
    }
    Ok(())
}
