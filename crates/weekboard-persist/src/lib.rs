//! LMDB storage for the weekly board.
//!
//! Implements the engine's [`Store`](weekboard_history::Store) seam on top of
//! `heed`. Values are the encoded state, keyed by the engine's storage key.
//!
//! ```ignore
//! use weekboard_history::{Engine, EngineConfig};
//! use weekboard_model::PlannerState;
//! use weekboard_persist::StateDb;
//!
//! let db = StateDb::open("data/weekboard")?;
//! let engine: Engine<PlannerState, _> = Engine::open(db, EngineConfig::default());
//! ```

mod db;

pub use db::StateDb;
