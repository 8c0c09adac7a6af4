//! Versioned state with time-travel for the weekly board.
//!
//! Every user action becomes one recorded transition. The engine keeps a
//! single live state, an ordered log of immutable snapshots and a cursor
//! pointing at the entry the live state corresponds to:
//!
//! - **Commit**: mutate the live state, persist it, drop any stale future and
//!   append a snapshot
//! - **Preview**: read any historical snapshot as if it were live, without
//!   touching the live state or the log
//! - **Rollback**: make a historical snapshot the present and discard
//!   everything after it
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Engine<S, St>                                                      │
//! │    - owns the live state (only commit/rollback write it)            │
//! │    - cursor + optional preview index                                │
//! │    - notifies renderers after every state-affecting operation       │
//! └─────────────────────────────────────────────────────────────────────┘
//!           │ encode                     │ Arc<S> snapshots
//!           ▼                            ▼
//! ┌───────────────────────┐   ┌──────────────────────────────────────────┐
//! │  Store (key → JSON)   │   │  HistoryLog<S>                           │
//! │    - primary key      │   │    - append / truncate-suffix only       │
//! │    - legacy keys      │   │    - never empty                         │
//! └───────────────────────┘   └──────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use weekboard_history::{Engine, EngineConfig, MemoryStore};
//!
//! let mut engine: Engine<serde_json::Value, _> =
//!     Engine::open(MemoryStore::new(), EngineConfig::default());
//!
//! engine.commit("set answer", |state| *state = serde_json::json!({ "answer": 42 }));
//! assert_eq!(engine.history().len(), 2);
//!
//! engine.enter_preview(0);
//! assert!(engine.effective_state().is_null());
//! assert_eq!(engine.read()["answer"], 42);
//!
//! engine.undo();
//! assert!(engine.read().is_null());
//! assert_eq!(engine.history().len(), 1);
//! ```

pub mod codec;
mod config;
mod engine;
mod error;
mod log;
mod render;
mod store;

pub use codec::Snapshot;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{HistoryError, HistoryResult};
pub use log::{HistoryEntry, HistoryLog, now_millis};
pub use render::{Frame, Render};
pub use store::{MemoryStore, Store};

/// Position of an entry in the history log.
pub type EntryIndex = usize;
