//! Snapshot codec: deep copies and the persisted JSON format.
//!
//! The on-disk format is the state value itself, serialized as JSON. The
//! schema only grows additively, so decoding is lenient: fields missing from
//! an older payload take their defaults (every snapshot type is expected to
//! carry `#[serde(default)]` at each nesting level), and [`Snapshot::repair`]
//! restores invariants afterwards. Input that cannot be interpreted at all
//! yields the default state instead of an error.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::HistoryResult;

/// A state value the engine can record, persist and restore.
///
/// `Clone` must produce a fully independent copy. Types with interior
/// mutability or shared ownership (`Rc<RefCell<_>>`, `Arc<Mutex<_>>`) break
/// that and must not be used as snapshots. serde_json writes NaN and
/// infinities as `null`, so float fields need to tolerate `null` on decode.
pub trait Snapshot: Clone + Serialize + DeserializeOwned + Default {
    /// Restore invariants that a partial or legacy payload may violate.
    ///
    /// Runs after every decode. The default does nothing.
    fn repair(&mut self) {}
}

impl Snapshot for serde_json::Value {}

/// Deep, independent copy of `state`.
#[inline]
pub fn clone_state<S: Snapshot>(state: &S) -> S {
    state.clone()
}

/// Serialize `state` to its persisted text form.
pub fn encode<S: Snapshot>(state: &S) -> HistoryResult<String> {
    Ok(serde_json::to_string(state)?)
}

/// Parse a persisted payload, filling in defaults and repairing it.
pub fn try_decode<S: Snapshot>(raw: &str) -> HistoryResult<S> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let mut state: S = serde_json::from_value(value)?;
    state.repair();
    Ok(state)
}

/// Like [`try_decode`], but falls back to `S::default()` on malformed input.
pub fn decode<S: Snapshot>(raw: &str) -> S {
    match try_decode(raw) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!("Discarding unreadable persisted state: {e}");
            S::default()
        }
    }
}
