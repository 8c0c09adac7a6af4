//! Integration tests for the history engine.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};
use weekboard_history::{Engine, EngineConfig, Frame, MemoryStore, Store};

// ============================================================================
// Helpers
// ============================================================================

type JsonEngine = Engine<Value, MemoryStore>;

fn engine() -> JsonEngine {
    Engine::with_state(
        MemoryStore::new(),
        EngineConfig::default(),
        json!({ "items": [], "boards": {} }),
    )
}

fn add_item(name: &'static str) -> impl FnOnce(&mut Value) {
    move |state| {
        if let Some(items) = state["items"].as_array_mut() {
            items.push(json!(name));
        }
    }
}

fn items(state: &Value) -> Vec<&str> {
    state["items"]
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn stored(engine: &JsonEngine) -> Value {
    let raw = engine
        .store()
        .get(&engine.config().storage_key)
        .expect("state was persisted");
    serde_json::from_str(raw).unwrap()
}

// ============================================================================
// Commit
// ============================================================================

#[test]
fn test_commit_appends_and_moves_cursor() {
    let mut engine = engine();
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.cursor(), 0);

    let index = engine.commit("add A", add_item("A"));

    assert_eq!(index, 1);
    assert_eq!(engine.history().len(), 2);
    assert_eq!(engine.cursor(), engine.history().len() - 1);
    assert_eq!(engine.history().get(1).unwrap().snapshot(), engine.read());
    assert_eq!(engine.history().get(1).unwrap().description(), "add A");
}

#[test]
fn test_commit_persists_immediately() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));

    assert_eq!(engine.store().writes(), 1);
    assert_eq!(stored(&engine), *engine.read());
}

#[test]
fn test_commit_exits_preview() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));
    engine.enter_preview(0);

    engine.commit("add B", add_item("B"));

    assert!(!engine.is_previewing());
    assert_eq!(items(engine.effective_state()), ["A", "B"]);
    // preview does not move the cursor, so nothing was truncated
    assert_eq!(engine.history().len(), 3);
}

#[test]
fn test_later_mutation_does_not_touch_history() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));
    engine.commit("nest", |state| state["boards"]["1"] = json!({ "clouds": [{ "text": "x" }] }));
    engine.commit("edit nested", |state| state["boards"]["1"]["clouds"][0]["text"] = json!("y"));

    let history = engine.history();
    assert_eq!(history.get(2).unwrap().snapshot()["boards"]["1"]["clouds"][0]["text"], "x");
    assert_eq!(history.get(3).unwrap().snapshot()["boards"]["1"]["clouds"][0]["text"], "y");
    assert_eq!(items(history.get(0).unwrap().snapshot()), Vec::<&str>::new());
}

// ============================================================================
// try_commit
// ============================================================================

#[test]
fn test_try_commit_failure_leaves_everything_untouched() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));
    let writes = engine.store().writes();

    let result = engine.try_commit("half done", |state| {
        add_item("B")(state);
        Err("rejected")
    });

    assert_eq!(result, Err("rejected"));
    assert_eq!(items(engine.read()), ["A"]);
    assert_eq!(engine.history().len(), 2);
    assert_eq!(engine.cursor(), 1);
    assert_eq!(engine.store().writes(), writes);
}

#[test]
fn test_try_commit_success_records() {
    let mut engine = engine();
    let result: Result<_, ()> = engine.try_commit("add A", |state| {
        add_item("A")(state);
        Ok(())
    });

    assert_eq!(result, Ok(1));
    assert_eq!(items(engine.read()), ["A"]);
    assert_eq!(stored(&engine), *engine.read());
}

// ============================================================================
// Preview
// ============================================================================

#[test]
fn test_preview_is_read_only() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));
    engine.commit("add B", add_item("B"));
    let writes = engine.store().writes();

    assert!(engine.enter_preview(0));
    for _ in 0..3 {
        assert_eq!(items(engine.effective_state()), Vec::<&str>::new());
    }

    assert_eq!(items(engine.read()), ["A", "B"]);
    assert_eq!(engine.cursor(), 2);
    assert_eq!(engine.history().len(), 3);
    assert_eq!(engine.store().writes(), writes);

    assert!(engine.exit_preview());
    assert_eq!(engine.effective_state(), engine.read());
}

#[test]
fn test_preview_out_of_range_is_ignored() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));
    engine.enter_preview(1);

    assert!(!engine.enter_preview(2));
    assert_eq!(engine.preview_index(), Some(1));
    assert!(!engine.enter_preview(usize::MAX));
}

#[test]
fn test_exit_preview_when_not_previewing() {
    let mut engine = engine();
    assert!(!engine.exit_preview());
    assert_eq!(engine.effective_state(), engine.read());
}

// ============================================================================
// Rollback and undo
// ============================================================================

#[test]
fn test_rollback_truncates_and_restores() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));
    engine.commit("add B", add_item("B"));
    engine.enter_preview(2);

    assert!(engine.rollback(1));

    assert_eq!(engine.history().len(), 2);
    assert_eq!(engine.cursor(), 1);
    assert!(!engine.is_previewing());
    assert_eq!(items(engine.read()), ["A"]);
    assert_eq!(stored(&engine), *engine.read());
}

#[test]
fn test_rollback_state_does_not_alias_history() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));
    engine.rollback(1);

    engine.commit("add B", add_item("B"));

    assert_eq!(items(engine.history().get(1).unwrap().snapshot()), ["A"]);
    assert_eq!(items(engine.read()), ["A", "B"]);
}

#[test]
fn test_commit_after_rollback_drops_future() {
    let mut engine = engine();
    for name in ["A", "B", "C", "D"] {
        engine.commit(format!("add {name}"), add_item(name));
    }
    let n = engine.history().len();
    let k = 1;
    assert!(k < n - 1);

    engine.rollback(k);
    engine.commit("add E", add_item("E"));

    assert_eq!(engine.history().len(), k + 2);
    let descriptions: Vec<_> = engine
        .history()
        .iter()
        .map(|entry| entry.description().to_owned())
        .collect();
    assert_eq!(descriptions, ["Initial state", "add A", "add E"]);
}

#[test]
fn test_rollback_twice_is_stable() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));
    engine.commit("add B", add_item("B"));
    engine.commit("add C", add_item("C"));

    engine.rollback(1);
    let state = engine.read().clone();
    let len = engine.history().len();

    assert!(engine.rollback(1));
    assert_eq!(*engine.read(), state);
    assert_eq!(engine.history().len(), len);
    assert_eq!(engine.cursor(), 1);
}

#[test]
fn test_rollback_out_of_range_is_ignored() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));
    let writes = engine.store().writes();

    assert!(!engine.rollback(5));
    assert_eq!(engine.history().len(), 2);
    assert_eq!(engine.cursor(), 1);
    assert_eq!(engine.store().writes(), writes);
}

#[test]
fn test_undo_steps_back_and_truncates() {
    let mut engine = engine();
    engine.commit("add A", add_item("A"));
    engine.commit("add B", add_item("B"));

    assert!(engine.undo());
    assert_eq!(engine.cursor(), 1);
    assert_eq!(engine.history().len(), 2);
    assert_eq!(items(engine.read()), ["A"]);
}

#[test]
fn test_undo_at_first_entry_is_noop() {
    let mut engine = engine();
    let state = engine.read().clone();

    assert!(!engine.can_undo());
    assert!(!engine.undo());
    assert_eq!(engine.cursor(), 0);
    assert_eq!(engine.history().len(), 1);
    assert_eq!(*engine.read(), state);
    assert_eq!(engine.store().writes(), 0);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_branch_replacement() {
    let mut engine = engine();

    engine.commit("add item A", add_item("A"));
    assert_eq!((engine.history().len(), engine.cursor()), (2, 1));

    engine.commit("add item B", add_item("B"));
    assert_eq!((engine.history().len(), engine.cursor()), (3, 2));

    engine.rollback(1);
    assert_eq!((engine.history().len(), engine.cursor()), (2, 1));
    assert_eq!(items(engine.read()), ["A"]);

    engine.commit("add item C", add_item("C"));
    assert_eq!((engine.history().len(), engine.cursor()), (3, 2));
    assert_eq!(items(engine.read()), ["A", "C"]);
    assert_eq!(engine.history().get(2).unwrap().description(), "add item C");
}

#[test]
fn test_scenario_preview_initial_state() {
    let mut engine = engine();
    engine.commit("add item A", add_item("A"));
    engine.commit("add item B", add_item("B"));

    engine.enter_preview(0);

    assert_eq!(*engine.effective_state(), json!({ "items": [], "boards": {} }));
    assert_eq!(items(engine.read()), ["A", "B"]);
}

// ============================================================================
// Startup and persistence
// ============================================================================

#[test]
fn test_open_reads_primary_key() {
    let config = EngineConfig::default();
    let store = MemoryStore::with_value(config.storage_key.clone(), r#"{"items":["saved"]}"#);

    let engine: JsonEngine = Engine::open(store, config);

    assert_eq!(items(engine.read()), ["saved"]);
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.history().get(0).unwrap().description(), "Initial state");
    assert_eq!(engine.store().writes(), 0);
}

#[test]
fn test_open_migrates_legacy_key() {
    let config = EngineConfig::default();
    let legacy = config.legacy_keys[0].clone();
    let store = MemoryStore::with_value(legacy, r#"{"items":["old"]}"#);

    let engine: JsonEngine = Engine::open(store, config);

    assert_eq!(items(engine.read()), ["old"]);
    assert_eq!(stored(&engine), json!({ "items": ["old"] }));
}

#[test]
fn test_open_malformed_falls_back_to_default() {
    let config = EngineConfig::default();
    let store = MemoryStore::with_value(config.storage_key.clone(), "{{{");

    let engine: JsonEngine = Engine::open(store, config);

    assert_eq!(*engine.read(), Value::Null);
}

#[test]
fn test_open_empty_store() {
    let engine: JsonEngine = Engine::open(MemoryStore::new(), EngineConfig::with_key("k"));
    assert_eq!(*engine.read(), Value::Null);
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_borrowed_store() {
    let mut store = MemoryStore::new();
    {
        let mut engine: Engine<Value, _> =
            Engine::open(&mut store, EngineConfig::with_key("k"));
        engine.commit("set", |state| *state = json!(1));
    }
    assert_eq!(store.get("k"), Some("1"));
}

#[derive(Debug, Default)]
struct BrokenStore;

impl Store for BrokenStore {
    type Error = std::io::Error;

    fn read(&self, _key: &str) -> Result<Option<String>, Self::Error> {
        Err(std::io::Error::other("disk gone"))
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), Self::Error> {
        Err(std::io::Error::other("disk gone"))
    }
}

#[test]
fn test_store_failures_are_not_fatal() {
    let mut engine: Engine<Value, _> = Engine::open(BrokenStore, EngineConfig::default());
    assert_eq!(*engine.read(), Value::Null);

    engine.commit("set", |state| *state = json!({ "items": ["A"] }));
    assert_eq!(engine.history().len(), 2);
    assert!(engine.persist().is_err());

    assert!(engine.undo());
    assert_eq!(*engine.read(), Value::Null);
}

// ============================================================================
// Rendering
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Write,
    Render { len: usize, cursor: usize, preview: Option<usize> },
}

struct RecordingStore {
    inner: MemoryStore,
    events: Rc<RefCell<Vec<Event>>>,
}

impl Store for RecordingStore {
    type Error = std::convert::Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.inner.read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(Event::Write);
        self.inner.write(key, value)
    }
}

#[test]
fn test_persist_happens_before_render() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let store = RecordingStore {
        inner: MemoryStore::new(),
        events: Rc::clone(&events),
    };
    let mut engine: Engine<Value, _> =
        Engine::with_state(store, EngineConfig::default(), json!({ "items": [] }));

    let sink = Rc::clone(&events);
    engine.add_renderer(move |frame: &Frame<'_, Value>| {
        sink.borrow_mut().push(Event::Render {
            len: frame.entries().len(),
            cursor: frame.cursor(),
            preview: frame.preview_index(),
        });
    });

    engine.commit("add A", add_item("A"));
    engine.enter_preview(0);
    engine.exit_preview();
    engine.undo();

    assert_eq!(
        *events.borrow(),
        [
            Event::Write,
            Event::Render { len: 2, cursor: 1, preview: None },
            Event::Render { len: 2, cursor: 1, preview: Some(0) },
            Event::Render { len: 2, cursor: 1, preview: None },
            Event::Write,
            Event::Render { len: 1, cursor: 0, preview: None },
        ]
    );
}

#[test]
fn test_renderer_sees_effective_state() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut engine = engine();
    let sink = Rc::clone(&seen);
    engine.add_renderer(move |frame: &Frame<'_, Value>| {
        sink.borrow_mut().push(items(frame.effective()).len());
    });

    engine.commit("add A", add_item("A"));
    engine.commit("add B", add_item("B"));
    engine.enter_preview(1);
    engine.exit_preview();

    assert_eq!(*seen.borrow(), [1, 2, 1, 2]);
}

#[test]
fn test_failed_try_commit_does_not_render() {
    let renders = Rc::new(RefCell::new(0));
    let mut engine = engine();
    let sink = Rc::clone(&renders);
    engine.add_renderer(move |_: &Frame<'_, Value>| *sink.borrow_mut() += 1);

    let _ = engine.try_commit("nope", |_| Err::<(), _>("invalid"));
    assert_eq!(*renders.borrow(), 0);
}
