//! Hooks for keeping the raw JSON behind parsed entities.
//!
//! # Design
//! The client receives a `ParseObserver` explicitly instead of writing to a
//! process-wide registry, so two clients never share state unless the caller
//! hands them the same `JsonStore`. The client only calls the observer when
//! `Configuration::json_store_enabled` is set.

use dashmap::DashMap;
use serde_json::Value;

use crate::json::JsonObject;
use crate::model::Entity;

/// Receives top-level entities as they are parsed.
pub trait ParseObserver: Send + Sync {
    /// A new top-level call is about to parse a response.
    fn on_call_started(&self) {}

    fn on_entity_parsed(&self, kind: &'static str, id: &str, raw: &JsonObject);
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ParseObserver for NoopObserver {
    fn on_entity_parsed(&self, _kind: &'static str, _id: &str, _raw: &JsonObject) {}
}

/// Concurrent map from parsed entity to the JSON object it came from.
///
/// Cleared whenever a new call starts, so it holds the entities of the most
/// recent call only.
#[derive(Debug, Default)]
pub struct JsonStore {
    entries: DashMap<(&'static str, String), Value>,
}

impl JsonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON the given entity was built from, if it was registered.
    pub fn raw_json_of<E: Entity>(&self, entity: &E) -> Option<Value> {
        self.entries
            .get(&(E::KIND, entity.id().to_string()))
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl ParseObserver for JsonStore {
    fn on_call_started(&self) {
        self.clear();
    }

    fn on_entity_parsed(&self, kind: &'static str, id: &str, raw: &JsonObject) {
        self.entries
            .insert((kind, id.to_string()), Value::Object(raw.clone()));
    }
}
