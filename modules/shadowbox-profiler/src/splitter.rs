//! Partitions merged scheduler output back into per-entity slices.
//!
//! When two entities share an identifier (a pair sparring over the same
//! page), the fetch happens once but the payload is delivered to every
//! owner. Ownership is recorded at routing time, before any fetch runs.

use std::collections::{BTreeMap, HashMap};

use crate::scheduler::ResultMap;
use crate::types::{ProfileRef, Source, SourcePayload, SourceResult, TaskKey};

/// Opaque per-entity name chosen by the caller ("challenger_a", a user id).
pub type EntityKey = String;

/// Which entities requested which task. One task can have several owners.
#[derive(Debug, Clone, Default)]
pub struct Ownership {
    owners: HashMap<TaskKey, Vec<EntityKey>>,
}

impl Ownership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, key: TaskKey, entity: &str) {
        let entry = self.owners.entry(key).or_default();
        if !entry.iter().any(|e| e == entity) {
            entry.push(entity.to_string());
        }
    }

    pub fn assign_all(&mut self, identifiers: &[ProfileRef], entity: &str) {
        for identifier in identifiers {
            self.assign(identifier.key(), entity);
        }
    }
}

/// One entity's view of the fetch results: every identifier it owns, with
/// its outcome, exactly once.
#[derive(Debug, Clone, Default)]
pub struct EntitySlice {
    pub results: BTreeMap<TaskKey, SourceResult>,
}

impl EntitySlice {
    /// First present payload per source, in section order. Sources where
    /// every owned identifier missed simply do not appear.
    pub fn payloads(&self) -> BTreeMap<Source, &SourcePayload> {
        let mut out = BTreeMap::new();
        for ((source, _), result) in &self.results {
            if let Some(payload) = &result.payload {
                out.entry(*source).or_insert(payload);
            }
        }
        out
    }

    pub fn hit_sources(&self) -> Vec<Source> {
        self.payloads().keys().copied().collect()
    }
}

/// Split merged results into per-entity slices. A result whose key has
/// multiple owners is cloned into each owner's slice.
pub fn split(results: &ResultMap, ownership: &Ownership) -> BTreeMap<EntityKey, EntitySlice> {
    let mut slices: BTreeMap<EntityKey, EntitySlice> = BTreeMap::new();
    for entities in ownership.owners.values() {
        for entity in entities {
            slices.entry(entity.clone()).or_default();
        }
    }

    for (key, result) in results {
        let Some(entities) = ownership.owners.get(key) else {
            continue;
        };
        for entity in entities {
            if let Some(slice) = slices.get_mut(entity) {
                slice.results.insert(key.clone(), result.clone());
            }
        }
    }

    slices
}

/// Placeholder shown when an entity had no identifiers at all.
const DEFAULT_DISPLAY_NAME: &str = "Digital Twin";

/// Resolve a human display name from whichever payloads arrived, trying
/// sources in `NAME_PRIORITY` order. Falls back to the first identifier's
/// handle with its mention marker, then to a generic placeholder.
pub fn resolve_display_name(
    payloads: &BTreeMap<Source, &SourcePayload>,
    identifiers: &[ProfileRef],
) -> String {
    for source in Source::NAME_PRIORITY {
        if let Some(payload) = payloads.get(&source) {
            if let Some(name) = payload.display_name() {
                return name;
            }
        }
    }
    identifiers
        .first()
        .map(|r| r.placeholder_name())
        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
}
