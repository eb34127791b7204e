//! Composite-key query cache with keep-previous-data and invalidation.

use crate::params::QueryParams;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Entries kept per (entity, group) scope; the least recently stored go
/// first.
pub const MAX_ENTRIES_PER_SCOPE: usize = 32;

pub mod entity {
    pub const GROUP: &str = "group";
    pub const CANDIDATES: &str = "candidates";
    pub const PARTIES: &str = "parties";
    pub const CONSTITUENTS: &str = "constituents";
    pub const CONSTITUENT: &str = "constituent";
    pub const SUPPORT: &str = "support";
    pub const PARTY_SUPPORT: &str = "party_support";
    pub const OUTREACH: &str = "outreach";
    pub const TRANSPORT: &str = "transport";
    pub const REGISTRATIONS: &str = "registrations";
    pub const VOTING_RECORDS: &str = "voting_records";
    pub const HEXMAP_SUPPORT: &str = "hexmap_support";
    pub const HEXMAP_PARTIES: &str = "hexmap_parties";
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub entity: &'static str,
    pub group_id: String,
    /// Entity id for single-record queries, empty otherwise.
    pub id: String,
    pub params: QueryParams,
}

impl QueryKey {
    pub fn new(entity: &'static str, group_id: &str, params: &QueryParams) -> Self {
        Self {
            entity,
            group_id: group_id.to_string(),
            id: String::new(),
            params: params.clone(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    fn scope(&self) -> (&'static str, String) {
        (self.entity, self.group_id.clone())
    }
}

#[derive(Debug)]
pub enum Lookup<T> {
    Fresh(T),
    /// Invalidated; usable as a placeholder while refetching.
    Stale(T),
    Miss,
}

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    stale: bool,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    /// Store order per scope, oldest first. The back is the latest key.
    order: HashMap<(&'static str, String), VecDeque<QueryKey>>,
}

#[derive(Debug, Default)]
pub struct QueryCache {
    state: Mutex<CacheState>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lookup<T: DeserializeOwned>(&self, key: &QueryKey) -> Lookup<T> {
        let state = self.state();
        let Some(entry) = state.entries.get(key) else {
            return Lookup::Miss;
        };
        match serde_json::from_value(entry.value.clone()) {
            Ok(v) if entry.stale => Lookup::Stale(v),
            Ok(v) => Lookup::Fresh(v),
            Err(err) => {
                debug!(entity = key.entity, %err, "cached value has a different shape");
                Lookup::Miss
            }
        }
    }

    pub fn store<T: Serialize>(&self, key: &QueryKey, value: &T) {
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        let mut state = self.state();
        let CacheState { entries, order } = &mut *state;
        entries.insert(key.clone(), CacheEntry { value, stale: false });
        let keys = order.entry(key.scope()).or_default();
        keys.retain(|k| k != key);
        keys.push_back(key.clone());
        while keys.len() > MAX_ENTRIES_PER_SCOPE {
            if let Some(evicted) = keys.pop_front() {
                entries.remove(&evicted);
                debug!(entity = evicted.entity, "evicted cached query");
            }
        }
    }

    /// Placeholder data for `key`: its own entry when present (fresh or
    /// stale), otherwise the most recently stored entry of the same entity
    /// and group. Lets a paginated table keep showing the last page while
    /// the next one loads.
    pub fn previous<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let state = self.state();
        let entry = state.entries.get(key).or_else(|| {
            state
                .order
                .get(&key.scope())
                .and_then(VecDeque::back)
                .and_then(|latest| state.entries.get(latest))
        })?;
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Marks every entry of the given entities stale. Returns how many
    /// entries were affected.
    pub fn invalidate(&self, entities: &[&str]) -> usize {
        let mut state = self.state();
        let mut count = 0;
        for (key, entry) in state.entries.iter_mut() {
            if entities.contains(&key.entity) && !entry.stale {
                entry.stale = true;
                count += 1;
            }
        }
        info!(?entities, count, "invalidated cached queries");
        count
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.entries.clear();
        state.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(entity: &'static str, offset: usize) -> QueryKey {
        QueryKey::new(entity, "g1", &QueryParams::new().with("offset", offset))
    }

    #[test]
    fn fresh_then_stale_after_invalidation() {
        let cache = QueryCache::new();
        let k = key(entity::SUPPORT, 0);
        assert!(matches!(cache.lookup::<Vec<u32>>(&k), Lookup::Miss));

        cache.store(&k, &vec![1u32, 2]);
        assert!(matches!(cache.lookup::<Vec<u32>>(&k), Lookup::Fresh(v) if v == vec![1, 2]));

        assert_eq!(cache.invalidate(&[entity::SUPPORT, entity::OUTREACH]), 1);
        assert!(matches!(cache.lookup::<Vec<u32>>(&k), Lookup::Stale(_)));
        assert_eq!(cache.invalidate(&[entity::SUPPORT]), 0);
    }

    #[test]
    fn previous_falls_back_to_latest_in_scope() {
        let cache = QueryCache::new();
        cache.store(&key(entity::CONSTITUENTS, 0), &vec!["page-1"]);
        cache.store(&key(entity::CONSTITUENTS, 25), &vec!["page-2"]);
        cache.store(&key(entity::OUTREACH, 0), &vec!["other"]);

        let next = key(entity::CONSTITUENTS, 50);
        assert!(matches!(cache.lookup::<Vec<String>>(&next), Lookup::Miss));
        assert_eq!(cache.previous::<Vec<String>>(&next), Some(vec!["page-2".to_string()]));
        assert_eq!(
            cache.previous::<Vec<String>>(&key(entity::CONSTITUENTS, 0)),
            Some(vec!["page-1".to_string()])
        );

        let other_group = QueryKey::new(entity::CONSTITUENTS, "g2", &QueryParams::new());
        assert_eq!(cache.previous::<Vec<String>>(&other_group), None);
    }

    #[test]
    fn each_scope_keeps_only_its_most_recent_entries() {
        let cache = QueryCache::new();
        for page in 0..MAX_ENTRIES_PER_SCOPE + 5 {
            cache.store(&key(entity::CONSTITUENTS, page * 25), &vec![page]);
        }
        cache.store(&key(entity::OUTREACH, 0), &vec![0usize]);
        assert_eq!(cache.len(), MAX_ENTRIES_PER_SCOPE + 1);

        assert!(matches!(cache.lookup::<Vec<usize>>(&key(entity::CONSTITUENTS, 0)), Lookup::Miss));
        let newest = key(entity::CONSTITUENTS, (MAX_ENTRIES_PER_SCOPE + 4) * 25);
        assert!(matches!(cache.lookup::<Vec<usize>>(&newest), Lookup::Fresh(_)));

        // re-storing an old key moves it to the back instead of duplicating it
        let kept = key(entity::CONSTITUENTS, 10 * 25);
        cache.store(&kept, &vec![10usize]);
        assert_eq!(cache.len(), MAX_ENTRIES_PER_SCOPE + 1);
        assert_eq!(cache.previous::<Vec<usize>>(&key(entity::CONSTITUENTS, 1)), Some(vec![10]));
    }

    #[test]
    fn shape_mismatch_is_a_miss() {
        let cache = QueryCache::new();
        let k = key(entity::PARTIES, 0);
        cache.store(&k, &"text");
        assert!(matches!(cache.lookup::<Vec<u32>>(&k), Lookup::Miss));
        cache.clear();
        assert!(cache.is_empty());
    }
}
