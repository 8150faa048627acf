//! Address autocomplete bookkeeping shared by every location input.
//!
//! The browser side debounces keystrokes, aborts superseded requests and
//! talks to `/address/search`; this module holds the pieces that decide what
//! to ask and what to keep: query normalization, a small result cache, and a
//! generation counter that tells a late response it is no longer wanted.

use crate::model::address::AddressResult;
use indexmap::IndexMap;

/// Delay between the last keystroke and the search request.
pub const ADDRESS_DEBOUNCE_MS: u32 = 300;

/// Maximum number of cached queries.
pub const ADDRESS_CACHE_CAPACITY: usize = 50;

/// Shorter queries are not sent.
pub const MIN_QUERY_CHARS: usize = 2;

/// Cache key for a query: trimmed and lower-cased.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Bounded query → results cache. When full, the entry inserted longest ago
/// is evicted; storing a query again makes it the newest.
#[derive(Debug, Clone)]
pub struct AddressCache {
    capacity: usize,
    entries: IndexMap<String, Vec<AddressResult>>,
}

impl Default for AddressCache {
    fn default() -> Self {
        Self::with_capacity(ADDRESS_CACHE_CAPACITY)
    }
}

impl AddressCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: IndexMap::new(),
        }
    }

    pub fn get(&self, query: &str) -> Option<&[AddressResult]> {
        self.entries.get(&normalize_query(query)).map(Vec::as_slice)
    }

    pub fn insert(&mut self, query: &str, results: Vec<AddressResult>) {
        let key = normalize_query(query);
        self.entries.shift_remove(&key);
        self.entries.insert(key, results);
        while self.entries.len() > self.capacity {
            self.entries.shift_remove_index(0);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hands out increasing tickets; only the latest ticket may publish results.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchGeneration {
    current: u64,
}

impl SearchGeneration {
    /// Starts a new search, superseding every earlier ticket.
    pub fn next(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(name: &str) -> Vec<AddressResult> {
        vec![AddressResult {
            subdistrict: name.to_string(),
            district: String::new(),
            province: String::new(),
            postal_code: String::new(),
        }]
    }

    #[test]
    fn keys_are_case_and_space_insensitive() {
        let mut cache = AddressCache::default();
        cache.insert("  Bang ", result("a"));
        assert_eq!(cache.get("bang").unwrap()[0].subdistrict, "a");
        assert!(cache.get("ban").is_none());
    }

    #[test]
    fn oldest_entry_is_evicted_at_capacity() {
        let mut cache = AddressCache::default();
        for i in 0..ADDRESS_CACHE_CAPACITY {
            cache.insert(&format!("q{i}"), result("x"));
        }
        cache.insert("q0", result("refreshed"));
        cache.insert("new", result("y"));
        assert_eq!(cache.len(), ADDRESS_CACHE_CAPACITY);
        assert!(cache.get("q1").is_none());
        assert_eq!(cache.get("q0").unwrap()[0].subdistrict, "refreshed");
        assert!(cache.get("new").is_some());
    }

    #[test]
    fn only_the_latest_ticket_is_current() {
        let mut generation = SearchGeneration::default();
        let first = generation.next();
        let second = generation.next();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn short_queries_are_not_searched() {
        assert!(!is_searchable(" ก "));
        assert!(is_searchable("บาง"));
    }
}
