//! Session-local response cache for successful remote lookups.
//!
//! Entries are stored under a logical request key and live as long as the
//! cache itself. There is no eviction, expiry or size bound, and concurrent
//! misses for the same key are not coalesced: two callers racing on an empty
//! key will both hit the network.
//!
//! # Cache Key Structure
//! - `"all_leagues"`: the filtered league list
//! - `"season_badge_<league id>"`: the badge URL for one league
//!
//! # Cache Value Structure
//! - `CachedResponse::Leagues`: leagues with a non-empty sport
//! - `CachedResponse::Badge`: badge URL, or `None` when the league has no badge

use std::cell::RefCell;
use std::collections::HashMap;

use crate::League;

/// Cache key for the full league list.
pub const ALL_LEAGUES_KEY: &str = "all_leagues";

const SEASON_BADGE_PREFIX: &str = "season_badge_";

/// Build the cache key for a league's season badge.
pub fn season_badge_key(league_id: &str) -> String {
    format!("{}{}", SEASON_BADGE_PREFIX, league_id)
}

#[derive(Debug, Clone, PartialEq)]
pub enum CachedResponse {
    Leagues(Vec<League>),
    Badge(Option<String>),
}

/// Interior-mutable key-value store.
/// Single-threaded: the UI event loop is the only writer.
#[derive(Debug, Default)]
pub struct ResponseCache {
    store: RefCell<HashMap<String, CachedResponse>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        self.store.borrow().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: CachedResponse) {
        self.store.borrow_mut().insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_keys_are_prefixed_per_league() {
        assert_eq!(season_badge_key("4328"), "season_badge_4328");
        assert_ne!(season_badge_key("1"), season_badge_key("11"));
    }

    #[test]
    fn get_returns_what_was_set() {
        let cache = ResponseCache::new();
        assert!(cache.get(ALL_LEAGUES_KEY).is_none());

        cache.set(season_badge_key("7"), CachedResponse::Badge(None));
        assert_eq!(
            cache.get(&season_badge_key("7")),
            Some(CachedResponse::Badge(None))
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn set_overwrites_existing_entry() {
        let cache = ResponseCache::new();
        cache.set(ALL_LEAGUES_KEY, CachedResponse::Leagues(Vec::new()));
        let leagues = vec![League {
            id: "1".into(),
            name: "Alpha".into(),
            alternate_name: None,
            sport: "Soccer".into(),
        }];
        cache.set(ALL_LEAGUES_KEY, CachedResponse::Leagues(leagues.clone()));

        assert_eq!(cache.get(ALL_LEAGUES_KEY), Some(CachedResponse::Leagues(leagues)));
        assert_eq!(cache.len(), 1);
    }
}
