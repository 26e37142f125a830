use crate::config::ALL_SPORTS;
use crate::League;
use std::collections::HashSet;

/// Return `["All", ...]` followed by each sport in first-seen order.
pub fn sport_options(leagues: &[League]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(leagues.len().min(64) + 1);
    out.push(ALL_SPORTS.to_string());
    seen.insert(ALL_SPORTS);

    for league in leagues {
        if seen.insert(league.sport.as_str()) {
            out.push(league.sport.clone());
        }
    }
    out
}

/// Case-insensitive substring match against a league's name or alternate name.
/// `needle` must already be lowercased.
fn matches_search(league: &League, needle: &str) -> bool {
    league.name.to_lowercase().contains(needle)
        || league
            .alternate_name
            .as_deref()
            .is_some_and(|alt| alt.to_lowercase().contains(needle))
}

/// Filter `leagues` by sport and search term, preserving source order.
///
/// The search term is lowercased but not trimmed, so `" nhl"` only matches
/// names containing a space before "nhl".
pub fn filter_leagues(leagues: &[League], search_term: &str, sport: &str) -> Vec<League> {
    let needle = search_term.to_lowercase();
    leagues
        .iter()
        .filter(|league| sport == ALL_SPORTS || league.sport == sport)
        .filter(|league| needle.is_empty() || matches_search(league, &needle))
        .cloned()
        .collect()
}

/// Pass a value through only when it differs from the last one passed.
#[derive(Debug)]
pub struct DistinctFilter<T> {
    last: Option<T>,
}

impl<T: PartialEq + Clone> DistinctFilter<T> {
    /// Seed with a value that counts as already emitted.
    pub fn seeded(initial: T) -> Self {
        Self {
            last: Some(initial),
        }
    }

    pub fn accept(&mut self, value: T) -> Option<T> {
        if self.last.as_ref() == Some(&value) {
            return None;
        }
        self.last = Some(value.clone());
        Some(value)
    }
}
