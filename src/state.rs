//! Selection and filter state for the league list.
//!
//! [`LeagueBrowser`] owns the loaded leagues plus the three user-driven fields
//! (search term, sport filter, selected league). The derived views are
//! recomputed eagerly after every mutation, so reading them never observes a
//! stale intermediate.
//!
//! Loading is split into `begin_*` / [`LeagueBrowser::finish_load`] around the
//! await point. Each begin hands out a [`LoadTicket`]; a result presented with
//! an outdated ticket (after teardown or a newer load) is discarded.

use log::{debug, error, info, warn};

use crate::config::ALL_SPORTS;
use crate::data::FetchError;
use crate::utils::{filter_leagues, sport_options};
use crate::League;

/// Proof that a load was started by this browser at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueBrowser {
    all_leagues: Vec<League>,
    search_term: String,
    selected_sport: String,
    selected_league_id: Option<String>,
    loading: bool,
    error: Option<String>,
    // Derived
    sport_options: Vec<String>,
    filtered_leagues: Vec<League>,
    // Lifecycle
    generation: u64,
    initial_load_started: bool,
    torn_down: bool,
}

impl Default for LeagueBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl LeagueBrowser {
    pub fn new() -> Self {
        Self {
            all_leagues: Vec::new(),
            search_term: String::new(),
            selected_sport: ALL_SPORTS.to_string(),
            selected_league_id: None,
            loading: false,
            error: None,
            sport_options: vec![ALL_SPORTS.to_string()],
            filtered_leagues: Vec::new(),
            generation: 0,
            initial_load_started: false,
            torn_down: false,
        }
    }

    /// A browser that already holds `leagues`, as if the initial load succeeded.
    pub fn with_leagues(leagues: Vec<League>) -> Self {
        let mut browser = Self::new();
        browser.initial_load_started = true;
        browser.all_leagues = leagues;
        browser.recompute();
        browser
    }

    // ── accessors ────────────────────────────────────────────────────────────

    pub fn leagues(&self) -> &[League] {
        &self.all_leagues
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected_sport(&self) -> &str {
        &self.selected_sport
    }

    pub fn selected_league_id(&self) -> Option<&str> {
        self.selected_league_id.as_deref()
    }

    /// True while a load is pending, and before the initial load has begun.
    pub fn is_loading(&self) -> bool {
        self.loading || (!self.initial_load_started && !self.torn_down)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `"All"` followed by the distinct sports of the loaded leagues.
    pub fn sport_options(&self) -> &[String] {
        &self.sport_options
    }

    /// Leagues passing the current sport filter and search term.
    pub fn filtered_leagues(&self) -> &[League] {
        &self.filtered_leagues
    }

    // ── user actions ─────────────────────────────────────────────────────────

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.recompute_filtered();
    }

    pub fn set_selected_sport(&mut self, sport: impl Into<String>) {
        self.selected_sport = sport.into();
        self.recompute_filtered();
    }

    /// Select `id`, or clear the selection if `id` is already selected.
    pub fn toggle_league_selection(&mut self, id: &str) {
        if self.selected_league_id.as_deref() == Some(id) {
            debug!("Deselecting league {}", id);
            self.selected_league_id = None;
        } else {
            debug!("Selecting league {}", id);
            self.selected_league_id = Some(id.to_string());
        }
    }

    // ── loading lifecycle ────────────────────────────────────────────────────

    /// Start the one initial load. Returns `None` on every later call.
    pub fn begin_initial_load(&mut self) -> Option<LoadTicket> {
        if self.initial_load_started || self.torn_down {
            return None;
        }
        self.initial_load_started = true;
        Some(self.start_load())
    }

    /// Re-run the list fetch after a failure. Ignored while a load is pending.
    pub fn retry_load(&mut self) -> Option<LoadTicket> {
        if self.loading || self.torn_down {
            return None;
        }
        self.initial_load_started = true;
        Some(self.start_load())
    }

    fn start_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply a load result. Returns `false` when the ticket is stale.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<League>, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation || self.torn_down {
            warn!(
                "Discarding stale league list (ticket {}, current {})",
                ticket.generation, self.generation
            );
            return false;
        }

        match result {
            Ok(leagues) => {
                info!("Loaded {} leagues", leagues.len());
                self.all_leagues = leagues;
                self.error = None;
                self.recompute();
            }
            Err(e) => {
                error!("Failed to fetch leagues: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
        true
    }

    /// Invalidate any outstanding load. Later results are dropped.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.generation += 1;
        self.loading = false;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ── derivation ───────────────────────────────────────────────────────────

    fn recompute(&mut self) {
        self.sport_options = sport_options(&self.all_leagues);
        self.recompute_filtered();
    }

    fn recompute_filtered(&mut self) {
        self.filtered_leagues =
            filter_leagues(&self.all_leagues, &self.search_term, &self.selected_sport);
    }
}
