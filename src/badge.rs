//! Per-league badge resolution.
//!
//! Each league card owns a [`BadgeSlot`]. The slot follows the global
//! selection: when its league becomes selected it enters `Loading` and hands
//! out a [`BadgeTicket`] for the fetch; when the league stops being selected
//! it drops back to `Idle` and every ticket issued so far goes stale.

use log::{debug, warn};

use crate::config::NO_BADGE_MESSAGE;
use crate::data::FetchError;
use crate::SeasonBadge;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BadgeState {
    #[default]
    Idle,
    Loading,
    Ready(String),
    /// The league has no badge. A normal outcome, not an error.
    Empty,
    Failed(String),
}

impl BadgeState {
    /// Text shown in the badge area, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            BadgeState::Empty => Some(NO_BADGE_MESSAGE),
            BadgeState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadgeSlot {
    league_id: String,
    selected: bool,
    state: BadgeState,
    generation: u64,
}

impl BadgeSlot {
    pub fn new(league_id: impl Into<String>) -> Self {
        Self {
            league_id: league_id.into(),
            selected: false,
            state: BadgeState::Idle,
            generation: 0,
        }
    }

    pub fn league_id(&self) -> &str {
        &self.league_id
    }

    pub fn state(&self) -> &BadgeState {
        &self.state
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// The resolved badge, once `Ready`.
    pub fn badge(&self) -> Option<SeasonBadge> {
        match &self.state {
            BadgeState::Ready(url) => Some(SeasonBadge {
                league_id: self.league_id.clone(),
                badge_url: url.clone(),
            }),
            _ => None,
        }
    }

    /// Follow a change of the global selection.
    ///
    /// Returns a ticket when this league just became selected and its badge
    /// must be fetched. Any other transition returns `None`.
    pub fn sync_selection(&mut self, selected_league_id: Option<&str>) -> Option<BadgeTicket> {
        let now_selected = selected_league_id == Some(self.league_id.as_str());
        if now_selected == self.selected {
            return None;
        }
        self.selected = now_selected;
        self.generation += 1;

        if now_selected {
            debug!("League {} selected, loading badge", self.league_id);
            self.state = BadgeState::Loading;
            Some(BadgeTicket {
                generation: self.generation,
            })
        } else {
            debug!("League {} deselected, badge reset", self.league_id);
            self.state = BadgeState::Idle;
            None
        }
    }

    /// Apply a fetch result. Returns `false` if the ticket went stale.
    pub fn resolve(
        &mut self,
        ticket: BadgeTicket,
        result: Result<Option<String>, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation || !self.selected {
            warn!(
                "Discarding stale badge response for league {} (ticket {}, current {})",
                self.league_id, ticket.generation, self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(Some(url)) => BadgeState::Ready(url),
            Ok(None) => BadgeState::Empty,
            Err(e) => BadgeState::Failed(format!("Failed to fetch badge: {}", e.message)),
        };
        true
    }

    /// Drop back to `Idle` and invalidate outstanding tickets.
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.selected = false;
        self.state = BadgeState::Idle;
    }
}
