//! Application-level configuration constants.

// Remote endpoints
pub const LEAGUES_URL: &str = "https://www.thesportsdb.com/api/v1/json/3/all_leagues.php";
pub const BADGE_URL: &str =
    "https://www.thesportsdb.com/api/v1/json/3/search_all_seasons.php?badge=1&id=";

// UI behavior
pub const DEBOUNCE_MS: u32 = 300;

/// Sport filter sentinel that disables sport filtering.
pub const ALL_SPORTS: &str = "All";

// User-facing fallback messages
pub const UNKNOWN_LEAGUES_ERROR: &str = "An unknown error occurred while fetching leagues.";
pub const UNKNOWN_BADGE_ERROR: &str = "An unknown error occurred while fetching the badge.";
pub const NO_LEAGUES_MESSAGE: &str = "No leagues found";
pub const NO_BADGE_MESSAGE: &str = "No badge found";

/// Base URLs the data service talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub leagues_url: String,
    /// Prefix the league id is appended to.
    pub badge_url: String,
}

impl Endpoints {
    pub fn badge_url_for(&self, league_id: &str) -> String {
        format!("{}{}", self.badge_url, league_id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            leagues_url: LEAGUES_URL.to_string(),
            badge_url: BADGE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_url_appends_league_id() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.badge_url_for("4328"),
            "https://www.thesportsdb.com/api/v1/json/3/search_all_seasons.php?badge=1&id=4328"
        );
    }
}
