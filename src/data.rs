//! League data access: remote lookups behind the response cache.
//!
//! The remote API speaks TheSportsDB's wire format (`idLeague`, `strLeague`,
//! ...). Everything is normalized into [`League`] values here so the rest of
//! the crate never sees wire field names.

use async_trait::async_trait;
use log::{debug, error, info};
use serde::Deserialize;

use crate::cache::{season_badge_key, CachedResponse, ResponseCache, ALL_LEAGUES_KEY};
use crate::config::{Endpoints, NO_LEAGUES_MESSAGE, UNKNOWN_BADGE_ERROR, UNKNOWN_LEAGUES_ERROR};
use crate::League;

/// Failure below the JSON layer: network, HTTP status or body read.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Which lookup a [`FetchError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchContext {
    /// The league list. Blocks the whole list view.
    Leagues,
    /// A single league's badge. Scoped to that league.
    Badge,
}

impl FetchContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchContext::Leagues => "leagues",
            FetchContext::Badge => "badge",
        }
    }

    fn subject(&self) -> &'static str {
        match self {
            FetchContext::Leagues => "leagues",
            FetchContext::Badge => "season badge",
        }
    }

    fn fallback_message(&self) -> &'static str {
        match self {
            FetchContext::Leagues => UNKNOWN_LEAGUES_ERROR,
            FetchContext::Badge => UNKNOWN_BADGE_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to fetch {}: {}", .context.subject(), .message)]
pub struct FetchError {
    pub context: FetchContext,
    pub message: String,
}

impl FetchError {
    /// Blank messages are replaced with the context's fallback text.
    pub fn new(context: FetchContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            context.fallback_message().to_string()
        } else {
            message
        };
        Self { context, message }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Wire format

#[derive(Debug, Deserialize)]
struct LeaguesResponse {
    #[serde(default)]
    leagues: Option<Vec<WireLeague>>,
}

#[derive(Debug, Deserialize)]
struct WireLeague {
    #[serde(rename = "idLeague", default)]
    id: Option<String>,
    #[serde(rename = "strLeague", default)]
    name: Option<String>,
    #[serde(rename = "strLeagueAlternate", default)]
    alternate_name: Option<String>,
    #[serde(rename = "strSport", default)]
    sport: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeasonsResponse {
    #[serde(default)]
    seasons: Option<Vec<WireSeason>>,
}

#[derive(Debug, Deserialize)]
struct WireSeason {
    #[serde(rename = "strBadge", default)]
    badge: Option<String>,
}

impl WireLeague {
    /// `None` for leagues without an id or a sport; those never reach the UI.
    fn into_league(self) -> Option<League> {
        let id = self.id.filter(|s| !s.is_empty())?;
        let sport = self.sport.filter(|s| !s.is_empty())?;
        Some(League {
            id,
            name: self.name.unwrap_or_default(),
            alternate_name: self.alternate_name.filter(|s| !s.is_empty()),
            sport,
        })
    }
}

/// Parse a leagues body, dropping leagues without a sport.
fn parse_leagues(body: &str) -> Result<Vec<League>, String> {
    let parsed: LeaguesResponse = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let wire = parsed.leagues.ok_or_else(|| NO_LEAGUES_MESSAGE.to_string())?;
    Ok(wire.into_iter().filter_map(WireLeague::into_league).collect())
}

/// Parse a seasons body into the first season's badge, if any.
fn parse_badge(body: &str) -> Result<Option<String>, String> {
    let parsed: SeasonsResponse = serde_json::from_str(body).map_err(|e| e.to_string())?;
    Ok(parsed
        .seasons
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|season| season.badge)
        .filter(|badge| !badge.is_empty()))
}

// ──────────────────────────────────────────────────────────────────────────────
// Transport

/// Issues GET requests and hands back the raw body.
#[async_trait(?Send)]
pub trait Transport {
    async fn get_text(&self, url: &str) -> Result<String, TransportError>;
}

/// `reqwest`-backed transport. Uses the browser's fetch on wasm32.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String, TransportError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Service

/// Cache-checked access to league lists and badges.
pub struct DataService<T: Transport = HttpTransport> {
    transport: T,
    endpoints: Endpoints,
    cache: ResponseCache,
}

impl DataService<HttpTransport> {
    /// Service against the public endpoints.
    pub fn http() -> Self {
        Self::new(HttpTransport::new(), Endpoints::default())
    }
}

impl<T: Transport> DataService<T> {
    pub fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
            cache: ResponseCache::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch every league that has a sport.
    ///
    /// Served from the cache after the first success. Failures, including a
    /// body without a `leagues` field, leave the cache untouched.
    pub async fn fetch_all_leagues(&self) -> Result<Vec<League>, FetchError> {
        if let Some(CachedResponse::Leagues(leagues)) = self.cache.get(ALL_LEAGUES_KEY) {
            debug!("Cache hit for {} ({} leagues)", ALL_LEAGUES_KEY, leagues.len());
            return Ok(leagues);
        }
        debug!("Cache miss for {}, requesting {}", ALL_LEAGUES_KEY, self.endpoints.leagues_url);

        let leagues = self
            .transport
            .get_text(&self.endpoints.leagues_url)
            .await
            .map_err(|e| e.to_string())
            .and_then(|body| parse_leagues(&body))
            .map_err(|message| {
                let err = FetchError::new(FetchContext::Leagues, message);
                error!("DataService: {}", err);
                err
            })?;

        info!("Fetched {} leagues", leagues.len());
        self.cache
            .set(ALL_LEAGUES_KEY, CachedResponse::Leagues(leagues.clone()));
        Ok(leagues)
    }

    /// Fetch the first season's badge URL for `league_id`.
    ///
    /// `Ok(None)` means the league has no badge; it is cached like any other
    /// successful result.
    pub async fn fetch_season_badge(&self, league_id: &str) -> Result<Option<String>, FetchError> {
        let key = season_badge_key(league_id);
        if let Some(CachedResponse::Badge(badge)) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(badge);
        }
        let url = self.endpoints.badge_url_for(league_id);
        debug!("Cache miss for {}, requesting {}", key, url);

        let badge = self
            .transport
            .get_text(&url)
            .await
            .map_err(|e| e.to_string())
            .and_then(|body| parse_badge(&body))
            .map_err(|message| {
                let err = FetchError::new(FetchContext::Badge, message);
                error!("DataService: {}", err);
                err
            })?;

        info!(
            "Badge for league {}: {}",
            league_id,
            badge.as_deref().unwrap_or("none")
        );
        self.cache.set(key, CachedResponse::Badge(badge.clone()));
        Ok(badge)
    }
}
