use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use league_browser::config::{Endpoints, ALL_SPORTS, NO_LEAGUES_MESSAGE};
use league_browser::{
    BadgeSlot, BadgeState, BadgeTicket, DataService, FetchContext, League, LeagueBrowser,
    Transport, TransportError,
};
use tokio::sync::oneshot;
use tokio::task::{self, LocalSet};

const LEAGUES_URL: &str = "http://sportsdb.test/all_leagues.php";
const BADGE_URL: &str = "http://sportsdb.test/search_all_seasons.php?badge=1&id=";

const ALPHA_BETA: &str = r#"{"leagues":[
    {"idLeague":"1","strLeague":"Alpha","strLeagueAlternate":"","strSport":"Soccer"},
    {"idLeague":"2","strLeague":"Beta","strLeagueAlternate":null,"strSport":"Hockey"},
    {"idLeague":"3","strLeague":"Gamma","strLeagueAlternate":"","strSport":""}
]}"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn endpoints() -> Endpoints {
    Endpoints {
        leagues_url: LEAGUES_URL.to_string(),
        badge_url: BADGE_URL.to_string(),
    }
}

fn badge_url(id: &str) -> String {
    format!("{}{}", BADGE_URL, id)
}

// ──────────────────────────────────────────────────────────────────────────────
// Fakes

/// Answers immediately from a canned table and counts requests per URL.
#[derive(Default)]
struct CannedTransport {
    responses: RefCell<HashMap<String, VecDeque<Result<String, String>>>>,
    requests: RefCell<Vec<String>>,
}

impl CannedTransport {
    fn respond(self, url: &str, body: Result<&str, &str>) -> Self {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(body.map(str::to_string).map_err(str::to_string));
        self
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl Transport for CannedTransport {
    async fn get_text(&self, url: &str) -> Result<String, TransportError> {
        self.requests.borrow_mut().push(url.to_string());
        let next = self
            .responses
            .borrow_mut()
            .get_mut(url)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(TransportError::Other(message)),
            None => Err(TransportError::Other(format!("404 Not Found: {}", url))),
        }
    }
}

type Gate = oneshot::Sender<Result<String, String>>;

/// Holds every request open until the test releases it.
#[derive(Default)]
struct GatedTransport {
    gates: RefCell<HashMap<String, VecDeque<Gate>>>,
    requests: Cell<usize>,
}

impl GatedTransport {
    fn in_flight(&self) -> usize {
        self.gates.borrow().values().map(VecDeque::len).sum()
    }

    fn release(&self, url: &str, body: Result<&str, &str>) {
        let gate = self
            .gates
            .borrow_mut()
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .expect("no request in flight for url");
        let _ = gate.send(body.map(str::to_string).map_err(str::to_string));
    }
}

#[async_trait(?Send)]
impl Transport for GatedTransport {
    async fn get_text(&self, url: &str) -> Result<String, TransportError> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(tx);
        self.requests.set(self.requests.get() + 1);

        match rx.await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(message)) => Err(TransportError::Other(message)),
            Err(_) => Err(TransportError::Other("request dropped".to_string())),
        }
    }
}

async fn wait_for_in_flight(transport: &GatedTransport, count: usize) {
    while transport.in_flight() < count {
        task::yield_now().await;
    }
}

/// What a league card does with its ticket once the fetch resolves.
async fn resolve_badge<T: Transport>(
    service: Rc<DataService<T>>,
    slot: Rc<RefCell<BadgeSlot>>,
    ticket: BadgeTicket,
) -> bool {
    let league_id = slot.borrow().league_id().to_string();
    let result = service.fetch_season_badge(&league_id).await;
    slot.borrow_mut().resolve(ticket, result)
}

// ──────────────────────────────────────────────────────────────────────────────
// Data access

#[tokio::test]
async fn league_list_is_fetched_once_per_session() {
    init_logging();
    let transport = CannedTransport::default().respond(LEAGUES_URL, Ok(ALPHA_BETA));
    let service = DataService::new(transport, endpoints());

    let first = service.fetch_all_leagues().await.unwrap();
    let second = service.fetch_all_leagues().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(service.transport().request_count(), 1);
    let ids: Vec<_> = first.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn failed_league_fetch_is_not_cached() {
    init_logging();
    let transport = CannedTransport::default()
        .respond(LEAGUES_URL, Err("connection reset"))
        .respond(LEAGUES_URL, Ok(ALPHA_BETA));
    let service = DataService::new(transport, endpoints());

    let err = service.fetch_all_leagues().await.unwrap_err();
    assert_eq!(err.context, FetchContext::Leagues);
    assert_eq!(err.message, "connection reset");
    assert!(service.cache().is_empty());

    assert_eq!(service.fetch_all_leagues().await.unwrap().len(), 2);
    assert_eq!(service.transport().request_count(), 2);
}

#[tokio::test]
async fn body_without_leagues_is_a_failure() {
    init_logging();
    let transport = CannedTransport::default().respond(LEAGUES_URL, Ok(r#"{"leagues":null}"#));
    let service = DataService::new(transport, endpoints());

    let err = service.fetch_all_leagues().await.unwrap_err();
    assert_eq!(err.message, NO_LEAGUES_MESSAGE);
    assert_eq!(err.to_string(), "Failed to fetch leagues: No leagues found");
    assert!(service.cache().is_empty());
}

#[tokio::test]
async fn missing_badge_is_cached_as_none() {
    init_logging();
    let transport = CannedTransport::default().respond(&badge_url("1"), Ok(r#"{"seasons":[]}"#));
    let service = DataService::new(transport, endpoints());

    assert_eq!(service.fetch_season_badge("1").await, Ok(None));
    assert_eq!(service.fetch_season_badge("1").await, Ok(None));
    assert_eq!(service.transport().request_count(), 1);
}

#[tokio::test]
async fn badge_failure_is_not_cached() {
    init_logging();
    let transport = CannedTransport::default()
        .respond(&badge_url("1"), Err("503 Service Unavailable"))
        .respond(
            &badge_url("1"),
            Ok(r#"{"seasons":[{"idLeague":"1","strBadge":"https://img/1.png"}]}"#),
        );
    let service = DataService::new(transport, endpoints());

    let err = service.fetch_season_badge("1").await.unwrap_err();
    assert_eq!(err.context, FetchContext::Badge);
    assert_eq!(
        service.fetch_season_badge("1").await,
        Ok(Some("https://img/1.png".to_string()))
    );
    assert_eq!(service.transport().request_count(), 2);
}

#[tokio::test]
async fn concurrent_misses_are_not_coalesced() {
    init_logging();
    let service = Rc::new(DataService::new(GatedTransport::default(), endpoints()));

    LocalSet::new()
        .run_until(async {
            let a = task::spawn_local({
                let service = service.clone();
                async move { service.fetch_all_leagues().await }
            });
            let b = task::spawn_local({
                let service = service.clone();
                async move { service.fetch_all_leagues().await }
            });
            wait_for_in_flight(service.transport(), 2).await;

            service.transport().release(LEAGUES_URL, Ok(ALPHA_BETA));
            service.transport().release(LEAGUES_URL, Ok(ALPHA_BETA));
            assert!(a.await.unwrap().is_ok());
            assert!(b.await.unwrap().is_ok());
        })
        .await;

    assert_eq!(service.transport().requests.get(), 2);
}

// ──────────────────────────────────────────────────────────────────────────────
// State flow

#[tokio::test]
async fn initial_load_feeds_filters() {
    init_logging();
    let transport = CannedTransport::default().respond(LEAGUES_URL, Ok(ALPHA_BETA));
    let service = DataService::new(transport, endpoints());
    let mut browser = LeagueBrowser::new();

    let ticket = browser.begin_initial_load().unwrap();
    assert!(browser.is_loading());
    let result = service.fetch_all_leagues().await;
    assert!(browser.finish_load(ticket, result));

    assert!(!browser.is_loading());
    assert_eq!(browser.sport_options(), &["All", "Soccer", "Hockey"]);

    browser.set_selected_sport("Hockey");
    let names: Vec<_> = browser.filtered_leagues().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Beta"]);

    browser.set_selected_sport(ALL_SPORTS);
    browser.set_search_term("lph");
    let names: Vec<_> = browser.filtered_leagues().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha"]);
}

#[tokio::test]
async fn list_error_surfaces_and_state_stays_usable() {
    init_logging();
    let transport = CannedTransport::default().respond(LEAGUES_URL, Err(""));
    let service = DataService::new(transport, endpoints());
    let mut browser = LeagueBrowser::new();

    let ticket = browser.begin_initial_load().unwrap();
    let result = service.fetch_all_leagues().await;
    browser.finish_load(ticket, result);

    assert_eq!(
        browser.error(),
        Some("Failed to fetch leagues: An unknown error occurred while fetching leagues.")
    );
    browser.set_search_term("x");
    browser.toggle_league_selection("1");
    assert_eq!(browser.selected_league_id(), Some("1"));
}

#[tokio::test]
async fn teardown_discards_pending_league_list() {
    init_logging();
    let service = Rc::new(DataService::new(GatedTransport::default(), endpoints()));
    let browser = Rc::new(RefCell::new(LeagueBrowser::new()));

    LocalSet::new()
        .run_until(async {
            let ticket = browser.borrow_mut().begin_initial_load().unwrap();
            let load = task::spawn_local({
                let service = service.clone();
                let browser = browser.clone();
                async move {
                    let result = service.fetch_all_leagues().await;
                    browser.borrow_mut().finish_load(ticket, result)
                }
            });
            wait_for_in_flight(service.transport(), 1).await;

            browser.borrow_mut().teardown();
            service.transport().release(LEAGUES_URL, Ok(ALPHA_BETA));
            assert!(!load.await.unwrap());
        })
        .await;

    assert!(browser.borrow().leagues().is_empty());
    assert!(!browser.borrow().is_loading());
}

#[tokio::test]
async fn empty_seasons_leave_badge_empty_not_failed() {
    init_logging();
    let transport = CannedTransport::default().respond(&badge_url("1"), Ok(r#"{"seasons":[]}"#));
    let service = Rc::new(DataService::new(transport, endpoints()));
    let slot = Rc::new(RefCell::new(BadgeSlot::new("1")));

    let ticket = slot.borrow_mut().sync_selection(Some("1")).unwrap();
    assert!(resolve_badge(service, slot.clone(), ticket).await);
    assert_eq!(slot.borrow().state(), &BadgeState::Empty);
}

#[tokio::test]
async fn late_badge_for_deselected_league_is_ignored() {
    init_logging();
    let service = Rc::new(DataService::new(GatedTransport::default(), endpoints()));
    let mut browser = LeagueBrowser::with_leagues(vec![
        League {
            id: "1".into(),
            name: "Alpha".into(),
            alternate_name: None,
            sport: "Soccer".into(),
        },
        League {
            id: "2".into(),
            name: "Beta".into(),
            alternate_name: None,
            sport: "Hockey".into(),
        },
    ]);
    let slot1 = Rc::new(RefCell::new(BadgeSlot::new("1")));
    let slot2 = Rc::new(RefCell::new(BadgeSlot::new("2")));

    LocalSet::new()
        .run_until(async {
            browser.toggle_league_selection("1");
            let t1 = slot1
                .borrow_mut()
                .sync_selection(browser.selected_league_id())
                .unwrap();
            assert!(slot2
                .borrow_mut()
                .sync_selection(browser.selected_league_id())
                .is_none());
            let fetch1 = task::spawn_local(resolve_badge(service.clone(), slot1.clone(), t1));
            wait_for_in_flight(service.transport(), 1).await;

            browser.toggle_league_selection("2");
            assert!(slot1
                .borrow_mut()
                .sync_selection(browser.selected_league_id())
                .is_none());
            let t2 = slot2
                .borrow_mut()
                .sync_selection(browser.selected_league_id())
                .unwrap();
            let fetch2 = task::spawn_local(resolve_badge(service.clone(), slot2.clone(), t2));
            wait_for_in_flight(service.transport(), 2).await;

            service.transport().release(
                &badge_url("2"),
                Ok(r#"{"seasons":[{"idLeague":"2","strBadge":"https://img/2.png"}]}"#),
            );
            assert!(fetch2.await.unwrap());

            service.transport().release(
                &badge_url("1"),
                Ok(r#"{"seasons":[{"idLeague":"1","strBadge":"https://img/1.png"}]}"#),
            );
            assert!(!fetch1.await.unwrap());
        })
        .await;

    assert_eq!(slot1.borrow().state(), &BadgeState::Idle);
    assert_eq!(
        slot2.borrow().state(),
        &BadgeState::Ready("https://img/2.png".to_string())
    );
}

#[test]
fn filtered_leagues_respect_sport_and_search() {
    let leagues: Vec<League> = [
        ("1", "Premier League", Some("EPL"), "Soccer"),
        ("2", "Championship", None, "Soccer"),
        ("3", "NHL", Some("National Hockey League"), "Ice Hockey"),
        ("4", "KHL", Some("Kontinental Hockey League"), "Ice Hockey"),
        ("5", "Super League", None, "Rugby"),
    ]
    .into_iter()
    .map(|(id, name, alt, sport)| League {
        id: id.to_string(),
        name: name.to_string(),
        alternate_name: alt.map(str::to_string),
        sport: sport.to_string(),
    })
    .collect();
    let mut browser = LeagueBrowser::with_leagues(leagues);

    let sports = browser.sport_options().to_vec();
    assert_eq!(sports[0], ALL_SPORTS);
    for sport in sports.iter().skip(1) {
        for term in ["", "league", "HOCKEY", "ep", "zzz"] {
            browser.set_selected_sport(sport.as_str());
            browser.set_search_term(term);
            for league in browser.filtered_leagues() {
                assert_eq!(&league.sport, sport);
                let needle = term.to_lowercase();
                assert!(
                    league.name.to_lowercase().contains(&needle)
                        || league
                            .alternate_name
                            .as_deref()
                            .is_some_and(|alt| alt.to_lowercase().contains(&needle)),
                    "{} does not match {:?}",
                    league.name,
                    term
                );
            }
        }
    }
}
