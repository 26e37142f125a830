//! Yew hooks binding the plain state objects to component lifetimes.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::debug;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::badge::{BadgeSlot, BadgeState};
use crate::data::DataService;
use crate::state::{LeagueBrowser, LoadTicket};
use crate::utils::DistinctFilter;

/// Shared data service handed down through a Yew context.
#[derive(Clone)]
pub struct ServiceHandle(pub Rc<DataService>);

impl ServiceHandle {
    pub fn new(service: DataService) -> Self {
        Self(Rc::new(service))
    }
}

impl PartialEq for ServiceHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// The service provided by the nearest `ContextProvider<ServiceHandle>`,
/// or a fresh HTTP-backed one when none is mounted.
#[hook]
pub fn use_data_service() -> ServiceHandle {
    let fallback = use_memo((), |_| ServiceHandle::new(DataService::http()));
    use_context::<ServiceHandle>().unwrap_or_else(|| (*fallback).clone())
}

// ──────────────────────────────────────────────────────────────────────────────

/// League list state plus the callbacks that mutate it.
#[derive(Clone)]
pub struct UseLeagueBrowser {
    browser: Rc<RefCell<LeagueBrowser>>,
    pub on_search: Callback<String>,
    pub on_select_sport: Callback<String>,
    pub on_toggle_league: Callback<String>,
    pub on_retry: Callback<()>,
}

impl UseLeagueBrowser {
    /// Borrow the current state for rendering.
    pub fn get(&self) -> std::cell::Ref<'_, LeagueBrowser> {
        self.browser.borrow()
    }
}

/// Spawn the list fetch for a ticket already issued by `browser`.
fn spawn_load(
    browser: Rc<RefCell<LeagueBrowser>>,
    service: ServiceHandle,
    ticket: LoadTicket,
    update: UseForceUpdateHandle,
) {
    wasm_bindgen_futures::spawn_local(async move {
        let result = service.0.fetch_all_leagues().await;
        if browser.borrow_mut().finish_load(ticket, result) {
            update.force_update();
        }
    });
}

/// Own a [`LeagueBrowser`] for the lifetime of the calling component.
///
/// The initial load starts on mount. Unmounting tears the browser down so a
/// response still in flight is discarded.
#[hook]
pub fn use_league_browser() -> UseLeagueBrowser {
    let service = use_data_service();
    let browser = use_mut_ref(LeagueBrowser::new);
    let update = use_force_update();

    {
        let browser = browser.clone();
        let service = service.clone();
        let update = update.clone();
        use_effect_with((), move |_| {
            let ticket = browser.borrow_mut().begin_initial_load();
            if let Some(ticket) = ticket {
                update.force_update();
                spawn_load(browser.clone(), service, ticket, update);
            }
            move || browser.borrow_mut().teardown()
        });
    }

    // Every mutation re-derives synchronously, then asks for a re-render.
    let mutate = {
        let browser = browser.clone();
        let update = update.clone();
        move |f: Box<dyn FnOnce(&mut LeagueBrowser)>| {
            f(&mut *browser.borrow_mut());
            update.force_update();
        }
    };

    let on_search = {
        let mutate = mutate.clone();
        Callback::from(move |term: String| {
            mutate(Box::new(move |b| b.set_search_term(term)));
        })
    };
    let on_select_sport = {
        let mutate = mutate.clone();
        Callback::from(move |sport: String| {
            mutate(Box::new(move |b| b.set_selected_sport(sport)));
        })
    };
    let on_toggle_league = {
        let mutate = mutate.clone();
        Callback::from(move |id: String| {
            mutate(Box::new(move |b| b.toggle_league_selection(&id)));
        })
    };
    let on_retry = {
        let browser = browser.clone();
        let update = update.clone();
        Callback::from(move |_: ()| {
            let ticket = browser.borrow_mut().retry_load();
            if let Some(ticket) = ticket {
                update.force_update();
                spawn_load(browser.clone(), service.clone(), ticket, update.clone());
            }
        })
    };

    UseLeagueBrowser {
        browser,
        on_search,
        on_select_sport,
        on_toggle_league,
        on_retry,
    }
}

// ──────────────────────────────────────────────────────────────────────────────

/// Track the badge of `league_id` as `selected_league_id` changes.
#[hook]
pub fn use_badge_slot(league_id: String, selected_league_id: Option<String>) -> BadgeState {
    let service = use_data_service();
    let slot = {
        let league_id = league_id.clone();
        use_mut_ref(move || BadgeSlot::new(league_id))
    };
    let update = use_force_update();

    {
        let slot = slot.clone();
        let update = update.clone();
        use_effect_with(selected_league_id, move |selected| {
            let before = slot.borrow().state().clone();
            let ticket = slot.borrow_mut().sync_selection(selected.as_deref());
            if *slot.borrow().state() != before {
                update.force_update();
            }

            if let Some(ticket) = ticket {
                let slot = slot.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = service.0.fetch_season_badge(&league_id).await;
                    if slot.borrow_mut().resolve(ticket, result) {
                        update.force_update();
                    }
                });
            }
            || ()
        });
    }

    {
        let slot = slot.clone();
        use_effect_with((), move |_| move || slot.borrow_mut().teardown());
    }

    let state = slot.borrow().state().clone();
    state
}

// ──────────────────────────────────────────────────────────────────────────────

/// Holds the state and callbacks for a debounced text input.
#[derive(Clone)]
pub struct DebouncedInput {
    /// The current text content of the input field.
    pub text: String,
    /// Callback for the input's `oninput` event.
    pub on_input: Callback<InputEvent>,
}

/// Custom hook that echoes keystrokes immediately but emits `on_settle` only
/// after `delay_ms` of quiet, and only when the value actually changed.
#[hook]
pub fn use_debounced_input(
    initial: String,
    delay_ms: u32,
    on_settle: Callback<String>,
) -> DebouncedInput {
    let text = use_state(|| initial.clone());
    // Dropping a `Timeout` cancels it.
    let pending = use_mut_ref(|| None::<Timeout>);
    let distinct = use_mut_ref(|| DistinctFilter::seeded(initial));

    let on_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            text.set(value.clone());

            let distinct = distinct.clone();
            let on_settle = on_settle.clone();
            let handle = Timeout::new(delay_ms, move || {
                if let Some(value) = distinct.borrow_mut().accept(value) {
                    debug!("Search settled on {:?}", value);
                    on_settle.emit(value);
                }
            });
            *pending.borrow_mut() = Some(handle);
        })
    };

    DebouncedInput {
        text: (*text).clone(),
        on_input,
    }
}
