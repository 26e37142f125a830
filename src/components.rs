//! Yew view components for the league browser.
//!
//! Components render from props; the only stateful ones are [`SearchBox`]
//! (debounced text) and [`LeagueCard`] (its own badge slot).

use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::badge::BadgeState;
use crate::config::{DEBOUNCE_MS, NO_LEAGUES_MESSAGE};
use crate::hooks::{use_badge_slot, use_debounced_input};
use crate::League;

#[derive(Properties, PartialEq)]
pub struct SearchBoxProps {
    pub value: String,
    pub on_search: Callback<String>,
}

#[function_component(SearchBox)]
pub fn search_box(props: &SearchBoxProps) -> Html {
    let input = use_debounced_input(props.value.clone(), DEBOUNCE_MS, props.on_search.clone());

    html! {
        <input
            class="search"
            type="text"
            placeholder="Filter by name..."
            value={input.text}
            oninput={input.on_input}
        />
    }
}

#[derive(Properties, PartialEq)]
pub struct SportDropdownProps {
    pub selection: String,
    pub options: Vec<String>,
    pub on_select: Callback<String>,
}

#[function_component(SportDropdown)]
pub fn sport_dropdown(props: &SportDropdownProps) -> Html {
    let onchange = {
        let on_select = props.on_select.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                on_select.emit(select.value());
            }
        })
    };

    html! {
        <select class="dropdown" {onchange}>
            { props.options.iter().map(|option| html! {
                <option
                    key={option.clone()}
                    value={option.clone()}
                    selected={*option == props.selection}
                >
                    { option }
                </option>
            }).collect::<Html>() }
        </select>
    }
}

#[derive(Properties, PartialEq)]
pub struct LeagueGridProps {
    pub leagues: Vec<League>,
    pub selected_league_id: Option<String>,
    pub on_click: Callback<String>,
}

/// Card grid, or a placeholder when nothing matches the filters.
#[function_component(LeagueGrid)]
pub fn league_grid(props: &LeagueGridProps) -> Html {
    if props.leagues.is_empty() {
        return html! {
            <div class="grid">
                <div class="no-content">{ NO_LEAGUES_MESSAGE }</div>
            </div>
        };
    }

    html! {
        <div class="grid">
            { props.leagues.iter().map(|league| html! {
                <LeagueCard
                    key={league.id.clone()}
                    league={league.clone()}
                    selected_league_id={props.selected_league_id.clone()}
                    on_click={props.on_click.clone()}
                />
            }).collect::<Html>() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LeagueCardProps {
    pub league: League,
    pub selected_league_id: Option<String>,
    pub on_click: Callback<String>,
}

#[function_component(LeagueCard)]
pub fn league_card(props: &LeagueCardProps) -> Html {
    let badge = use_badge_slot(props.league.id.clone(), props.selected_league_id.clone());
    let is_selected = props.selected_league_id.as_deref() == Some(props.league.id.as_str());

    let onclick = {
        let id = props.league.id.clone();
        props.on_click.reform(move |_: MouseEvent| id.clone())
    };

    html! {
        <div class={classes!("card", is_selected.then_some("selected"))} {onclick}>
            <h2>{ props.league.name.clone() }</h2>
            if let Some(alt) = &props.league.alternate_name {
                <p class="alternate">{ alt }</p>
            }
            <p class="sport">{ props.league.sport.clone() }</p>
            if is_selected {
                { render_badge(&props.league.name, &badge) }
            }
        </div>
    }
}

/// Badge area of a selected card.
fn render_badge(league_name: &str, badge: &BadgeState) -> Html {
    match badge {
        BadgeState::Idle => html! {},
        BadgeState::Loading => html! { <p class="badge-loading">{ "Loading badge..." }</p> },
        BadgeState::Ready(url) => html! {
            <img class="badge" src={url.clone()} alt={format!("{} badge", league_name)} />
        },
        BadgeState::Empty | BadgeState::Failed(_) => html! {
            <p class="badge-error">{ badge.message().unwrap_or_default().to_string() }</p>
        },
    }
}
