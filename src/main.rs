//! Main module for the League Browser application using Yew.
//! Wires the data service, league state and view components.

use league_browser::components::{LeagueGrid, SearchBox, SportDropdown};
use league_browser::hooks::{use_league_browser, ServiceHandle};
use league_browser::DataService;
use yew::prelude::*;

/// Toolbar, status banners and the league grid.
#[function_component(Main)]
fn main_component() -> Html {
    let leagues = use_league_browser();
    let browser = leagues.get();

    let body = if browser.is_loading() {
        html! { <div class="loading">{ "Loading leagues..." }</div> }
    } else if let Some(err) = browser.error() {
        html! {
            <div class="error">
                { format!("Error: {}", err) }
                <button class="btn-secondary small" onclick={leagues.on_retry.reform(|_: MouseEvent| ())}>
                    { "Retry" }
                </button>
            </div>
        }
    } else {
        html! {
            <LeagueGrid
                leagues={browser.filtered_leagues().to_vec()}
                selected_league_id={browser.selected_league_id().map(str::to_string)}
                on_click={leagues.on_toggle_league.clone()}
            />
        }
    };

    html! {
        <div class="wrapper">
            <div class="container">
                <div class="toolbar">
                    <SearchBox
                        value={browser.search_term().to_string()}
                        on_search={leagues.on_search.clone()}
                    />
                    <SportDropdown
                        selection={browser.selected_sport().to_string()}
                        options={browser.sport_options().to_vec()}
                        on_select={leagues.on_select_sport.clone()}
                    />
                </div>
                { body }
            </div>
        </div>
    }
}

/// App wrapper providing the shared data service to every component.
#[function_component]
pub fn App() -> Html {
    let service = use_state(|| ServiceHandle::new(DataService::http()));
    html! {
        <ContextProvider<ServiceHandle> context={(*service).clone()}>
            <Main />
        </ContextProvider<ServiceHandle>>
    }
}

/// Entry point: initializes logging and the Yew renderer for the App component.
fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
