//! League browser: lists sports leagues from TheSportsDB, filters them by
//! sport and name, and shows a season badge for the selected league.
//!
//! The data-flow core ([`data`], [`cache`], [`state`], [`badge`]) is plain
//! Rust; [`hooks`] and [`components`] bind it to Yew.

pub mod badge;
pub mod cache;
pub mod components;
pub mod config;
pub mod data;
pub mod hooks;
pub mod state;
pub mod utils;

pub use badge::{BadgeSlot, BadgeState, BadgeTicket};
pub use cache::{CachedResponse, ResponseCache};
pub use data::{DataService, FetchContext, FetchError, HttpTransport, Transport, TransportError};
pub use state::{LeagueBrowser, LoadTicket};

/// A sports league as shown in the UI. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub alternate_name: Option<String>,
    pub sport: String,
}

/// Badge artwork for one league, resolved lazily on selection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeasonBadge {
    pub league_id: String,
    pub badge_url: String,
}
