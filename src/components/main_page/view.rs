use std::fmt::Write;

use strum::IntoEnumIterator;

use super::sort::{sort_offers, SortType};
use super::state::MainState;
use crate::components::{render_card, render_map};
use crate::store::state::FetchKind;
use crate::store::{selectors, Store};
use crate::view_model::{MapViewModel, OfferCardViewModel};

#[derive(Debug, Clone, PartialEq)]
pub struct CityTab {
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MainViewModel {
    pub tabs: Vec<CityTab>,
    pub city: Option<String>,
    pub count: usize,
    pub sort: SortType,
    pub sort_list_open: bool,
    pub cards: Vec<OfferCardViewModel>,
    pub map: Option<MapViewModel>,
    pub is_loading: bool,
    /// Why the offer list could not be refreshed
    pub error: Option<String>,
}

impl MainViewModel {
    pub fn new(state: &MainState, store: &Store) -> Self {
        store.select(|s| {
            let city = selectors::get_city(s).map(str::to_string);
            let tabs = selectors::get_cities(s)
                .into_iter()
                .map(|c| CityTab {
                    is_active: Some(&c.name) == city.as_ref(),
                    name: c.name,
                })
                .collect();
            let offers = sort_offers(&selectors::get_city_offers(s), state.sort);
            Self {
                tabs,
                city,
                count: offers.len(),
                sort: state.sort,
                sort_list_open: state.sort_list_open,
                cards: offers.iter().map(OfferCardViewModel::new).collect(),
                map: MapViewModel::new(&offers, state.active_card),
                is_loading: selectors::is_loading(s, FetchKind::Offers),
                error: selectors::get_error_for(s, FetchKind::Offers).map(|f| f.error.to_string()),
            }
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let tabs: Vec<String> = self
            .tabs
            .iter()
            .map(|t| {
                if t.is_active {
                    format!("[{}]", t.name)
                } else {
                    t.name.clone()
                }
            })
            .collect();
        let _ = writeln!(out, "{}", tabs.join(" | "));

        if self.is_loading {
            let _ = writeln!(out, "Loading...");
            return out;
        }
        if let Some(ref error) = self.error {
            let _ = writeln!(out, "Could not load offers: {error}");
        }

        let city = self.city.as_deref().unwrap_or_default();
        if self.cards.is_empty() {
            let _ = writeln!(out, "No places to stay available");
            let _ = writeln!(
                out,
                "We could not find any property available at the moment in {city}"
            );
            return out;
        }

        let _ = writeln!(out, "{} places to stay in {city}", self.count);
        let _ = write!(out, "Sort by: {}", self.sort);
        if self.sort_list_open {
            let options: Vec<String> = SortType::iter().map(|s| s.to_string()).collect();
            let _ = write!(out, " ({})", options.join(", "));
        }
        let _ = writeln!(out);
        for card in &self.cards {
            let _ = writeln!(out, "{}", render_card(card));
        }
        if let Some(ref map) = self.map {
            let _ = writeln!(out, "{}", render_map(map));
        }
        out
    }
}
