use std::fmt::Write;

use crate::components::render_card;
use crate::store::state::FetchKind;
use crate::store::{selectors, Store};
use crate::view_model::OfferCardViewModel;

#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesGroup {
    pub city: String,
    pub cards: Vec<OfferCardViewModel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesViewModel {
    pub groups: Vec<FavoritesGroup>,
    pub is_loading: bool,
}

impl FavoritesViewModel {
    pub fn new(store: &Store) -> Self {
        store.select(|s| Self {
            groups: selectors::get_favorites_by_city(s)
                .into_iter()
                .map(|(city, offers)| FavoritesGroup {
                    city,
                    cards: offers.iter().map(OfferCardViewModel::new).collect(),
                })
                .collect(),
            is_loading: selectors::is_loading(s, FetchKind::FavoriteOffers),
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.is_loading {
            let _ = writeln!(out, "Loading...");
            return out;
        }
        if self.groups.is_empty() {
            let _ = writeln!(out, "Nothing yet saved.");
            let _ = writeln!(
                out,
                "Save properties to narrow down search or plan your future trips."
            );
            return out;
        }
        let _ = writeln!(out, "Saved listing");
        for group in &self.groups {
            let _ = writeln!(out, "{}", group.city);
            for card in &group.cards {
                let _ = writeln!(out, "{}", render_card(card));
            }
        }
        out
    }
}
