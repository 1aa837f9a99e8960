pub mod favorites;
pub mod header;
pub mod login;
pub mod main_page;
pub mod property;

use std::fmt::Write;

use crate::environment::types::{FavoriteStatus, OfferId};
use crate::environment::Environment;
use crate::route::Route;
use crate::store::{operations, selectors};
use crate::view_model::{MapViewModel, OfferCardViewModel};

/// What a page asks the app to do once it handled an action
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Effect {
    Nothing,
    Navigate(Route),
}

/// Bookmark button on cards and on the property page. Anonymous users are
/// sent to the login page instead.
pub(crate) async fn toggle_favorite(environment: &Environment, id: OfferId) -> Effect {
    let store = &environment.store;
    if !store.select(selectors::is_authorized) {
        return Effect::Navigate(Route::Login);
    }
    let Some(is_favorite) = store.select(|s| s.find_offer(id).map(|o| o.is_favorite)) else {
        log::warn!("Cannot toggle unknown offer {id}");
        return Effect::Nothing;
    };
    let status = FavoriteStatus::toggled(is_favorite);
    match operations::set_favorite_status(store, environment.api(), id, status).await {
        Err(e) if e.is_unauthorized() => Effect::Navigate(Route::Login),
        _ => Effect::Nothing,
    }
}

pub(crate) fn render_card(card: &OfferCardViewModel) -> String {
    let mut line = format!(
        "  #{} {} - €{} night, {}, rating {}%",
        card.id, card.title, card.price, card.kind, card.rating_width
    );
    if card.is_premium {
        line.push_str(", Premium");
    }
    if card.is_favorite {
        line.push_str(", In bookmarks");
    }
    line
}

pub(crate) fn render_map(map: &MapViewModel) -> String {
    let mut line = format!(
        "Map: {:.4},{:.4} zoom {}, {} markers",
        map.center.latitude,
        map.center.longitude,
        map.center.zoom,
        map.points.len()
    );
    if let Some(active) = map.active() {
        let _ = write!(line, ", active #{}", active.id);
    }
    line
}
