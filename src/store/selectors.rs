//! Read access to the store. Views go through these functions instead of
//! looking at `State` fields.

use im::Vector;
use itertools::Itertools;

use super::state::{AuthorizationStatus, Failure, FetchKind, State};
use crate::environment::types::{AuthInfo, City, Location, Offer, OfferId, Review};

pub const MAX_REVIEWS: usize = 10;

pub fn get_offers(state: &State) -> &Vector<Offer> {
    &state.offers
}

pub fn get_city(state: &State) -> Option<&str> {
    state.city.as_deref()
}

/// All cities with offers, in order of first appearance
pub fn get_cities(state: &State) -> Vec<City> {
    state
        .offers
        .iter()
        .map(|o| &o.city)
        .unique_by(|c| c.name.clone())
        .cloned()
        .collect()
}

/// The offers of the selected city in their original order
pub fn get_city_offers(state: &State) -> Vec<Offer> {
    let Some(city) = get_city(state) else {
        return Vec::new();
    };
    state
        .offers
        .iter()
        .filter(|o| o.city.name == city)
        .cloned()
        .collect()
}

pub fn get_city_location(state: &State) -> Option<Location> {
    let city = get_city(state)?;
    state
        .offers
        .iter()
        .find(|o| o.city.name == city)
        .map(|o| o.city.location.clone())
}

pub fn get_requested_offer_id(state: &State) -> Option<OfferId> {
    state.requested_offer
}

/// The detail offer, but only if it is the one currently asked for
pub fn get_current_offer(state: &State) -> Option<&Offer> {
    let offer = state.current_offer.as_ref()?;
    match state.requested_offer {
        Some(id) if id != offer.id => None,
        _ => Some(offer),
    }
}

pub fn get_nearby_offers(state: &State) -> Vec<Offer> {
    if state.nearby_offers_for != state.requested_offer {
        return Vec::new();
    }
    state.nearby_offers.iter().cloned().collect()
}

pub fn get_favorite_offers(state: &State) -> &Vector<Offer> {
    &state.favorite_offers
}

pub fn get_favorite_count(state: &State) -> usize {
    state.favorite_offers.len()
}

/// Favorites grouped by city name, cities in order of first appearance
pub fn get_favorites_by_city(state: &State) -> Vec<(String, Vec<Offer>)> {
    let cities: Vec<&str> = state
        .favorite_offers
        .iter()
        .map(|o| o.city.name.as_str())
        .unique()
        .collect();
    cities
        .into_iter()
        .map(|city| {
            let offers = state
                .favorite_offers
                .iter()
                .filter(|o| o.city.name == city)
                .cloned()
                .collect();
            (city.to_string(), offers)
        })
        .collect()
}

fn reviews_for_current(state: &State) -> Option<&Vector<Review>> {
    (state.reviews_for.is_some() && state.reviews_for == state.requested_offer)
        .then_some(&state.reviews)
}

/// Newest first, at most `MAX_REVIEWS`
pub fn get_reviews(state: &State) -> Vec<Review> {
    let Some(reviews) = reviews_for_current(state) else {
        return Vec::new();
    };
    reviews
        .iter()
        .sorted_by(|a, b| b.date.cmp(&a.date))
        .take(MAX_REVIEWS)
        .cloned()
        .collect()
}

pub fn get_review_count(state: &State) -> usize {
    reviews_for_current(state).map_or(0, |r| r.len())
}

pub fn get_authorization_status(state: &State) -> AuthorizationStatus {
    state.authorization_status
}

pub fn is_authorized(state: &State) -> bool {
    state.authorization_status == AuthorizationStatus::Auth
}

pub fn get_user(state: &State) -> Option<&AuthInfo> {
    state.user.as_ref()
}

pub fn is_loading(state: &State, kind: FetchKind) -> bool {
    state.loading.is_loading(kind)
}

pub fn is_any_loading(state: &State) -> bool {
    state.loading.is_any_loading()
}

pub fn get_error(state: &State) -> Option<&Failure> {
    state.error.as_ref()
}

/// The last failure, if it was caused by a request of `kind`
pub fn get_error_for(state: &State, kind: FetchKind) -> Option<&Failure> {
    state.error.as_ref().filter(|f| f.kind == kind)
}
