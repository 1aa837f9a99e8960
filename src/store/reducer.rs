use std::collections::HashSet;

use im::Vector;

use super::action::Action;
use super::state::{AuthorizationStatus, FetchKind, Failure, State};
use crate::environment::types::{Offer, OfferId};

/// Selected after the first load if nothing else was picked
pub const DEFAULT_CITY: &str = "Paris";

/// The single transition function of the store. Never mutates `state`,
/// never performs side effects beyond logging.
pub fn reduce(state: &State, action: Action) -> State {
    log::trace!("{action:?}");
    let mut next = state.clone();

    match action {
        Action::SelectCity(name) => {
            if !next.offers.is_empty() && !has_city(&next.offers, &name) {
                log::warn!("No offers in {name:?}, keeping {:?}", next.city);
            } else {
                next.city = Some(name);
            }
        }
        Action::LoadOffers(offers) => {
            for fresh in offers.iter() {
                refresh(&mut next, fresh);
            }
            next.offers = offers;
            next.city = anchor_city(&next.offers, next.city.take());
        }
        Action::SetLoadStatus(kind, is_loading) => {
            next.loading.set(kind, is_loading);
        }
        Action::FetchStarted(kind) => {
            next.loading.start(kind);
        }
        Action::FetchFinished(ticket) => {
            next.loading.finish(ticket);
        }
        Action::FetchFailed(ticket, error) => {
            // a failed auth check resolves an unknown status as well
            let resolves_auth = ticket.kind == FetchKind::Auth
                && next.authorization_status == AuthorizationStatus::Unknown;
            let predates_session =
                next.user.is_some() && ticket.started_at <= next.session_started;
            if predates_session && error.is_unauthorized() {
                log::debug!("Ignoring 401 of {} sent before the current session", ticket.kind);
            } else if error.is_unauthorized() || resolves_auth {
                sign_out(&mut next);
            }
            if next.loading.is_current(ticket) {
                next.loading.finish(ticket);
                next.error = Some(Failure {
                    kind: ticket.kind,
                    error,
                });
            } else {
                log::debug!("Ignoring stale {} failure: {error}", ticket.kind);
            }
        }
        Action::RequestOffer(id) => {
            next.requested_offer = Some(id);
        }
        Action::LoadCurrentOffer(offer) => {
            if is_requested(&next, offer.id) {
                refresh(&mut next, &offer);
                next.current_offer = Some(offer);
            } else {
                log::debug!("Dropping offer {} for {:?}", offer.id, next.requested_offer);
            }
        }
        Action::LoadNearbyOffers(id, offers) => {
            if is_requested(&next, id) {
                next.nearby_offers = offers;
                next.nearby_offers_for = Some(id);
            }
        }
        Action::LoadReviews(id, reviews) => {
            if is_requested(&next, id) {
                next.reviews = reviews;
                next.reviews_for = Some(id);
            }
        }
        Action::LoadFavoriteOffers(favorites) => {
            let ids: HashSet<OfferId> = favorites.iter().map(|o| o.id).collect();
            for offers in [&mut next.offers, &mut next.nearby_offers] {
                for offer in offers.iter_mut() {
                    offer.is_favorite = ids.contains(&offer.id);
                }
            }
            if let Some(offer) = next.current_offer.as_mut() {
                offer.is_favorite = ids.contains(&offer.id);
            }
            next.favorite_offers = favorites;
        }
        Action::UpdateFavoriteStatus(id, is_favorite) => {
            apply_favorite(&mut next, id, is_favorite, None);
        }
        Action::FavoriteStatusChanged(offer) => {
            apply_favorite(&mut next, offer.id, offer.is_favorite, Some(offer));
        }
        Action::RequireAuthorization(status) => {
            if status != AuthorizationStatus::Auth {
                sign_out(&mut next);
            }
            next.authorization_status = status;
        }
        Action::SetUser(user) => match user {
            Some(user) => {
                next.user = Some(user);
                next.authorization_status = AuthorizationStatus::Auth;
                next.session_started = next.loading.sequence();
            }
            None => sign_out(&mut next),
        },
        Action::ClearError => {
            next.error = None;
        }
        Action::Reset => {
            let mut loading = next.loading.clone();
            loading.invalidate();
            next = State {
                loading,
                ..Default::default()
            };
        }
    }

    next
}

fn has_city(offers: &Vector<Offer>, name: &str) -> bool {
    offers.iter().any(|o| o.city.name == name)
}

/// Keep `current` if offers exist for it, otherwise fall back to the
/// default city or the city of the first offer.
fn anchor_city(offers: &Vector<Offer>, current: Option<String>) -> Option<String> {
    let Some(first) = offers.front() else {
        return current;
    };
    match current {
        Some(city) if has_city(offers, &city) => Some(city),
        _ if has_city(offers, DEFAULT_CITY) => Some(DEFAULT_CITY.to_string()),
        _ => Some(first.city.name.clone()),
    }
}

fn is_requested(state: &State, id: OfferId) -> bool {
    state.requested_offer.map_or(true, |requested| requested == id)
}

/// A newer fetch of an offer replaces every copy held in state
fn refresh(state: &mut State, fresh: &Offer) {
    state.mutate_offer(fresh.id, |offer| *offer = fresh.clone());
    if !fresh.is_favorite {
        state.favorite_offers.retain(|o| o.id != fresh.id);
    }
}

fn apply_favorite(state: &mut State, id: OfferId, is_favorite: bool, fresh: Option<Offer>) {
    if let Some(ref fresh) = fresh {
        refresh(state, fresh);
    }
    state.mutate_offer(id, |offer| offer.is_favorite = is_favorite);

    if !is_favorite {
        state.favorite_offers.retain(|o| o.id != id);
        return;
    }
    if state.favorite_offers.iter().any(|o| o.id == id) {
        return;
    }
    match fresh.or_else(|| state.find_offer(id).cloned()) {
        Some(mut offer) => {
            offer.is_favorite = true;
            state.favorite_offers.push_back(offer);
        }
        None => log::warn!("Offer {id} is not loaded, favorites stay unchanged"),
    }
}

/// Favorites belong to a user, so they go away with the session
fn sign_out(state: &mut State) {
    state.authorization_status = AuthorizationStatus::NoAuth;
    state.user = None;
    state.favorite_offers.clear();
    for offers in [&mut state.offers, &mut state.nearby_offers] {
        for offer in offers.iter_mut().filter(|o| o.is_favorite) {
            offer.is_favorite = false;
        }
    }
    if let Some(offer) = state.current_offer.as_mut() {
        offer.is_favorite = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::model::mock::{make_auth, make_offer, make_review};
    use crate::error::ApiError;
    use crate::store::selectors;

    fn loaded(offers: Vec<Offer>) -> State {
        reduce(&State::default(), Action::LoadOffers(offers.into()))
    }

    fn offers_for_city(state: &State) -> Vec<OfferId> {
        selectors::get_city_offers(state)
            .iter()
            .map(|o| o.id)
            .collect()
    }

    #[test]
    fn test_paris_scenario() {
        let state = State::default();
        assert_eq!(state.city, None);
        assert!(state.offers.is_empty());

        let state = reduce(
            &state,
            Action::LoadOffers(vec![make_offer(1, "Paris", 100), make_offer(2, "Cologne", 90)].into()),
        );
        let state = reduce(&state, Action::SelectCity("Paris".to_string()));
        assert_eq!(offers_for_city(&state), vec![OfferId(1)]);
    }

    #[test]
    fn test_reducer_does_not_touch_input() {
        let before = loaded(vec![make_offer(1, "Paris", 100)]);
        let copy = before.clone();
        let _ = reduce(&before, Action::UpdateFavoriteStatus(OfferId(1), true));
        assert_eq!(before, copy);
    }

    #[test]
    fn test_select_city_does_not_refetch_or_touch_offers() {
        let state = loaded(vec![make_offer(1, "Paris", 100), make_offer(2, "Cologne", 90)]);
        let next = reduce(&state, Action::SelectCity("Cologne".to_string()));
        assert_eq!(next.city.as_deref(), Some("Cologne"));
        assert_eq!(next.offers, state.offers);
        assert_eq!(next.loading, state.loading);
    }

    #[test]
    fn test_unknown_city_is_identity_once_loaded() {
        let state = loaded(vec![make_offer(1, "Paris", 100)]);
        let next = reduce(&state, Action::SelectCity("Atlantis".to_string()));
        assert_eq!(next, state);
    }

    #[test]
    fn test_select_city_before_load() {
        let state = reduce(&State::default(), Action::SelectCity("Hamburg".to_string()));
        assert_eq!(state.city.as_deref(), Some("Hamburg"));
        // the selection has no offers once data arrives
        let state = reduce(&state, Action::LoadOffers(vec![make_offer(1, "Cologne", 10)].into()));
        assert_eq!(state.city.as_deref(), Some("Cologne"));
    }

    #[test]
    fn test_load_offers_prefers_default_city() {
        let state = loaded(vec![make_offer(1, "Cologne", 100), make_offer(2, "Paris", 90)]);
        assert_eq!(state.city.as_deref(), Some(DEFAULT_CITY));
    }

    #[test]
    fn test_load_offers_keeps_valid_selection() {
        let state = loaded(vec![make_offer(1, "Cologne", 100), make_offer(2, "Paris", 90)]);
        let state = reduce(&state, Action::SelectCity("Cologne".to_string()));
        let state = reduce(
            &state,
            Action::LoadOffers(vec![make_offer(3, "Cologne", 100), make_offer(2, "Paris", 90)].into()),
        );
        assert_eq!(state.city.as_deref(), Some("Cologne"));
    }

    #[test]
    fn test_duplicate_load_is_idempotent() {
        let offers: Vector<Offer> = vec![make_offer(1, "Paris", 100), make_offer(2, "Paris", 80)].into();
        let once = reduce(&State::default(), Action::LoadOffers(offers.clone()));
        let twice = reduce(&once, Action::LoadOffers(offers));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_favorite_update_reaches_collection_and_detail() {
        let state = loaded(vec![make_offer(7, "Paris", 100), make_offer(8, "Paris", 120)]);
        let state = reduce(&state, Action::RequestOffer(OfferId(7)));
        let state = reduce(&state, Action::LoadCurrentOffer(make_offer(7, "Paris", 100)));

        let state = reduce(&state, Action::UpdateFavoriteStatus(OfferId(7), true));
        assert!(state.offers[0].is_favorite);
        assert!(!state.offers[1].is_favorite);
        assert!(state.current_offer.as_ref().unwrap().is_favorite);
        assert_eq!(state.favorite_offers.len(), 1);
        assert!(state.favorite_offers[0].is_favorite);

        // duplicate dispatch
        let again = reduce(&state, Action::UpdateFavoriteStatus(OfferId(7), true));
        assert_eq!(again, state);

        let state = reduce(&state, Action::UpdateFavoriteStatus(OfferId(7), false));
        assert!(!state.offers[0].is_favorite);
        assert!(!state.current_offer.as_ref().unwrap().is_favorite);
        assert!(state.favorite_offers.is_empty());
    }

    #[test]
    fn test_favorite_echo_for_unloaded_offer() {
        let mut echo = make_offer(9, "Hamburg", 100);
        echo.is_favorite = true;
        let state = reduce(&State::default(), Action::FavoriteStatusChanged(echo));
        assert_eq!(state.favorite_offers.len(), 1);
        assert_eq!(state.favorite_offers[0].id, OfferId(9));
    }

    #[test]
    fn test_load_favorites_syncs_flags() {
        let state = loaded(vec![make_offer(1, "Paris", 100), make_offer(2, "Paris", 120)]);
        let mut favorite = make_offer(2, "Paris", 120);
        favorite.is_favorite = true;
        let state = reduce(&state, Action::LoadFavoriteOffers(vec![favorite].into()));
        assert!(!state.offers[0].is_favorite);
        assert!(state.offers[1].is_favorite);
    }

    #[test]
    fn test_newer_offer_fetch_supersedes_copies() {
        let state = loaded(vec![make_offer(1, "Paris", 100)]);
        let state = reduce(&state, Action::RequestOffer(OfferId(1)));
        let state = reduce(&state, Action::LoadCurrentOffer(make_offer(1, "Paris", 150)));
        assert_eq!(state.offers[0].price, 150);
        assert_eq!(state.current_offer.as_ref().unwrap().price, 150);
    }

    #[test]
    fn test_offer_for_other_id_is_dropped() {
        let state = reduce(&State::default(), Action::RequestOffer(OfferId(2)));
        let next = reduce(&state, Action::LoadCurrentOffer(make_offer(1, "Paris", 100)));
        assert_eq!(next, state);
        let next = reduce(&state, Action::LoadNearbyOffers(OfferId(1), Vector::new()));
        assert_eq!(next, state);
        let next = reduce(&state, Action::LoadReviews(OfferId(1), vec![make_review(1, 2)].into()));
        assert_eq!(next, state);
    }

    #[test]
    fn test_failed_fetch_keeps_data_and_clears_flag() {
        let state = loaded(vec![make_offer(1, "Paris", 100)]);
        let state = reduce(&state, Action::FetchStarted(FetchKind::Offers));
        let ticket = state.loading.ticket(FetchKind::Offers);
        assert!(state.loading.is_loading(FetchKind::Offers));

        let error = ApiError::NetworkFailure("timeout".to_string());
        let state = reduce(&state, Action::FetchFailed(ticket, error.clone()));
        assert_eq!(state.offers.len(), 1);
        assert!(!state.loading.is_loading(FetchKind::Offers));
        assert_eq!(
            state.error,
            Some(Failure {
                kind: FetchKind::Offers,
                error
            })
        );
        let state = reduce(&state, Action::ClearError);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let state = reduce(&State::default(), Action::FetchStarted(FetchKind::Reviews));
        let stale = state.loading.ticket(FetchKind::Reviews);
        let state = reduce(&state, Action::FetchStarted(FetchKind::Reviews));
        let state = reduce(
            &state,
            Action::FetchFailed(stale, ApiError::NetworkFailure("x".to_string())),
        );
        assert!(state.loading.is_loading(FetchKind::Reviews));
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_unauthorized_signs_out() {
        let state = reduce(&State::default(), Action::SetUser(Some(make_auth("a@b.de"))));
        assert_eq!(state.authorization_status, AuthorizationStatus::Auth);
        let state = reduce(&state, Action::UpdateFavoriteStatus(OfferId(1), true));
        let state = reduce(&state, Action::LoadOffers(vec![make_offer(1, "Paris", 1)].into()));
        let state = reduce(&state, Action::UpdateFavoriteStatus(OfferId(1), true));
        assert_eq!(state.favorite_offers.len(), 1);

        let state = reduce(&state, Action::FetchStarted(FetchKind::FavoriteStatus));
        let ticket = state.loading.ticket(FetchKind::FavoriteStatus);
        let state = reduce(&state, Action::FetchFailed(ticket, ApiError::Unauthorized));
        assert_eq!(state.authorization_status, AuthorizationStatus::NoAuth);
        assert_eq!(state.user, None);
        assert!(state.favorite_offers.is_empty());
        assert!(!state.offers[0].is_favorite);
    }

    #[test]
    fn test_unauthorized_from_before_login_keeps_session() {
        // an auth check with an expired token is still out when login succeeds
        let state = reduce(&State::default(), Action::FetchStarted(FetchKind::Auth));
        let check = state.loading.ticket(FetchKind::Auth);
        let state = reduce(&state, Action::FetchStarted(FetchKind::FavoriteOffers));
        let favorites = state.loading.ticket(FetchKind::FavoriteOffers);
        let state = reduce(&state, Action::FetchStarted(FetchKind::Auth));
        let state = reduce(&state, Action::SetUser(Some(make_auth("a@b.de"))));

        let state = reduce(&state, Action::FetchFailed(check, ApiError::Unauthorized));
        assert_eq!(state.authorization_status, AuthorizationStatus::Auth);
        assert_eq!(state.user.as_ref().map(|u| u.email.as_str()), Some("a@b.de"));

        // not stale by generation, but still sent before the login
        let state = reduce(&state, Action::FetchFailed(favorites, ApiError::Unauthorized));
        assert_eq!(state.authorization_status, AuthorizationStatus::Auth);

        // a request of the new session that is rejected ends it
        let state = reduce(&state, Action::FetchStarted(FetchKind::FavoriteOffers));
        let fresh = state.loading.ticket(FetchKind::FavoriteOffers);
        let state = reduce(&state, Action::FetchFailed(fresh, ApiError::Unauthorized));
        assert_eq!(state.authorization_status, AuthorizationStatus::NoAuth);
        assert_eq!(state.user, None);
    }

    #[test]
    fn test_set_load_status() {
        let state = reduce(&State::default(), Action::SetLoadStatus(FetchKind::Offers, true));
        assert!(state.loading.is_loading(FetchKind::Offers));
        let state = reduce(&state, Action::SetLoadStatus(FetchKind::Offers, false));
        assert!(!state.loading.is_loading(FetchKind::Offers));
        assert!(!state.loading.is_any_loading());

        // clearing by hand does not make the request stale
        let state = reduce(&state, Action::FetchStarted(FetchKind::Offers));
        let ticket = state.loading.ticket(FetchKind::Offers);
        let state = reduce(&state, Action::SetLoadStatus(FetchKind::Offers, false));
        assert!(!state.loading.is_loading(FetchKind::Offers));
        assert!(state.loading.is_current(ticket));
        let state = reduce(&state, Action::FetchFinished(ticket));
        assert!(!state.loading.is_loading(FetchKind::Offers));

        // an outdated request finishing leaves a manual flag alone
        let state = reduce(&state, Action::FetchStarted(FetchKind::Offers));
        let stale = state.loading.ticket(FetchKind::Offers);
        let state = reduce(&state, Action::FetchStarted(FetchKind::Offers));
        let state = reduce(&state, Action::SetLoadStatus(FetchKind::Offers, true));
        let state = reduce(&state, Action::FetchFinished(stale));
        assert!(state.loading.is_loading(FetchKind::Offers));
        assert!(!state.loading.is_loading(FetchKind::Reviews));
    }

    #[test]
    fn test_failed_auth_check_resolves_unknown() {
        let state = reduce(&State::default(), Action::FetchStarted(FetchKind::Auth));
        let ticket = state.loading.ticket(FetchKind::Auth);
        let state = reduce(
            &state,
            Action::FetchFailed(ticket, ApiError::NetworkFailure("down".to_string())),
        );
        assert_eq!(state.authorization_status, AuthorizationStatus::NoAuth);
    }

    #[test]
    fn test_reset_makes_outstanding_requests_stale() {
        let state = loaded(vec![make_offer(1, "Paris", 100)]);
        let state = reduce(&state, Action::FetchStarted(FetchKind::Offers));
        let ticket = state.loading.ticket(FetchKind::Offers);
        let state = reduce(&state, Action::Reset);
        assert!(state.offers.is_empty());
        assert_eq!(state.city, None);
        assert!(!state.loading.is_loading(FetchKind::Offers));
        assert!(!state.loading.is_current(ticket));
    }
}
