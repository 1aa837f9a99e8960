use futures_util::future::join4;

use crate::components::{toggle_favorite, Effect};
use crate::environment::types::{OfferId, ReviewDraft};
use crate::environment::Environment;
use crate::route::Route;
use crate::store::{operations, selectors, Action};

#[derive(Clone, Debug)]
pub enum PropertyAction {
    Open(OfferId),
    ToggleFavorite,
    UpdateComment(String),
    UpdateRating(u8),
    SubmitReview,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PropertyState {
    pub id: Option<OfferId>,
    pub comment: String,
    pub rating: u8,
    pub error_message: Option<String>,
}

impl PropertyState {
    pub fn draft(&self) -> ReviewDraft {
        ReviewDraft {
            comment: self.comment.clone(),
            rating: self.rating,
        }
    }
}

pub async fn reduce(
    action: PropertyAction,
    state: &mut PropertyState,
    environment: &Environment,
) -> Effect {
    log::trace!("{action:?}");
    let store = &environment.store;
    let api = environment.api();
    match action {
        PropertyAction::Open(id) => {
            if state.id != Some(id) {
                *state = PropertyState {
                    id: Some(id),
                    ..Default::default()
                };
            }
            store.dispatch(Action::RequestOffer(id));
            let is_showing =
                store.select(|s| selectors::get_current_offer(s).map(|o| o.id)) == Some(id);
            let is_authorized = store.select(selectors::is_authorized);

            let favorites = async {
                if is_authorized {
                    if let Err(e) = operations::fetch_favorite_offers(store, api).await {
                        log::warn!("Favorites unavailable: {e}");
                    }
                }
            };
            if is_showing {
                favorites.await;
                return Effect::Nothing;
            }
            let (offer, _, _, _) = join4(
                operations::fetch_current_offer(store, api, id),
                operations::fetch_nearby_offers(store, api, id),
                operations::fetch_reviews(store, api, id),
                favorites,
            )
            .await;
            match offer {
                Err(e) if e.is_not_found() => Effect::Navigate(Route::NotFound),
                _ => Effect::Nothing,
            }
        }
        PropertyAction::ToggleFavorite => {
            let Some(id) = state.id else {
                return Effect::Nothing;
            };
            toggle_favorite(environment, id).await
        }
        PropertyAction::UpdateComment(comment) => {
            state.comment = comment;
            Effect::Nothing
        }
        PropertyAction::UpdateRating(rating) => {
            state.rating = rating;
            Effect::Nothing
        }
        PropertyAction::SubmitReview => {
            let Some(id) = state.id else {
                return Effect::Nothing;
            };
            if !store.select(selectors::is_authorized) {
                return Effect::Navigate(Route::Login);
            }
            match operations::post_review(store, api, id, &state.draft()).await {
                Ok(_) => {
                    state.comment.clear();
                    state.rating = 0;
                    state.error_message = None;
                }
                Err(e) => state.error_message = Some(e.to_string()),
            }
            Effect::Nothing
        }
    }
}
