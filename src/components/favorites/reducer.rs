use crate::components::{toggle_favorite, Effect};
use crate::environment::types::OfferId;
use crate::environment::Environment;
use crate::route::Route;
use crate::store::{operations, selectors};

#[derive(Clone, Debug)]
pub enum FavoritesAction {
    Load,
    ToggleFavorite(OfferId),
}

/// The favorites page only exists for logged in users
pub async fn reduce(action: FavoritesAction, environment: &Environment) -> Effect {
    log::trace!("{action:?}");
    let store = &environment.store;
    if !store.select(selectors::is_authorized) {
        return Effect::Navigate(Route::Login);
    }
    match action {
        FavoritesAction::Load => {
            match operations::fetch_favorite_offers(store, environment.api()).await {
                Err(e) if e.is_unauthorized() => Effect::Navigate(Route::Login),
                _ => Effect::Nothing,
            }
        }
        FavoritesAction::ToggleFavorite(id) => toggle_favorite(environment, id).await,
    }
}
