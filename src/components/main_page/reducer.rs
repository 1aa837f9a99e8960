use super::action::MainAction;
use super::state::MainState;
use crate::components::{toggle_favorite, Effect};
use crate::environment::Environment;
use crate::store::{operations, selectors, Action};

pub async fn reduce(action: MainAction, state: &mut MainState, environment: &Environment) -> Effect {
    log::trace!("{action:?}");
    let store = &environment.store;
    match action {
        MainAction::Load => {
            if store.select(|s| selectors::get_offers(s).is_empty()) {
                if let Err(e) = operations::fetch_offers(store, environment.api()).await {
                    log::warn!("Offers unavailable: {e}");
                }
            }
            Effect::Nothing
        }
        MainAction::SelectCity(name) => {
            store.dispatch(Action::SelectCity(name));
            state.active_card = None;
            Effect::Nothing
        }
        MainAction::ToggleSortList => {
            state.sort_list_open = !state.sort_list_open;
            Effect::Nothing
        }
        MainAction::Sort(sort) => {
            state.sort = sort;
            state.sort_list_open = false;
            Effect::Nothing
        }
        MainAction::Hover(id) => {
            state.active_card = id;
            Effect::Nothing
        }
        MainAction::ToggleFavorite(id) => toggle_favorite(environment, id).await,
    }
}
