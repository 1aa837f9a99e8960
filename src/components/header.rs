//! The header shown above every page: who is logged in and how many
//! offers they bookmarked.

use crate::components::Effect;
use crate::environment::Environment;
use crate::route::Route;
use crate::store::{operations, selectors, AuthorizationStatus, Store};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HeaderViewModel {
    pub email: Option<String>,
    pub favorite_count: usize,
    pub status: AuthorizationStatus,
}

impl HeaderViewModel {
    pub fn new(store: &Store) -> Self {
        store.select(|s| Self {
            email: selectors::get_user(s).map(|u| u.email.clone()),
            favorite_count: selectors::get_favorite_count(s),
            status: selectors::get_authorization_status(s),
        })
    }

    pub fn render(&self) -> String {
        match (self.status, &self.email) {
            (AuthorizationStatus::Auth, Some(email)) => {
                format!("six cities | {email} ({}) | Sign out", self.favorite_count)
            }
            (AuthorizationStatus::Unknown, _) => "six cities".to_string(),
            _ => "six cities | Sign in".to_string(),
        }
    }
}

pub async fn sign_out(environment: &Environment) -> Effect {
    log::trace!("sign_out");
    if let Err(e) = operations::logout(
        &environment.store,
        environment.api(),
        &environment.repository,
    )
    .await
    {
        log::warn!("Logout failed: {e}");
    }
    Effect::Navigate(Route::Main)
}
