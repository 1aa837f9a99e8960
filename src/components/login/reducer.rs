use crate::components::Effect;
use crate::environment::types::Credentials;
use crate::environment::Environment;
use crate::route::Route;
use crate::store::{operations, selectors};

#[derive(Clone)]
pub enum LoginAction {
    Load,
    UpdateEmail(String),
    UpdatePassword(String),
    Submit,
}

impl std::fmt::Debug for LoginAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load => write!(f, "Load"),
            Self::UpdateEmail(arg0) => f.debug_tuple("UpdateEmail").field(arg0).finish(),
            // never log the password
            Self::UpdatePassword(_) => f.debug_tuple("UpdatePassword").finish(),
            Self::Submit => write!(f, "Submit"),
        }
    }
}

#[derive(Clone, Default, Eq, PartialEq)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl std::fmt::Debug for LoginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginState")
            .field("email", &self.email)
            .field("is_loading", &self.is_loading)
            .field("error_message", &self.error_message)
            .finish()
    }
}

pub async fn reduce(action: LoginAction, state: &mut LoginState, environment: &Environment) -> Effect {
    log::trace!("{action:?}");
    let store = &environment.store;
    match action {
        LoginAction::Load => {
            if store.select(selectors::is_authorized) {
                return Effect::Navigate(Route::Main);
            }
            Effect::Nothing
        }
        LoginAction::UpdateEmail(email) => {
            state.email = email;
            state.error_message = None;
            Effect::Nothing
        }
        LoginAction::UpdatePassword(password) => {
            state.password = password;
            state.error_message = None;
            Effect::Nothing
        }
        LoginAction::Submit => {
            let credentials = Credentials::new(state.email.trim(), state.password.clone());
            if let Err(e) = credentials.validate() {
                state.error_message = Some(e);
                return Effect::Nothing;
            }
            state.is_loading = true;
            let result = operations::login(
                store,
                environment.api(),
                &environment.repository,
                &credentials,
            )
            .await;
            state.is_loading = false;
            match result {
                Ok(_) => {
                    state.password.clear();
                    if let Err(e) =
                        operations::fetch_favorite_offers(store, environment.api()).await
                    {
                        log::warn!("Favorites unavailable after login: {e}");
                    }
                    Effect::Navigate(Route::Main)
                }
                Err(e) => {
                    state.error_message = Some(e.to_string());
                    Effect::Nothing
                }
            }
        }
    }
}
