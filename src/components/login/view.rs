use std::fmt::Write;

use super::reducer::LoginState;
use crate::store::{selectors, Store};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LoginViewModel {
    pub email: String,
    /// The city offered as a shortcut next to the form
    pub city: Option<String>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl LoginViewModel {
    pub fn new(state: &LoginState, store: &Store) -> Self {
        Self {
            email: state.email.clone(),
            city: store.select(|s| selectors::get_city(s).map(str::to_string)),
            is_loading: state.is_loading,
            error_message: state.error_message.clone(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Sign in");
        if !self.email.is_empty() {
            let _ = writeln!(out, "E-mail: {}", self.email);
        }
        if let Some(ref error) = self.error_message {
            let _ = writeln!(out, "Error: {error}");
        }
        if let Some(ref city) = self.city {
            let _ = writeln!(out, "Explore {city}");
        }
        out
    }
}
