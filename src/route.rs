use crate::environment::types::OfferId;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Route {
    Main,
    Login,
    Favorites,
    Offer(OfferId),
    NotFound,
}

/// Plain digits without sign or leading zeros, so each offer has one path
fn is_canonical_id(id: &str) -> bool {
    !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_digit())
        && (id == "0" || !id.starts_with('0'))
}

impl Route {
    /// Unknown paths and offer ids that are not numbers end up as `NotFound`
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Main,
            ["login"] => Route::Login,
            ["favorites"] => Route::Favorites,
            ["offer", id] if is_canonical_id(id) => {
                id.parse().map(Route::Offer).unwrap_or(Route::NotFound)
            }
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Main => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Favorites => "/favorites".to_string(),
            Route::Offer(id) => format!("/offer/{id}"),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Needs a logged in user, otherwise redirects to `Login`
    pub fn is_private(&self) -> bool {
        matches!(self, Route::Favorites)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
