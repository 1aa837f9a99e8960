use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};

use super::types::{
    decode, AuthInfo, Credentials, FavoriteStatus, Offer, OfferId, Review, ReviewDraft, Validate,
};
use super::Api;
use crate::config::Config;
use crate::error::{ApiError, ResultExt};

const TOKEN_HEADER: &str = "X-Token";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ApiRoute {
    Offers,
    Offer(OfferId),
    NearbyOffers(OfferId),
    Favorites,
    FavoriteStatus(OfferId, FavoriteStatus),
    Reviews(OfferId),
    Login,
    Logout,
}

impl ApiRoute {
    pub fn path(&self) -> String {
        match self {
            ApiRoute::Offers => "/hotels".to_string(),
            ApiRoute::Offer(id) => format!("/hotels/{id}"),
            ApiRoute::NearbyOffers(id) => format!("/hotels/{id}/nearby"),
            ApiRoute::Favorites => "/favorite".to_string(),
            ApiRoute::FavoriteStatus(id, status) => format!("/favorite/{id}/{}", status.code()),
            ApiRoute::Reviews(id) => format!("/comments/{id}"),
            ApiRoute::Login => "/login".to_string(),
            ApiRoute::Logout => "/logout".to_string(),
        }
    }
}

/// The HTTP client for the rental backend.
#[derive(Clone)]
pub struct Model {
    pub url: String,
    client: reqwest::Client,
    token: Arc<Mutex<Option<String>>>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model").field("url", &self.url).finish()
    }
}

impl Model {
    pub fn new(config: &Config, token: Option<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            url: config.base_url().to_string(),
            client,
            token: Arc::new(Mutex::new(token)),
        })
    }

    fn token(&self) -> Option<String> {
        self.token.lock().ok()?.clone()
    }

    /// Perform the request and return the raw body of a successful response
    async fn send(
        &self,
        method: Method,
        route: ApiRoute,
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let path = route.path();
        let mut request = self.client.request(method, format!("{}{path}", self.url));
        if let Some(token) = self.token() {
            request = request.header(TOKEN_HEADER, token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        match ApiError::from_status(status, &path, &text) {
            Some(error) => Err(error),
            None => Ok(text),
        }
    }

    async fn request<T: DeserializeOwned + Validate>(
        &self,
        method: Method,
        route: ApiRoute,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let text = self.send(method, route, body).await?;
        decode(text.as_bytes())
    }
}

#[async_trait]
impl Api for Model {
    async fn offers(&self) -> Result<Vec<Offer>, ApiError> {
        log::trace!("Offers");
        self.request(Method::GET, ApiRoute::Offers, None)
            .await
            .log_error("offers")
    }

    async fn offer(&self, id: OfferId) -> Result<Offer, ApiError> {
        log::trace!("Offer {id}");
        self.request(Method::GET, ApiRoute::Offer(id), None)
            .await
            .log_error("offer")
    }

    async fn nearby_offers(&self, id: OfferId) -> Result<Vec<Offer>, ApiError> {
        log::trace!("Nearby offers {id}");
        self.request(Method::GET, ApiRoute::NearbyOffers(id), None)
            .await
            .log_error("nearby_offers")
    }

    async fn favorite_offers(&self) -> Result<Vec<Offer>, ApiError> {
        log::trace!("Favorites");
        self.request(Method::GET, ApiRoute::Favorites, None)
            .await
            .log_error("favorite_offers")
    }

    async fn set_favorite_status(
        &self,
        id: OfferId,
        status: FavoriteStatus,
    ) -> Result<Offer, ApiError> {
        log::trace!("Favorite status {id} {status:?}");
        self.request(Method::POST, ApiRoute::FavoriteStatus(id, status), None)
            .await
            .log_error("set_favorite_status")
    }

    async fn reviews(&self, id: OfferId) -> Result<Vec<Review>, ApiError> {
        log::trace!("Reviews {id}");
        self.request(Method::GET, ApiRoute::Reviews(id), None)
            .await
            .log_error("reviews")
    }

    async fn post_review(&self, id: OfferId, draft: &ReviewDraft) -> Result<Vec<Review>, ApiError> {
        log::trace!("Post review {id}");
        let body = serde_json::to_value(draft)?;
        self.request(Method::POST, ApiRoute::Reviews(id), Some(body))
            .await
            .log_error("post_review")
    }

    async fn check_auth(&self) -> Result<AuthInfo, ApiError> {
        log::trace!("Check auth");
        self.request(Method::GET, ApiRoute::Login, None)
            .await
            .log_error("check_auth")
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthInfo, ApiError> {
        log::trace!("Login");
        let body = serde_json::to_value(credentials)?;
        self.request(Method::POST, ApiRoute::Login, Some(body))
            .await
            .log_error("login")
    }

    async fn logout(&self) -> Result<(), ApiError> {
        log::trace!("Logout");
        self.send(Method::DELETE, ApiRoute::Logout, None)
            .await
            .log_error("logout")?;
        Ok(())
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut current) = self.token.lock() {
            *current = token;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        let id = OfferId(7);
        assert_eq!(ApiRoute::Offers.path(), "/hotels");
        assert_eq!(ApiRoute::Offer(id).path(), "/hotels/7");
        assert_eq!(ApiRoute::NearbyOffers(id).path(), "/hotels/7/nearby");
        assert_eq!(ApiRoute::Favorites.path(), "/favorite");
        assert_eq!(
            ApiRoute::FavoriteStatus(id, FavoriteStatus::Favorite).path(),
            "/favorite/7/1"
        );
        assert_eq!(
            ApiRoute::FavoriteStatus(id, FavoriteStatus::NotFavorite).path(),
            "/favorite/7/0"
        );
        assert_eq!(ApiRoute::Reviews(id).path(), "/comments/7");
        assert_eq!(ApiRoute::Login.path(), "/login");
        assert_eq!(ApiRoute::Logout.path(), "/logout");
    }

    #[test]
    fn test_model_token() {
        let model = Model::new(&Config::default(), None).unwrap();
        assert_eq!(model.token(), None);
        model.set_token(Some("abc".to_string()));
        assert_eq!(model.token().as_deref(), Some("abc"));
        model.set_token(None);
        assert_eq!(model.token(), None);
        assert_eq!(model.url, crate::config::BACKEND_URL);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_failure() {
        let config = Config {
            backend_url: url::Url::parse("http://127.0.0.1:1").unwrap(),
            request_timeout: std::time::Duration::from_millis(500),
            data_directory: None,
        };
        let model = Model::new(&config, None).unwrap();
        let result = model.offers().await;
        assert!(matches!(result, Err(ApiError::NetworkFailure(_))));
    }
}
