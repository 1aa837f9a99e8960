pub mod model;
pub mod repository;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

pub use model::Model;
pub use repository::Repository;

use crate::error::ApiError;
use crate::store::Store;
use types::{AuthInfo, Credentials, FavoriteStatus, Offer, OfferId, Review, ReviewDraft};

/// Everything the app needs from the rental backend. `Model` implements it
/// over HTTP, tests use a scripted mock.
#[async_trait]
pub trait Api: Send + Sync {
    async fn offers(&self) -> Result<Vec<Offer>, ApiError>;
    async fn offer(&self, id: OfferId) -> Result<Offer, ApiError>;
    async fn nearby_offers(&self, id: OfferId) -> Result<Vec<Offer>, ApiError>;
    async fn favorite_offers(&self) -> Result<Vec<Offer>, ApiError>;
    /// Returns the updated offer
    async fn set_favorite_status(&self, id: OfferId, status: FavoriteStatus)
        -> Result<Offer, ApiError>;
    async fn reviews(&self, id: OfferId) -> Result<Vec<Review>, ApiError>;
    /// Returns all reviews of the offer, including the new one
    async fn post_review(&self, id: OfferId, draft: &ReviewDraft) -> Result<Vec<Review>, ApiError>;
    async fn check_auth(&self) -> Result<AuthInfo, ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<AuthInfo, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    fn set_token(&self, token: Option<String>);
}

#[derive(Clone)]
pub struct Environment {
    pub model: Arc<dyn Api>,
    pub repository: Repository,
    pub store: Store,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish()
    }
}

impl Environment {
    pub fn new(model: Arc<dyn Api>, repository: Repository) -> Self {
        Self {
            model,
            repository,
            store: Store::default(),
        }
    }

    pub fn api(&self) -> &dyn Api {
        self.model.as_ref()
    }
}
