//! Async operations. Each one talks to the `Api`, then feeds the result back
//! into the store as a single action.

use super::action::Action;
use super::state::{AuthorizationStatus, FetchKind, Ticket};
use super::{selectors, Store};
use crate::environment::repository::Repository;
use crate::environment::types::{Credentials, FavoriteStatus, OfferId, ReviewDraft};
use crate::environment::Api;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Outcome {
    /// The response was merged into the store
    Applied,
    /// A newer request superseded this one, the response was dropped
    Discarded,
}

pub type OperationResult = Result<Outcome, ApiError>;

/// Marks a request as in flight for as long as it lives. Dropping it,
/// including by dropping the operation future, clears the loading flag.
struct LoadingGuard {
    store: Store,
    ticket: Ticket,
    /// Queries are discarded when superseded, mutations always apply
    discard_stale: bool,
    key: Option<OfferId>,
}

impl LoadingGuard {
    fn query(store: &Store, kind: FetchKind) -> Self {
        Self::start(store, kind, true)
    }

    fn mutation(store: &Store, kind: FetchKind) -> Self {
        Self::start(store, kind, false)
    }

    fn start(store: &Store, kind: FetchKind, discard_stale: bool) -> Self {
        store.dispatch(Action::FetchStarted(kind));
        let ticket = store.select(|s| s.loading.ticket(kind));
        Self {
            store: store.clone(),
            ticket,
            discard_stale,
            key: None,
        }
    }

    /// Only apply the response while the detail page still shows `id`
    fn keyed(mut self, id: OfferId) -> Self {
        self.key = Some(id);
        self
    }

    fn is_stale(&self) -> bool {
        let (current, requested) = self
            .store
            .select(|s| (s.loading.is_current(self.ticket), s.requested_offer));
        let wrong_key = match (self.key, requested) {
            (Some(key), Some(requested)) => key != requested,
            _ => false,
        };
        (self.discard_stale && !current) || wrong_key
    }

    fn settle<T>(
        &self,
        result: Result<T, ApiError>,
        on_success: impl FnOnce(T) -> Action,
    ) -> OperationResult {
        match result {
            Ok(_) if self.is_stale() => {
                log::debug!("Discarding stale {} response", self.ticket.kind);
                Ok(Outcome::Discarded)
            }
            Ok(value) => {
                self.store.dispatch(on_success(value));
                let kind = self.ticket.kind;
                if self.store.select(|s| selectors::get_error_for(s, kind).is_some()) {
                    self.store.dispatch(Action::ClearError);
                }
                Ok(Outcome::Applied)
            }
            Err(error) => {
                self.store
                    .dispatch(Action::FetchFailed(self.ticket, error.clone()));
                Err(error)
            }
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.store.dispatch(Action::FetchFinished(self.ticket));
    }
}

pub async fn fetch_offers(store: &Store, api: &dyn Api) -> OperationResult {
    let guard = LoadingGuard::query(store, FetchKind::Offers);
    let result = api.offers().await;
    guard.settle(result, |offers| Action::LoadOffers(offers.into()))
}

pub async fn fetch_current_offer(store: &Store, api: &dyn Api, id: OfferId) -> OperationResult {
    let guard = LoadingGuard::query(store, FetchKind::CurrentOffer).keyed(id);
    let result = api.offer(id).await.and_then(|offer| {
        if offer.id == id {
            Ok(offer)
        } else {
            Err(ApiError::ValidationFailure(format!(
                "Asked for offer {id}, received {}",
                offer.id
            )))
        }
    });
    guard.settle(result, Action::LoadCurrentOffer)
}

pub async fn fetch_nearby_offers(store: &Store, api: &dyn Api, id: OfferId) -> OperationResult {
    let guard = LoadingGuard::query(store, FetchKind::NearbyOffers).keyed(id);
    let result = api.nearby_offers(id).await;
    guard.settle(result, |offers| Action::LoadNearbyOffers(id, offers.into()))
}

pub async fn fetch_favorite_offers(store: &Store, api: &dyn Api) -> OperationResult {
    let guard = LoadingGuard::query(store, FetchKind::FavoriteOffers);
    let result = api.favorite_offers().await;
    guard.settle(result, |offers| Action::LoadFavoriteOffers(offers.into()))
}

/// The flag only changes once the server echoed the updated offer
pub async fn set_favorite_status(
    store: &Store,
    api: &dyn Api,
    id: OfferId,
    status: FavoriteStatus,
) -> OperationResult {
    let guard = LoadingGuard::mutation(store, FetchKind::FavoriteStatus);
    let result = api.set_favorite_status(id, status).await.and_then(|offer| {
        if offer.id != id {
            return Err(ApiError::ValidationFailure(format!(
                "Changed offer {id}, server echoed {}",
                offer.id
            )));
        }
        if offer.is_favorite != status.is_favorite() {
            log::warn!("Server kept offer {id} at favorite={}", offer.is_favorite);
        }
        Ok(offer)
    });
    guard.settle(result, Action::FavoriteStatusChanged)
}

pub async fn fetch_reviews(store: &Store, api: &dyn Api, id: OfferId) -> OperationResult {
    let guard = LoadingGuard::query(store, FetchKind::Reviews).keyed(id);
    let result = api.reviews(id).await;
    guard.settle(result, |reviews| Action::LoadReviews(id, reviews.into()))
}

/// Checks the draft before anything goes over the wire
pub async fn post_review(
    store: &Store,
    api: &dyn Api,
    id: OfferId,
    draft: &ReviewDraft,
) -> OperationResult {
    draft.validate().map_err(ApiError::ValidationFailure)?;
    let guard = LoadingGuard::mutation(store, FetchKind::PostReview);
    let result = api.post_review(id, draft).await;
    guard.settle(result, |reviews| Action::LoadReviews(id, reviews.into()))
}

pub async fn check_auth(store: &Store, api: &dyn Api) -> OperationResult {
    let guard = LoadingGuard::query(store, FetchKind::Auth);
    let result = api.check_auth().await;
    guard.settle(result, |auth| Action::SetUser(Some(auth)))
}

pub async fn login(
    store: &Store,
    api: &dyn Api,
    repository: &Repository,
    credentials: &Credentials,
) -> OperationResult {
    credentials.validate().map_err(ApiError::ValidationFailure)?;
    let guard = LoadingGuard::mutation(store, FetchKind::Auth);
    let result = api.login(credentials).await.map(|auth| {
        api.set_token(Some(auth.token.clone()));
        if let Err(e) = repository.save_session(&auth) {
            log::error!("Could not save session: {e}");
        }
        auth
    });
    guard.settle(result, |auth| Action::SetUser(Some(auth)))
}

/// An `Unauthorized` answer means the session is gone already, so the local
/// token is dropped in that case as well.
pub async fn logout(store: &Store, api: &dyn Api, repository: &Repository) -> OperationResult {
    let guard = LoadingGuard::mutation(store, FetchKind::Auth);
    let result = api.logout().await;
    if matches!(result, Ok(()) | Err(ApiError::Unauthorized)) {
        api.set_token(None);
        if let Err(e) = repository.clear_session() {
            log::error!("Could not clear session: {e}");
        }
    }
    guard.settle(result, |_| {
        Action::RequireAuthorization(AuthorizationStatus::NoAuth)
    })
}
