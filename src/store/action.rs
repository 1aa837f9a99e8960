use im::Vector;

use super::state::{AuthorizationStatus, FetchKind, Ticket};
use crate::environment::types::{AuthInfo, Offer, OfferId, Review};
use crate::error::ApiError;

#[allow(clippy::large_enum_variant)]
#[derive(Clone)]
pub enum Action {
    SelectCity(String),
    LoadOffers(Vector<Offer>),
    SetLoadStatus(FetchKind, bool),

    FetchStarted(FetchKind),
    FetchFinished(Ticket),
    FetchFailed(Ticket, ApiError),

    RequestOffer(OfferId),
    LoadCurrentOffer(Offer),
    LoadNearbyOffers(OfferId, Vector<Offer>),
    LoadReviews(OfferId, Vector<Review>),

    LoadFavoriteOffers(Vector<Offer>),
    UpdateFavoriteStatus(OfferId, bool),
    /// The server acknowledged a favorite change and echoed the offer
    FavoriteStatusChanged(Offer),

    RequireAuthorization(AuthorizationStatus),
    SetUser(Option<AuthInfo>),

    ClearError,
    Reset,
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelectCity(arg0) => f.debug_tuple("SelectCity").field(arg0).finish(),
            Self::LoadOffers(arg0) => f.debug_tuple("LoadOffers").field(&arg0.len()).finish(),
            Self::SetLoadStatus(arg0, arg1) => f
                .debug_tuple("SetLoadStatus")
                .field(arg0)
                .field(arg1)
                .finish(),
            Self::FetchStarted(arg0) => f.debug_tuple("FetchStarted").field(arg0).finish(),
            Self::FetchFinished(arg0) => f.debug_tuple("FetchFinished").field(arg0).finish(),
            Self::FetchFailed(arg0, arg1) => f
                .debug_tuple("FetchFailed")
                .field(arg0)
                .field(arg1)
                .finish(),
            Self::RequestOffer(arg0) => f.debug_tuple("RequestOffer").field(arg0).finish(),
            Self::LoadCurrentOffer(arg0) => {
                f.debug_tuple("LoadCurrentOffer").field(&arg0.id).finish()
            }
            Self::LoadNearbyOffers(arg0, arg1) => f
                .debug_tuple("LoadNearbyOffers")
                .field(arg0)
                .field(&arg1.len())
                .finish(),
            Self::LoadReviews(arg0, arg1) => f
                .debug_tuple("LoadReviews")
                .field(arg0)
                .field(&arg1.len())
                .finish(),
            Self::LoadFavoriteOffers(arg0) => f
                .debug_tuple("LoadFavoriteOffers")
                .field(&arg0.len())
                .finish(),
            Self::UpdateFavoriteStatus(arg0, arg1) => f
                .debug_tuple("UpdateFavoriteStatus")
                .field(arg0)
                .field(arg1)
                .finish(),
            Self::FavoriteStatusChanged(arg0) => f
                .debug_tuple("FavoriteStatusChanged")
                .field(&arg0.id)
                .field(&arg0.is_favorite)
                .finish(),
            Self::RequireAuthorization(arg0) => {
                f.debug_tuple("RequireAuthorization").field(arg0).finish()
            }
            Self::SetUser(arg0) => f
                .debug_tuple("SetUser")
                .field(&arg0.as_ref().map(|u| &u.email))
                .finish(),
            Self::ClearError => write!(f, "ClearError"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}
