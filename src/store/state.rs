use im::Vector;
use std::collections::HashMap;
use strum_macros::{Display, IntoStaticStr};

use crate::environment::types::{AuthInfo, Offer, OfferId, Review};
use crate::error::ApiError;

/// The different requests that have their own loading flag
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display, IntoStaticStr)]
pub enum FetchKind {
    Offers,
    CurrentOffer,
    NearbyOffers,
    FavoriteOffers,
    FavoriteStatus,
    Reviews,
    PostReview,
    Auth,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LoadSlot {
    pub is_loading: bool,
    /// Bumped whenever a request of this kind starts
    pub generation: u64,
    /// Position of the latest start among requests of all kinds
    pub started_at: u64,
}

/// Identifies one started request. A response whose ticket is no longer the
/// latest generation for its kind is stale.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Ticket {
    pub kind: FetchKind,
    pub generation: u64,
    pub started_at: u64,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LoadingFlags {
    slots: HashMap<FetchKind, LoadSlot>,
    /// Counts request starts across every kind
    sequence: u64,
}

impl LoadingFlags {
    pub fn is_loading(&self, kind: FetchKind) -> bool {
        self.slot(kind).is_loading
    }

    pub fn is_any_loading(&self) -> bool {
        self.slots.values().any(|s| s.is_loading)
    }

    pub fn ticket(&self, kind: FetchKind) -> Ticket {
        let slot = self.slot(kind);
        Ticket {
            kind,
            generation: slot.generation,
            started_at: slot.started_at,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.slot(ticket.kind).generation == ticket.generation
    }

    fn slot(&self, kind: FetchKind) -> LoadSlot {
        self.slots.get(&kind).copied().unwrap_or_default()
    }

    pub(crate) fn set(&mut self, kind: FetchKind, is_loading: bool) {
        self.slots.entry(kind).or_default().is_loading = is_loading;
    }

    pub(crate) fn start(&mut self, kind: FetchKind) {
        self.sequence += 1;
        let sequence = self.sequence;
        let slot = self.slots.entry(kind).or_default();
        slot.generation += 1;
        slot.started_at = sequence;
        slot.is_loading = true;
    }

    /// Clears the flag if `ticket` is still the latest request of its kind
    pub(crate) fn finish(&mut self, ticket: Ticket) {
        if self.is_current(ticket) {
            self.set(ticket.kind, false);
        }
    }

    /// Clears every flag and makes all outstanding tickets stale
    pub(crate) fn invalidate(&mut self) {
        for slot in self.slots.values_mut() {
            slot.generation += 1;
            slot.is_loading = false;
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Display)]
pub enum AuthorizationStatus {
    #[default]
    Unknown,
    Auth,
    NoAuth,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Failure {
    pub kind: FetchKind,
    pub error: ApiError,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct State {
    pub offers: Vector<Offer>,
    /// `None` until the user or the first offer load picks one
    pub city: Option<String>,

    /// The offer id the detail page currently shows
    pub requested_offer: Option<OfferId>,
    pub current_offer: Option<Offer>,
    pub nearby_offers: Vector<Offer>,
    pub nearby_offers_for: Option<OfferId>,
    pub reviews: Vector<Review>,
    pub reviews_for: Option<OfferId>,

    pub favorite_offers: Vector<Offer>,

    pub authorization_status: AuthorizationStatus,
    pub user: Option<AuthInfo>,
    /// `LoadingFlags::sequence` when `user` signed in. Requests started
    /// before that cannot end the session.
    pub session_started: u64,

    pub loading: LoadingFlags,
    pub error: Option<Failure>,
}

impl State {
    /// Run `action` on every copy of the offer `id` held anywhere in state
    pub(crate) fn mutate_offer(&mut self, id: OfferId, mut action: impl FnMut(&mut Offer)) -> bool {
        let mut found = false;
        for offers in [
            &mut self.offers,
            &mut self.nearby_offers,
            &mut self.favorite_offers,
        ] {
            for offer in offers.iter_mut() {
                if offer.id == id {
                    action(offer);
                    found = true;
                }
            }
        }
        if let Some(offer) = self.current_offer.as_mut() {
            if offer.id == id {
                action(offer);
                found = true;
            }
        }
        found
    }

    pub(crate) fn find_offer(&self, id: OfferId) -> Option<&Offer> {
        self.current_offer
            .iter()
            .chain(self.offers.iter())
            .chain(self.nearby_offers.iter())
            .chain(self.favorite_offers.iter())
            .find(|o| o.id == id)
    }
}
