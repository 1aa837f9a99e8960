use std::fmt::Write;

use super::reducer::PropertyState;
use crate::components::{render_card, render_map};
use crate::environment::types::{Offer, OfferId};
use crate::store::state::FetchKind;
use crate::store::{selectors, Store};
use crate::view_model::{capitalize, rating_width, MapViewModel, OfferCardViewModel, ReviewViewModel};

pub const MAX_NEARBY: usize = 3;
pub const MAX_IMAGES: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct OfferDetailViewModel {
    pub id: OfferId,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub images: Vec<String>,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub rating: f64,
    pub rating_width: u32,
    pub bedrooms: u32,
    pub max_adults: u32,
    pub price: u32,
    pub goods: Vec<String>,
    pub host_name: String,
    pub host_avatar: String,
    pub host_is_pro: bool,
}

impl OfferDetailViewModel {
    pub fn new(offer: &Offer) -> Self {
        Self {
            id: offer.id,
            title: offer.title.clone(),
            description: offer.description.clone(),
            kind: capitalize(&offer.kind),
            images: offer.images.iter().take(MAX_IMAGES).cloned().collect(),
            is_premium: offer.is_premium,
            is_favorite: offer.is_favorite,
            rating: offer.rating,
            rating_width: rating_width(offer.rating),
            bedrooms: offer.bedrooms,
            max_adults: offer.max_adults,
            price: offer.price,
            goods: offer.goods.clone(),
            host_name: offer.host.name.clone(),
            host_avatar: offer.host.avatar_url.clone(),
            host_is_pro: offer.host.is_pro,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyViewModel {
    pub offer: Option<OfferDetailViewModel>,
    pub nearby: Vec<OfferCardViewModel>,
    pub map: Option<MapViewModel>,
    pub reviews: Vec<ReviewViewModel>,
    pub review_count: usize,
    pub can_review: bool,
    pub draft_comment: String,
    pub draft_rating: u8,
    pub error_message: Option<String>,
    pub is_loading: bool,
    pub requested: Option<OfferId>,
    /// Why the offer itself could not be loaded
    pub load_error: Option<String>,
}

impl PropertyViewModel {
    pub fn new(state: &PropertyState, store: &Store) -> Self {
        store.select(|s| {
            let current = selectors::get_current_offer(s);
            let nearby: Vec<Offer> = selectors::get_nearby_offers(s)
                .into_iter()
                .take(MAX_NEARBY)
                .collect();
            // the map shows the offer itself next to its neighbours
            let map = current.and_then(|offer| {
                MapViewModel::new(nearby.iter().chain(Some(offer)), Some(offer.id))
            });
            Self {
                offer: current.map(OfferDetailViewModel::new),
                nearby: nearby.iter().map(OfferCardViewModel::new).collect(),
                map,
                reviews: selectors::get_reviews(s)
                    .iter()
                    .map(ReviewViewModel::new)
                    .collect(),
                review_count: selectors::get_review_count(s),
                can_review: selectors::is_authorized(s),
                draft_comment: state.comment.clone(),
                draft_rating: state.rating,
                error_message: state.error_message.clone(),
                is_loading: selectors::is_loading(s, FetchKind::CurrentOffer),
                requested: selectors::get_requested_offer_id(s),
                load_error: selectors::get_error_for(s, FetchKind::CurrentOffer)
                    .map(|f| f.error.to_string()),
            }
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let Some(ref offer) = self.offer else {
            if self.is_loading {
                let _ = writeln!(out, "Loading...");
                return out;
            }
            let _ = match self.requested {
                Some(id) => write!(out, "Offer #{id} unavailable"),
                None => write!(out, "Offer unavailable"),
            };
            if let Some(ref error) = self.load_error {
                let _ = write!(out, ": {error}");
            }
            let _ = writeln!(out);
            return out;
        };
        if offer.is_premium {
            let _ = writeln!(out, "Premium");
        }
        let bookmark = if offer.is_favorite { " [In bookmarks]" } else { "" };
        let _ = writeln!(out, "{}{bookmark}", offer.title);
        let _ = writeln!(out, "Rating {} ({}%)", offer.rating, offer.rating_width);
        let _ = writeln!(
            out,
            "{} · {} Bedrooms · Max {} adults",
            offer.kind, offer.bedrooms, offer.max_adults
        );
        let _ = writeln!(out, "€{} night", offer.price);
        let _ = writeln!(out, "Gallery: {}", offer.images.join(", "));
        let _ = writeln!(out, "What's inside: {}", offer.goods.join(", "));
        let pro = if offer.host_is_pro { " (Pro)" } else { "" };
        let _ = writeln!(out, "Meet the host: {}{pro}", offer.host_name);
        let _ = writeln!(out, "{}", offer.description);

        let _ = writeln!(out, "\nReviews · {}", self.review_count);
        for review in &self.reviews {
            let _ = writeln!(
                out,
                "  {} ({}%, {}): {}",
                review.user_name, review.rating_width, review.date_human, review.comment
            );
        }
        if let Some(ref error) = self.error_message {
            let _ = writeln!(out, "Review not sent: {error}");
        }

        if let Some(ref map) = self.map {
            let _ = writeln!(out, "\n{}", render_map(map));
        }
        if self.nearby.is_empty() {
            let _ = writeln!(out, "There are no neighbourhood offers");
        } else {
            let _ = writeln!(out, "Other places in the neighbourhood");
            for card in &self.nearby {
                let _ = writeln!(out, "{}", render_card(card));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::model::mock::make_offer;
    use crate::store::Action;

    #[test]
    fn test_render_detail() {
        let store = Store::default();
        let mut offer = make_offer(5, "Paris", 250);
        offer.is_premium = true;
        offer.is_favorite = true;
        store.dispatch(Action::RequestOffer(OfferId(5)));
        store.dispatch(Action::LoadCurrentOffer(offer));
        let view = PropertyViewModel::new(&PropertyState::default(), &store);
        let text = view.render();
        assert!(text.starts_with("Premium\nOffer 5 [In bookmarks]\n"));
        assert!(text.contains("Apartment · 2 Bedrooms · Max 4 adults"));
        assert!(text.contains("€250 night"));
        assert!(text.contains("There are no neighbourhood offers"));
        assert_eq!(view.map.map(|m| m.points.len()), Some(1));
    }

    #[test]
    fn test_render_without_offer() {
        let store = Store::default();
        let view = PropertyViewModel::new(&PropertyState::default(), &store);
        assert_eq!(view.render(), "Offer unavailable\n");
    }

    #[test]
    fn test_render_failed_offer() {
        let store = Store::default();
        store.dispatch(Action::RequestOffer(OfferId(9)));
        store.dispatch(Action::FetchStarted(FetchKind::CurrentOffer));
        let ticket = store.select(|s| s.loading.ticket(FetchKind::CurrentOffer));
        store.dispatch(Action::FetchFailed(
            ticket,
            crate::error::ApiError::NetworkFailure("timeout".to_string()),
        ));
        let view = PropertyViewModel::new(&PropertyState::default(), &store);
        assert_eq!(view.render(), "Offer #9 unavailable: Network failure: timeout\n");
    }
}
