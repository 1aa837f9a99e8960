use crate::environment::types::{Location, Offer, OfferId, Review};
use chrono::{DateTime, Utc};

/// Percentage width of the star bar, in steps of full stars
pub fn rating_width(rating: f64) -> u32 {
    (rating.round().clamp(0.0, 5.0) as u32) * 20
}

pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfferCardViewModel {
    pub id: OfferId,
    pub title: String,
    pub kind: String,
    pub price: u32,
    pub rating_width: u32,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub preview_image: String,
    pub link: String,
}

impl OfferCardViewModel {
    pub fn new(offer: &Offer) -> Self {
        Self {
            id: offer.id,
            title: offer.title.clone(),
            kind: capitalize(&offer.kind),
            price: offer.price,
            rating_width: rating_width(offer.rating),
            is_premium: offer.is_premium,
            is_favorite: offer.is_favorite,
            preview_image: offer.preview_image.clone(),
            link: format!("/offer/{}", offer.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub id: OfferId,
    pub latitude: f64,
    pub longitude: f64,
    pub is_active: bool,
}

/// What the map widget needs: where to center and which markers to draw
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewModel {
    pub center: Location,
    pub points: Vec<MapPoint>,
}

impl MapViewModel {
    /// Centered on the city of the first offer. `None` without offers.
    pub fn new<'a>(
        offers: impl IntoIterator<Item = &'a Offer>,
        active: Option<OfferId>,
    ) -> Option<Self> {
        let mut offers = offers.into_iter().peekable();
        let center = offers.peek()?.city.location.clone();
        let points = offers
            .map(|o| MapPoint {
                id: o.id,
                latitude: o.location.latitude,
                longitude: o.location.longitude,
                is_active: Some(o.id) == active,
            })
            .collect();
        Some(Self { center, points })
    }

    pub fn active(&self) -> Option<&MapPoint> {
        self.points.iter().find(|p| p.is_active)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewViewModel {
    pub id: u32,
    pub user_name: String,
    pub avatar_url: String,
    pub is_pro: bool,
    pub rating_width: u32,
    pub comment: String,
    /// "March 2023"
    pub date_human: String,
    /// "2023-03-05"
    pub date_iso: String,
    pub date: DateTime<Utc>,
}

impl ReviewViewModel {
    pub fn new(review: &Review) -> Self {
        Self {
            id: review.id,
            user_name: review.user.name.clone(),
            avatar_url: review.user.avatar_url.clone(),
            is_pro: review.user.is_pro,
            rating_width: rating_width(review.rating),
            comment: review.comment.clone(),
            date_human: review.date.format("%B %Y").to_string(),
            date_iso: review.date.format("%Y-%m-%d").to_string(),
            date: review.date,
        }
    }
}
