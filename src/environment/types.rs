use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// API Types

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub u32);

impl std::fmt::Display for OfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OfferId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(OfferId)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub location: Location,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub name: String,
    pub avatar_url: String,
    pub is_pro: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: u32,
    pub rating: f64,
    pub bedrooms: u32,
    pub max_adults: u32,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub images: Vec<String>,
    pub preview_image: String,
    pub goods: Vec<String>,
    pub host: User,
    pub city: City,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u32,
    pub comment: String,
    pub date: DateTime<Utc>,
    pub rating: f64,
    pub user: User,
}

/// The logged in user as returned by `/login`
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthInfo {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub is_pro: bool,
    pub token: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The backend rejects passwords without at least one letter and one digit.
    pub fn validate(&self) -> Result<(), String> {
        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .map(|(user, domain)| !user.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'))
            .unwrap_or(false);
        if !valid_email {
            return Err(format!("Invalid email address: {email:?}"));
        }
        let has_letter = self.password.chars().any(|c| c.is_alphabetic());
        let has_digit = self.password.chars().any(|c| c.is_ascii_digit());
        if !(has_letter && has_digit) || self.password.contains(char::is_whitespace) {
            return Err("Password needs at least one letter and one digit".to_string());
        }
        Ok(())
    }
}

pub const REVIEW_MIN_LENGTH: usize = 50;
pub const REVIEW_MAX_LENGTH: usize = 300;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReviewDraft {
    pub comment: String,
    pub rating: u8,
}

impl ReviewDraft {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.rating) {
            return Err(format!("Rating must be between 1 and 5, got {}", self.rating));
        }
        let length = self.comment.trim().chars().count();
        if !(REVIEW_MIN_LENGTH..=REVIEW_MAX_LENGTH).contains(&length) {
            return Err(format!(
                "Review must have between {REVIEW_MIN_LENGTH} and {REVIEW_MAX_LENGTH} characters, got {length}"
            ));
        }
        Ok(())
    }
}

/// Encoded as `0` / `1` in the favorite endpoint path
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FavoriteStatus {
    NotFavorite = 0,
    Favorite = 1,
}

impl FavoriteStatus {
    pub fn toggled(is_favorite: bool) -> Self {
        if is_favorite {
            FavoriteStatus::NotFavorite
        } else {
            FavoriteStatus::Favorite
        }
    }

    pub fn is_favorite(&self) -> bool {
        matches!(self, FavoriteStatus::Favorite)
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

// Boundary validation

/// Semantic checks on top of what serde already enforces on the shape
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ApiError> {
        self.iter().try_for_each(Validate::validate)
    }
}

impl Validate for () {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

fn check_rating(rating: f64, what: &str) -> Result<(), ApiError> {
    if rating.is_finite() && (0.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(ApiError::ValidationFailure(format!(
            "{what} has rating {rating} outside of 0..=5"
        )))
    }
}

impl Validate for Location {
    fn validate(&self) -> Result<(), ApiError> {
        let valid = (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);
        if valid {
            Ok(())
        } else {
            Err(ApiError::ValidationFailure(format!(
                "Invalid coordinates {}, {}",
                self.latitude, self.longitude
            )))
        }
    }
}

impl Validate for Offer {
    fn validate(&self) -> Result<(), ApiError> {
        if self.city.name.trim().is_empty() {
            return Err(ApiError::ValidationFailure(format!(
                "Offer {} has no city name",
                self.id
            )));
        }
        check_rating(self.rating, &format!("Offer {}", self.id))?;
        self.city.location.validate()?;
        self.location.validate()
    }
}

impl Validate for Review {
    fn validate(&self) -> Result<(), ApiError> {
        check_rating(self.rating, &format!("Review {}", self.id))
    }
}

impl Validate for AuthInfo {
    fn validate(&self) -> Result<(), ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::ValidationFailure(
                "Login response without token".to_string(),
            ));
        }
        Ok(())
    }
}

/// Decode a response body into `T` and run its checks
pub fn decode<T: serde::de::DeserializeOwned + Validate>(body: &[u8]) -> Result<T, ApiError> {
    let value: T = serde_json::from_slice(body)?;
    value.validate()?;
    Ok(value)
}
