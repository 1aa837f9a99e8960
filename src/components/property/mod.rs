mod reducer;
mod view;

pub use reducer::{reduce, PropertyAction, PropertyState};
pub use view::{OfferDetailViewModel, PropertyViewModel, MAX_IMAGES, MAX_NEARBY};
