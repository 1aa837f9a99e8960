mod reducer;
mod view;

pub use reducer::{reduce, FavoritesAction};
pub use view::{FavoritesViewModel, FavoritesGroup};
