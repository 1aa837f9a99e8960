mod action;
mod reducer;
mod sort;
mod state;
mod view;

pub use action::MainAction;
pub use reducer::reduce;
pub use sort::{sort_offers, SortType};
pub use state::MainState;
pub use view::MainViewModel;
