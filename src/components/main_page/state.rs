use super::sort::SortType;
use crate::environment::types::OfferId;

/// Page local state. The sort order never goes into the store.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MainState {
    pub sort: SortType,
    pub sort_list_open: bool,
    /// The hovered card, highlighted on the map
    pub active_card: Option<OfferId>,
}
