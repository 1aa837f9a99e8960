use super::sort::SortType;
use crate::environment::types::OfferId;

#[derive(Clone, Debug)]
pub enum MainAction {
    Load,
    SelectCity(String),
    ToggleSortList,
    Sort(SortType),
    Hover(Option<OfferId>),
    ToggleFavorite(OfferId),
}
