use strum_macros::{Display, EnumIter, EnumString};

use crate::environment::types::Offer;

#[derive(Display, EnumIter, EnumString, Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum SortType {
    #[default]
    #[strum(serialize = "popular", to_string = "Popular")]
    Popular,
    #[strum(serialize = "price-asc", to_string = "Price: low to high")]
    PriceLowToHigh,
    #[strum(serialize = "price-desc", to_string = "Price: high to low")]
    PriceHighToLow,
    #[strum(serialize = "top-rated", to_string = "Top rated first")]
    TopRatedFirst,
}

impl SortType {
    /// The name used on the command line
    pub fn key(&self) -> &'static str {
        match self {
            SortType::Popular => "popular",
            SortType::PriceLowToHigh => "price-asc",
            SortType::PriceHighToLow => "price-desc",
            SortType::TopRatedFirst => "top-rated",
        }
    }
}

/// A sorted copy of `offers`. Offers that compare equal keep their order,
/// `Popular` is the order the server sent.
pub fn sort_offers(offers: &[Offer], sort: SortType) -> Vec<Offer> {
    let mut sorted = offers.to_vec();
    match sort {
        SortType::Popular => {}
        SortType::PriceLowToHigh => sorted.sort_by_key(|o| o.price),
        SortType::PriceHighToLow => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortType::TopRatedFirst => sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::environment::model::mock::make_offer;
    use crate::environment::types::OfferId;

    fn ids(offers: &[Offer]) -> Vec<u32> {
        offers.iter().map(|o| o.id.0).collect()
    }

    fn offers() -> Vec<Offer> {
        let mut offers = vec![
            make_offer(1, "Paris", 120),
            make_offer(2, "Paris", 80),
            make_offer(3, "Paris", 120),
            make_offer(4, "Paris", 80),
        ];
        offers[2].rating = 4.9;
        offers[3].rating = 3.1;
        offers
    }

    #[test]
    fn test_price_sort_is_stable() {
        assert_eq!(ids(&sort_offers(&offers(), SortType::PriceLowToHigh)), vec![2, 4, 1, 3]);
        assert_eq!(ids(&sort_offers(&offers(), SortType::PriceHighToLow)), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        for sort in SortType::iter() {
            let once = sort_offers(&offers(), sort);
            let twice = sort_offers(&once, sort);
            assert_eq!(ids(&once), ids(&twice), "{sort}");
        }
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let input = offers();
        let _ = sort_offers(&input, SortType::TopRatedFirst);
        assert_eq!(ids(&input), vec![1, 2, 3, 4]);
        assert_eq!(ids(&sort_offers(&input, SortType::Popular)), vec![1, 2, 3, 4]);
        assert_eq!(sort_offers(&input, SortType::TopRatedFirst)[0].id, OfferId(3));
        assert_eq!(sort_offers(&input, SortType::TopRatedFirst)[3].id, OfferId(4));
    }

    #[test]
    fn test_keys() {
        for sort in SortType::iter() {
            assert_eq!(SortType::from_str(sort.key()), Ok(sort));
        }
        assert_eq!(SortType::Popular.to_string(), "Popular");
        assert!(SortType::from_str("cheapest").is_err());
    }
}
