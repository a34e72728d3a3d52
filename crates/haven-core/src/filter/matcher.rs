//! Evaluation of [`FilterCriteria`] against a [`Listing`].

use super::criteria::{ExactField, FilterCriteria, RangeField, TextField};
use crate::listing::Listing;

impl TextField {
    fn value_of<'a>(&self, listing: &'a Listing) -> &'a str {
        match self {
            TextField::State => &listing.state,
            TextField::City => &listing.city,
            TextField::Type => &listing.property_type,
            TextField::Furnished => &listing.furnished,
            TextField::ListingType => &listing.listing_type,
            TextField::ListedBy => &listing.listed_by,
            TextField::ColorTheme => &listing.color_theme,
            TextField::Amenities => &listing.amenities,
            TextField::Tags => &listing.tags,
        }
    }
}

impl ExactField {
    fn value_of(&self, listing: &Listing) -> u32 {
        match self {
            ExactField::Bedrooms => listing.bedrooms,
            ExactField::Bathrooms => listing.bathrooms,
        }
    }
}

impl RangeField {
    fn value_of(&self, listing: &Listing) -> f64 {
        match self {
            RangeField::Price => listing.price,
            RangeField::AreaSqFt => listing.area_sq_ft,
            RangeField::Rating => listing.rating,
        }
    }
}

impl FilterCriteria {
    /// Returns true if the listing satisfies every present condition.
    pub fn matches(&self, listing: &Listing) -> bool {
        let text_ok = TextField::ALL.iter().all(|field| match self.text(*field) {
            Some(needle) => contains_ignore_case(field.value_of(listing), needle),
            None => true,
        });

        let exact_ok = ExactField::ALL.iter().all(|field| match self.exact(*field) {
            Some(expected) => field.value_of(listing) == expected,
            None => true,
        });

        let range_ok = RangeField::ALL.iter().all(|field| match self.range(*field) {
            Some(bounds) => bounds.contains(field.value_of(listing)),
            None => true,
        });

        let verified_ok = self
            .is_verified()
            .is_none_or(|expected| listing.is_verified == expected);

        let date_ok = self
            .available_from()
            .is_none_or(|condition| condition.contains(listing.available_from));

        text_ok && exact_ok && range_ok && verified_ok && date_ok
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
