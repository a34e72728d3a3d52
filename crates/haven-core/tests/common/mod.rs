#![allow(dead_code)]
use chrono::{NaiveDate, TimeZone, Utc};
use haven_core::{Listing, ListingId, NewListing, OwnerId};

/// Returns a listing fixture with sensible defaults; tweak fields as needed.
pub fn listing(city: &str, price: f64, bedrooms: u32) -> Listing {
    NewListing {
        owner_id: OwnerId::generate(),
        title: format!("{} home", city),
        description: String::new(),
        property_type: "House".to_string(),
        price,
        state: "Texas".to_string(),
        city: city.to_string(),
        area_sq_ft: 1500.0,
        bedrooms,
        bathrooms: 2,
        amenities: "parking".to_string(),
        furnished: "Unfurnished".to_string(),
        available_from: NaiveDate::from_ymd_opt(2025, 4, 1).expect("valid date"),
        listed_by: "Owner".to_string(),
        tags: String::new(),
        color_theme: "#336699".to_string(),
        rating: 3.5,
        is_verified: false,
        listing_type: "rent".to_string(),
    }
    .into_listing(
        ListingId::generate(),
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    )
}
