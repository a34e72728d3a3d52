//! Listing records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ListingId, OwnerId};

/// A real-estate listing as persisted by the durable store.
///
/// The caching layer only cares about the id, the owner and the
/// filterable/sortable attributes; everything else is carried along
/// opaquely in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub state: String,
    pub city: String,
    pub area_sq_ft: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Pipe separated, e.g. `pool|gym|garden`.
    pub amenities: String,
    pub furnished: String,
    pub available_from: NaiveDate,
    pub listed_by: String,
    /// Pipe separated, e.g. `luxury|family`.
    pub tags: String,
    pub color_theme: String,
    pub rating: f64,
    pub is_verified: bool,
    pub listing_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a listing. Id and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub state: String,
    pub city: String,
    pub area_sq_ft: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub amenities: String,
    pub furnished: String,
    pub available_from: NaiveDate,
    pub listed_by: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub color_theme: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub is_verified: bool,
    pub listing_type: String,
}

impl NewListing {
    /// Materializes the listing with the given id and creation time.
    pub fn into_listing(self, id: ListingId, now: DateTime<Utc>) -> Listing {
        Listing {
            id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            property_type: self.property_type,
            price: self.price,
            state: self.state,
            city: self.city,
            area_sq_ft: self.area_sq_ft,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            amenities: self.amenities,
            furnished: self.furnished,
            available_from: self.available_from,
            listed_by: self.listed_by,
            tags: self.tags,
            color_theme: self.color_theme,
            rating: self.rating,
            is_verified: self.is_verified,
            listing_type: self.listing_type,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a listing. Absent fields are left untouched.
///
/// The owner cannot be changed through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub price: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub area_sq_ft: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub amenities: Option<String>,
    pub furnished: Option<String>,
    pub available_from: Option<NaiveDate>,
    pub listed_by: Option<String>,
    pub tags: Option<String>,
    pub color_theme: Option<String>,
    pub rating: Option<f64>,
    pub is_verified: Option<bool>,
    pub listing_type: Option<String>,
}

impl ListingPatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply(self, listing: &mut Listing, now: DateTime<Utc>) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut listing.title, self.title);
        set(&mut listing.description, self.description);
        set(&mut listing.property_type, self.property_type);
        set(&mut listing.price, self.price);
        set(&mut listing.state, self.state);
        set(&mut listing.city, self.city);
        set(&mut listing.area_sq_ft, self.area_sq_ft);
        set(&mut listing.bedrooms, self.bedrooms);
        set(&mut listing.bathrooms, self.bathrooms);
        set(&mut listing.amenities, self.amenities);
        set(&mut listing.furnished, self.furnished);
        set(&mut listing.available_from, self.available_from);
        set(&mut listing.listed_by, self.listed_by);
        set(&mut listing.tags, self.tags);
        set(&mut listing.color_theme, self.color_theme);
        set(&mut listing.rating, self.rating);
        set(&mut listing.is_verified, self.is_verified);
        set(&mut listing.listing_type, self.listing_type);
        listing.updated_at = now;
    }
}
