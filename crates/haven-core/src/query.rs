//! Pagination and sorting.

use std::cmp::Ordering;
use std::fmt;
use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

use crate::error::{HavenError, Result};
use crate::filter::FilterCriteria;
use crate::listing::Listing;
use crate::params::RawParams;

/// Default page size.
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest page size the server will honour.
pub const MAX_LIMIT: u64 = 50;

/// A resolved page request.
///
/// `page` is at least 1 and `limit` lies in `[1, MAX_LIMIT]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    page: u64,
    limit: u64,
    skip: u64,
}

impl Pagination {
    /// Clamps the raw values into range.
    ///
    /// Returns an error only when the resulting offset is not representable.
    ///
    /// ```
    /// use haven_core::Pagination;
    ///
    /// let p = Pagination::new(0, 500).unwrap();
    /// assert_eq!((p.page(), p.limit(), p.skip()), (1, 50, 0));
    ///
    /// let p = Pagination::new(3, 0).unwrap();
    /// assert_eq!((p.page(), p.limit(), p.skip()), (3, 1, 2));
    /// ```
    pub fn new(page: i64, limit: i64) -> Result<Self> {
        let page = page.max(1) as u64;
        let limit = limit.clamp(1, MAX_LIMIT as i64) as u64;
        let skip = (page - 1).checked_mul(limit).ok_or_else(|| {
            HavenError::invalid_parameter("page", "page is too large for the given limit")
        })?;

        Ok(Self { page, limit, skip })
    }

    /// Reads `page` and `limit` from the request.
    ///
    /// Non-numeric values fall back to the defaults (fail open, like filters);
    /// integers beyond the 64-bit range are rejected.
    pub fn from_params(params: &RawParams) -> Result<Self> {
        let page = parse_int(params, "page", 1)?;
        let limit = parse_int(params, "limit", DEFAULT_LIMIT as i64)?;
        Self::new(page, limit)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of records to skip: `(page - 1) * limit`.
    pub fn skip(&self) -> u64 {
        self.skip
    }

    /// `(name, value)` pairs folded into cache keys.
    pub fn dimensions(&self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            skip: 0,
        }
    }
}

fn parse_int(params: &RawParams, name: &str, default: i64) -> Result<i64> {
    let Some(raw) = params.get(name) else {
        return Ok(default);
    };

    match raw.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => Err(
            HavenError::invalid_parameter(name, format!("'{}' is out of range", raw)),
        ),
        Err(_) => Ok(default),
    }
}

/// Sortable listing attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Price,
    AreaSqFt,
    Rating,
    Bedrooms,
    Bathrooms,
    Title,
    State,
    City,
}

impl SortField {
    /// Looks up an allowlisted field by its wire name (case-sensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        let field = match raw {
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "price" => SortField::Price,
            "areaSqFt" => SortField::AreaSqFt,
            "rating" => SortField::Rating,
            "bedrooms" => SortField::Bedrooms,
            "bathrooms" => SortField::Bathrooms,
            "title" => SortField::Title,
            "state" => SortField::State,
            "city" => SortField::City,
            _ => return None,
        };
        Some(field)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Price => "price",
            SortField::AreaSqFt => "areaSqFt",
            SortField::Rating => "rating",
            SortField::Bedrooms => "bedrooms",
            SortField::Bathrooms => "bathrooms",
            SortField::Title => "title",
            SortField::State => "state",
            SortField::City => "city",
        }
    }

    fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::AreaSqFt => a.area_sq_ft.total_cmp(&b.area_sq_ft),
            SortField::Rating => a.rating.total_cmp(&b.rating),
            SortField::Bedrooms => a.bedrooms.cmp(&b.bedrooms),
            SortField::Bathrooms => a.bathrooms.cmp(&b.bathrooms),
            SortField::Title => a.title.cmp(&b.title),
            SortField::State => a.state.cmp(&b.state),
            SortField::City => a.city.cmp(&b.city),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `asc` or `desc`, case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(SortOrder::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(SortOrder::Desc)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort applied to a listing query.
///
/// Unknown fields are silently replaced by `createdAt` rather than rejected,
/// and an unknown direction by `desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Reads `sortBy` and `sortOrder` from the request.
    ///
    /// ```
    /// use haven_core::{RawParams, SortField, SortOrder, SortSpec};
    ///
    /// let sort = SortSpec::from_params(&RawParams::from_pairs([("sortBy", "notAField")]));
    /// assert_eq!(sort, SortSpec::new(SortField::CreatedAt, SortOrder::Desc));
    /// ```
    pub fn from_params(params: &RawParams) -> Self {
        let field = params
            .get("sortBy")
            .and_then(SortField::parse)
            .unwrap_or_default();
        let order = params
            .get("sortOrder")
            .and_then(SortOrder::parse)
            .unwrap_or_default();
        Self { field, order }
    }

    /// Total order over listings; ties are broken by id in the same direction
    /// so that pages never overlap.
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        let ordering = self.field.compare(a, b).then_with(|| a.id.cmp(&b.id));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// `(name, value)` pairs folded into cache keys.
    pub fn dimensions(&self) -> Vec<(&'static str, String)> {
        vec![
            ("sortBy", self.field.as_str().to_string()),
            ("sortOrder", self.order.as_str().to_string()),
        ]
    }
}

/// Everything a list request resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub criteria: FilterCriteria,
    pub pagination: Pagination,
    pub sort: SortSpec,
}

impl ListingQuery {
    /// Resolves filters, pagination and sort from raw parameters.
    pub fn from_params(params: &RawParams) -> Result<Self> {
        Ok(Self {
            criteria: FilterCriteria::from_params(params),
            pagination: Pagination::from_params(params)?,
            sort: SortSpec::from_params(params),
        })
    }

    /// All dimensions of the query, ready for cache key derivation.
    pub fn dimensions(&self) -> Vec<(&'static str, String)> {
        let mut dims = self.criteria.dimensions();
        dims.extend(self.pagination.dimensions());
        dims.extend(self.sort.dimensions());
        dims
    }
}
