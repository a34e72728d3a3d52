//! Canonical, typed filter criteria.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde_json::{Map, Value, json};

/// Text dimensions, matched as case-insensitive substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextField {
    State,
    City,
    Type,
    Furnished,
    ListingType,
    ListedBy,
    ColorTheme,
    Amenities,
    Tags,
}

impl TextField {
    /// Every text dimension, in declaration order.
    pub const ALL: [TextField; 9] = [
        TextField::State,
        TextField::City,
        TextField::Type,
        TextField::Furnished,
        TextField::ListingType,
        TextField::ListedBy,
        TextField::ColorTheme,
        TextField::Amenities,
        TextField::Tags,
    ];

    /// Parameter name of the dimension.
    pub fn name(self) -> &'static str {
        match self {
            TextField::State => "state",
            TextField::City => "city",
            TextField::Type => "type",
            TextField::Furnished => "furnished",
            TextField::ListingType => "listingType",
            TextField::ListedBy => "listedBy",
            TextField::ColorTheme => "colorTheme",
            TextField::Amenities => "amenities",
            TextField::Tags => "tags",
        }
    }
}

/// Integer dimensions, matched by equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExactField {
    Bedrooms,
    Bathrooms,
}

impl ExactField {
    pub const ALL: [ExactField; 2] = [ExactField::Bedrooms, ExactField::Bathrooms];

    pub fn name(self) -> &'static str {
        match self {
            ExactField::Bedrooms => "bedrooms",
            ExactField::Bathrooms => "bathrooms",
        }
    }
}

/// Numeric dimensions filtered by inclusive `min`/`max` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RangeField {
    Price,
    AreaSqFt,
    Rating,
}

impl RangeField {
    pub const ALL: [RangeField; 3] = [RangeField::Price, RangeField::AreaSqFt, RangeField::Rating];

    /// Name used in `appliedFilters`.
    pub fn name(self) -> &'static str {
        match self {
            RangeField::Price => "price",
            RangeField::AreaSqFt => "areaSqFt",
            RangeField::Rating => "rating",
        }
    }

    /// Request parameter carrying the lower bound.
    pub fn min_param(self) -> &'static str {
        match self {
            RangeField::Price => "minPrice",
            RangeField::AreaSqFt => "minAreaSqFt",
            RangeField::Rating => "minRating",
        }
    }

    /// Request parameter carrying the upper bound.
    pub fn max_param(self) -> &'static str {
        match self {
            RangeField::Price => "maxPrice",
            RangeField::AreaSqFt => "maxAreaSqFt",
            RangeField::Rating => "maxRating",
        }
    }
}

/// Inclusive numeric bounds with at least one side present.
///
/// `min > max` is kept as given and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    min: Option<OrderedFloat<f64>>,
    max: Option<OrderedFloat<f64>>,
}

impl Bounds {
    /// Returns `None` when neither side is given or a side is not finite.
    ///
    /// ```
    /// use haven_core::Bounds;
    ///
    /// assert!(Bounds::new(None, None).is_none());
    /// assert!(Bounds::new(Some(f64::NAN), None).is_none());
    ///
    /// let bounds = Bounds::new(Some(100.0), None).unwrap();
    /// assert!(bounds.contains(100.0));
    /// assert!(!bounds.contains(99.9));
    /// ```
    pub fn new(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        if min.is_some_and(|v| !v.is_finite()) || max.is_some_and(|v| !v.is_finite()) {
            return None;
        }
        if min.is_none() && max.is_none() {
            return None;
        }
        // -0.0 + 0.0 == +0.0, so both zeros share one canonical form
        Some(Self {
            min: min.map(|v| OrderedFloat(v + 0.0)),
            max: max.map(|v| OrderedFloat(v + 0.0)),
        })
    }

    pub fn min(&self) -> Option<f64> {
        self.min.map(|v| v.into_inner())
    }

    pub fn max(&self) -> Option<f64> {
        self.max.map(|v| v.into_inner())
    }

    /// Inclusive on both sides.
    pub fn contains(&self, value: f64) -> bool {
        self.min().is_none_or(|min| value >= min) && self.max().is_none_or(|max| value <= max)
    }
}

/// Date condition on `availableFrom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateMatch {
    /// Exactly this date.
    On(NaiveDate),
    /// Inclusive range; at least one side is present.
    Between {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateMatch {
    /// Builds a range condition, or `None` if both sides are absent.
    pub fn between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        if start.is_none() && end.is_none() {
            None
        } else {
            Some(DateMatch::Between { start, end })
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            DateMatch::On(on) => date == on,
            DateMatch::Between { start, end } => {
                start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
            },
        }
    }
}

/// The canonical predicate produced from raw query parameters.
///
/// Every dimension is optional. Values are stored already normalized, so two
/// criteria compare equal exactly when they select the same listings by the
/// same rules. The fields are private so that nothing can build a
/// non-canonical value (blank text, an empty range) from the outside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    text: BTreeMap<TextField, String>,
    exact: BTreeMap<ExactField, u32>,
    ranges: BTreeMap<RangeField, Bounds>,
    is_verified: Option<bool>,
    available_from: Option<DateMatch>,
}

impl FilterCriteria {
    /// Creates criteria that match every listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a text condition. Blank values remove the condition.
    pub fn set_text(&mut self, field: TextField, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if value.is_empty() {
            self.text.remove(&field);
        } else {
            self.text.insert(field, value.to_string());
        }
    }

    pub fn set_exact(&mut self, field: ExactField, value: u32) {
        self.exact.insert(field, value);
    }

    pub fn set_range(&mut self, field: RangeField, bounds: Bounds) {
        self.ranges.insert(field, bounds);
    }

    pub fn set_verified(&mut self, verified: bool) {
        self.is_verified = Some(verified);
    }

    pub fn set_available_from(&mut self, condition: DateMatch) {
        self.available_from = Some(condition);
    }

    /// Builder-style variant of [`FilterCriteria::set_text`].
    pub fn with_text(mut self, field: TextField, value: impl AsRef<str>) -> Self {
        self.set_text(field, value);
        self
    }

    pub fn with_exact(mut self, field: ExactField, value: u32) -> Self {
        self.set_exact(field, value);
        self
    }

    pub fn with_range(mut self, field: RangeField, bounds: Bounds) -> Self {
        self.set_range(field, bounds);
        self
    }

    pub fn with_verified(mut self, verified: bool) -> Self {
        self.set_verified(verified);
        self
    }

    pub fn with_available_from(mut self, condition: DateMatch) -> Self {
        self.set_available_from(condition);
        self
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        self.text.get(&field).map(String::as_str)
    }

    pub fn exact(&self, field: ExactField) -> Option<u32> {
        self.exact.get(&field).copied()
    }

    pub fn range(&self, field: RangeField) -> Option<Bounds> {
        self.ranges.get(&field).copied()
    }

    pub fn is_verified(&self) -> Option<bool> {
        self.is_verified
    }

    pub fn available_from(&self) -> Option<DateMatch> {
        self.available_from
    }

    /// Returns true if no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.exact.is_empty()
            && self.ranges.is_empty()
            && self.is_verified.is_none()
            && self.available_from.is_none()
    }

    /// Renders every present dimension as a `(name, value)` pair.
    ///
    /// Names are the request parameter names, so each range and date side
    /// becomes its own pair. The mapping is injective: distinct criteria
    /// always produce distinct pair sets. Order is unspecified; the cache key
    /// deriver sorts.
    pub fn dimensions(&self) -> Vec<(&'static str, String)> {
        let mut dims = Vec::new();

        for (field, value) in &self.text {
            dims.push((field.name(), value.clone()));
        }
        for (field, value) in &self.exact {
            dims.push((field.name(), value.to_string()));
        }
        for (field, bounds) in &self.ranges {
            if let Some(min) = bounds.min {
                dims.push((field.min_param(), min.to_string()));
            }
            if let Some(max) = bounds.max {
                dims.push((field.max_param(), max.to_string()));
            }
        }
        if let Some(verified) = self.is_verified {
            dims.push(("isVerified", verified.to_string()));
        }
        match self.available_from {
            Some(DateMatch::On(date)) => dims.push(("availableFrom", date.to_string())),
            Some(DateMatch::Between { start, end }) => {
                if let Some(start) = start {
                    dims.push(("availableFromStart", start.to_string()));
                }
                if let Some(end) = end {
                    dims.push(("availableFromEnd", end.to_string()));
                }
            },
            None => {},
        }

        dims
    }

    /// Resolved filter values as echoed back in `appliedFilters`.
    pub fn applied(&self) -> BTreeMap<String, Value> {
        let mut applied = BTreeMap::new();

        for (field, value) in &self.text {
            applied.insert(field.name().to_string(), json!(value));
        }
        for (field, value) in &self.exact {
            applied.insert(field.name().to_string(), json!(value));
        }
        for (field, bounds) in &self.ranges {
            let mut range = Map::new();
            if let Some(min) = bounds.min() {
                range.insert("min".to_string(), json!(min));
            }
            if let Some(max) = bounds.max() {
                range.insert("max".to_string(), json!(max));
            }
            applied.insert(field.name().to_string(), Value::Object(range));
        }
        if let Some(verified) = self.is_verified {
            applied.insert("isVerified".to_string(), json!(verified));
        }
        match self.available_from {
            Some(DateMatch::On(date)) => {
                applied.insert("availableFrom".to_string(), json!(date.to_string()));
            },
            Some(DateMatch::Between { start, end }) => {
                let mut range = Map::new();
                if let Some(start) = start {
                    range.insert("start".to_string(), json!(start.to_string()));
                }
                if let Some(end) = end {
                    range.insert("end".to_string(), json!(end.to_string()));
                }
                applied.insert("availableFrom".to_string(), Value::Object(range));
            },
            None => {},
        }

        applied
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dims = self.dimensions();
        dims.sort();
        let rendered: Vec<String> = dims.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}
