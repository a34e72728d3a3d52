//! Filter predicate builder: raw parameters into [`FilterCriteria`].
//!
//! The builder is lenient by design of the API contract: a value that cannot
//! be parsed for its dimension (`minPrice=abc`, `bedrooms=2.5`,
//! `isVerified=maybe`, `availableFrom=soon`) is treated exactly as if the
//! parameter had not been sent. The filter fails open and the request still
//! succeeds, returning a broader result set.

use chrono::{DateTime, NaiveDate};

use super::criteria::{Bounds, DateMatch, ExactField, FilterCriteria, RangeField, TextField};
use crate::params::RawParams;

impl FilterCriteria {
    /// Builds canonical criteria from raw request parameters.
    ///
    /// Deterministic and free of I/O: the same parameters (in any order)
    /// always produce the same criteria.
    ///
    /// # Example
    ///
    /// ```
    /// use haven_core::{FilterCriteria, RangeField, RawParams, TextField};
    ///
    /// let params = RawParams::from_pairs([
    ///     ("city", "Austin"),
    ///     ("minPrice", "200000"),
    ///     ("maxPrice", "not-a-number"),
    /// ]);
    /// let criteria = FilterCriteria::from_params(&params);
    ///
    /// assert_eq!(criteria.text(TextField::City), Some("Austin"));
    /// let price = criteria.range(RangeField::Price).unwrap();
    /// assert_eq!(price.min(), Some(200000.0));
    /// assert_eq!(price.max(), None);
    /// ```
    pub fn from_params(params: &RawParams) -> Self {
        let mut criteria = FilterCriteria::new();

        for field in TextField::ALL {
            if let Some(value) = params.get(field.name()) {
                criteria.set_text(field, value);
            }
        }

        for field in ExactField::ALL {
            if let Some(value) = params.get(field.name()).and_then(parse_count) {
                criteria.set_exact(field, value);
            }
        }

        for field in RangeField::ALL {
            let min = params.get(field.min_param()).and_then(parse_number);
            let max = params.get(field.max_param()).and_then(parse_number);
            if let Some(bounds) = Bounds::new(min, max) {
                criteria.set_range(field, bounds);
            }
        }

        if let Some(verified) = params.get("isVerified").and_then(parse_flag) {
            criteria.set_verified(verified);
        }

        let exact_date = params.get("availableFrom").and_then(parse_date);
        let date_condition = match exact_date {
            Some(date) => Some(DateMatch::On(date)),
            None => DateMatch::between(
                params.get("availableFromStart").and_then(parse_date),
                params.get("availableFromEnd").and_then(parse_date),
            ),
        };
        if let Some(condition) = date_condition {
            criteria.set_available_from(condition);
        }

        criteria
    }
}

/// Finite decimal number.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Non-negative whole number.
pub(crate) fn parse_count(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok()
}

/// Loose boolean coercion.
pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its date.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(pairs: &[(&str, &str)]) -> FilterCriteria {
        FilterCriteria::from_params(&RawParams::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_empty_params_give_empty_criteria() {
        assert!(build(&[]).is_empty());
        assert!(build(&[("city", ""), ("minPrice", "")]).is_empty());
    }

    #[test]
    fn test_pagination_params_are_not_filters() {
        let criteria = build(&[("page", "2"), ("limit", "5"), ("sortBy", "price")]);
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_all_text_dimensions() {
        let pairs: Vec<(&str, &str)> = TextField::ALL.iter().map(|f| (f.name(), "x")).collect();
        let criteria = build(&pairs);

        for field in TextField::ALL {
            assert_eq!(criteria.text(field), Some("x"), "{:?}", field);
        }
    }

    #[test]
    fn test_exact_dimensions() {
        let criteria = build(&[("bedrooms", "3"), ("bathrooms", "2")]);
        assert_eq!(criteria.exact(ExactField::Bedrooms), Some(3));
        assert_eq!(criteria.exact(ExactField::Bathrooms), Some(2));
    }

    #[test]
    fn test_malformed_numbers_fail_open() {
        let criteria = build(&[
            ("bedrooms", "three"),
            ("bathrooms", "-1"),
            ("minPrice", "abc"),
            ("maxRating", "NaN"),
            ("minAreaSqFt", "inf"),
        ]);
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_fractional_count_is_malformed() {
        let criteria = build(&[("bedrooms", "2.5")]);
        assert_eq!(criteria.exact(ExactField::Bedrooms), None);
    }

    #[test]
    fn test_one_sided_ranges() {
        let criteria = build(&[("minPrice", "1000"), ("maxAreaSqFt", "750.5")]);

        let price = criteria.range(RangeField::Price).unwrap();
        assert_eq!(price.min(), Some(1000.0));
        assert_eq!(price.max(), None);

        let area = criteria.range(RangeField::AreaSqFt).unwrap();
        assert_eq!(area.min(), None);
        assert_eq!(area.max(), Some(750.5));

        assert_eq!(criteria.range(RangeField::Rating), None);
    }

    #[test]
    fn test_half_malformed_range_keeps_valid_side() {
        let criteria = build(&[("minRating", "x"), ("maxRating", "4")]);
        let rating = criteria.range(RangeField::Rating).unwrap();
        assert_eq!(rating.min(), None);
        assert_eq!(rating.max(), Some(4.0));
    }

    #[test]
    fn test_verified_coercion() {
        for raw in ["true", "TRUE", "1", "yes", "on"] {
            assert_eq!(build(&[("isVerified", raw)]).is_verified(), Some(true), "{}", raw);
        }
        for raw in ["false", "0", "No", "off"] {
            assert_eq!(build(&[("isVerified", raw)]).is_verified(), Some(false), "{}", raw);
        }
        assert_eq!(build(&[("isVerified", "maybe")]).is_verified(), None);
    }

    #[test]
    fn test_available_from_exact_wins() {
        let criteria = build(&[
            ("availableFrom", "2025-06-01"),
            ("availableFromStart", "2025-01-01"),
        ]);
        assert_eq!(
            criteria.available_from(),
            Some(DateMatch::On(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()))
        );
    }

    #[test]
    fn test_available_from_range() {
        let criteria = build(&[
            ("availableFromStart", "2025-01-01T00:00:00Z"),
            ("availableFromEnd", "garbage"),
        ]);
        assert_eq!(
            criteria.available_from(),
            Some(DateMatch::Between {
                start: Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
                end: None,
            })
        );
    }

    #[test]
    fn test_malformed_exact_date_falls_back_to_range() {
        let criteria = build(&[("availableFrom", "soon"), ("availableFromEnd", "2025-12-31")]);
        assert!(matches!(
            criteria.available_from(),
            Some(DateMatch::Between { start: None, end: Some(_) })
        ));
    }

    #[test]
    fn test_parameter_order_is_irrelevant() {
        let a = build(&[("city", "Austin"), ("minPrice", "200000"), ("bedrooms", "2")]);
        let b = build(&[("bedrooms", "2"), ("minPrice", "200000"), ("city", "Austin")]);
        assert_eq!(a, b);
    }
}
