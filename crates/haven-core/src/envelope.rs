//! Response envelopes returned to clients and stored in the cache.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::FilterCriteria;
use crate::listing::Listing;
use crate::query::{Pagination, SortField, SortOrder, SortSpec};

/// Page metadata for list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    /// Derives page metadata from the requested page and the total match count.
    ///
    /// ```
    /// use haven_core::{PageInfo, Pagination};
    ///
    /// let info = PageInfo::compute(&Pagination::new(11, 10).unwrap(), 101);
    /// assert_eq!(info.total_pages, 11);
    /// assert!(!info.has_next);
    /// assert!(info.has_prev);
    /// ```
    pub fn compute(pagination: &Pagination, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(pagination.limit());
        Self {
            current_page: pagination.page(),
            total_pages,
            total_count,
            limit: pagination.limit(),
            has_next: pagination.page() < total_pages,
            has_prev: pagination.page() > 1,
        }
    }
}

/// Echo of the resolved query: filter values plus the effective sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    #[serde(flatten)]
    pub filters: BTreeMap<String, Value>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl AppliedFilters {
    pub fn new(criteria: &FilterCriteria, sort: &SortSpec) -> Self {
        Self {
            filters: criteria.applied(),
            sort_by: sort.field,
            sort_order: sort.order,
        }
    }

    /// Adds an extra resolved value, e.g. the owner of a scoped list.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }
}

/// Paginated list response.
///
/// `fromCache` is only serialized (as `true`) when the envelope was served
/// from the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope {
    pub success: bool,
    pub data: Vec<Listing>,
    pub pagination: PageInfo,
    pub applied_filters: AppliedFilters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
}

impl ListEnvelope {
    pub fn new(data: Vec<Listing>, pagination: PageInfo, applied_filters: AppliedFilters) -> Self {
        Self {
            success: true,
            data,
            pagination,
            applied_filters,
            from_cache: None,
        }
    }

    /// Marks the envelope as a cache hit.
    pub fn served_from_cache(mut self) -> Self {
        self.from_cache = Some(true);
        self
    }

    /// Returns true if the envelope came from the cache.
    pub fn is_from_cache(&self) -> bool {
        self.from_cache == Some(true)
    }
}

/// Single-record response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEnvelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
}

impl<T> RecordEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            from_cache: None,
        }
    }

    pub fn served_from_cache(mut self) -> Self {
        self.from_cache = Some(true);
        self
    }

    pub fn is_from_cache(&self) -> bool {
        self.from_cache == Some(true)
    }
}
