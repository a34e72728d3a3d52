//! Store query types.

use haven_core::{FilterCriteria, Listing, OwnerId, Pagination, SortSpec};

/// Predicate understood by the store: filter criteria optionally scoped to
/// one owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPredicate {
    criteria: FilterCriteria,
    owner: Option<OwnerId>,
}

impl ListingPredicate {
    /// Matches listings satisfying the criteria.
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            owner: None,
        }
    }

    /// Matches every listing of one owner.
    pub fn owned_by(owner: OwnerId) -> Self {
        Self {
            criteria: FilterCriteria::new(),
            owner: Some(owner),
        }
    }

    /// Returns a new predicate restricted to the given owner.
    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.owner.is_none_or(|owner| listing.owner_id == owner) && self.criteria.matches(listing)
    }
}

/// A find request: predicate plus sort, skip and limit.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    predicate: ListingPredicate,
    sort: SortSpec,
    skip: u64,
    limit: Option<u64>,
}

impl StoreQuery {
    /// Unpaged query in the default sort order.
    pub fn new(predicate: ListingPredicate) -> Self {
        Self {
            predicate,
            sort: SortSpec::default(),
            skip: 0,
            limit: None,
        }
    }

    /// Returns a new query with the given sort.
    pub fn sorted(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Returns a new query restricted to one page.
    pub fn paged(mut self, pagination: &Pagination) -> Self {
        self.skip = pagination.skip();
        self.limit = Some(pagination.limit());
        self
    }

    pub fn predicate(&self) -> &ListingPredicate {
        &self.predicate
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    /// `None` means no limit.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}
