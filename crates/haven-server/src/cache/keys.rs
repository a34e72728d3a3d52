//! Cache key derivation.
//!
//! A key is `<namespace>:<encoded dimensions>`. Dimensions are sorted by name,
//! rendered as `name:value` with the value percent-encoded, joined with `|`,
//! and the whole string is percent-encoded once more. Encoded text never
//! contains `:` or `|`, so two keys are equal exactly when their namespaces
//! and `(name, value)` sets are equal.

use std::fmt;
use std::str::FromStr;

use haven_core::{HavenError, ListingId, ListingQuery, OwnerId, Pagination, SortSpec};

/// Root shared by every key this service writes.
pub const KEY_ROOT: &str = "listings";

const DIMENSION_SEPARATOR: char = '|';

/// A partition of the key space that can be invalidated on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Filtered, paginated, sorted list results.
    List,
    /// Single listings by id.
    Record,
    /// Lists scoped to one owner.
    Owner(OwnerId),
}

impl Namespace {
    /// Key prefix covering every entry of this namespace.
    ///
    /// Prefixes are prefix-free among themselves: no namespace's prefix is
    /// the start of another's.
    pub fn prefix(&self) -> String {
        match self {
            Namespace::List => format!("{}:list", KEY_ROOT),
            Namespace::Record => format!("{}:item", KEY_ROOT),
            Namespace::Owner(owner) => format!("{}:owner:{}", KEY_ROOT, owner),
        }
    }

    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Namespace::List => "list",
            Namespace::Record => "record",
            Namespace::Owner(_) => "owner",
        }
    }
}

/// The namespaces as addressed by the admin flush endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceKind {
    List,
    Record,
    /// Every owner-scoped namespace.
    Owner,
}

impl NamespaceKind {
    pub fn prefix(&self) -> String {
        match self {
            NamespaceKind::List => Namespace::List.prefix(),
            NamespaceKind::Record => Namespace::Record.prefix(),
            NamespaceKind::Owner => format!("{}:owner:", KEY_ROOT),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NamespaceKind::List => "list",
            NamespaceKind::Record => "record",
            NamespaceKind::Owner => "owner",
        }
    }
}

impl FromStr for NamespaceKind {
    type Err = HavenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(NamespaceKind::List),
            "record" => Ok(NamespaceKind::Record),
            "owner" => Ok(NamespaceKind::Owner),
            other => Err(HavenError::invalid_parameter(
                "namespace",
                format!("unknown cache namespace '{}' (expected list, record or owner)", other),
            )),
        }
    }
}

/// Deterministic cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives a key from a namespace and a set of `(name, value)` dimensions.
    ///
    /// The order in which dimensions are supplied does not matter. With no
    /// dimensions the key is the bare namespace prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use haven_server::cache::{CacheKey, Namespace};
    ///
    /// let a = CacheKey::derive(&Namespace::List, [("city", "Austin"), ("minPrice", "200000")]);
    /// let b = CacheKey::derive(&Namespace::List, [("minPrice", "200000"), ("city", "Austin")]);
    /// assert_eq!(a, b);
    ///
    /// let empty = CacheKey::derive(&Namespace::List, Vec::<(&str, &str)>::new());
    /// assert_eq!(empty.as_str(), "listings:list");
    /// ```
    pub fn derive<N, V>(namespace: &Namespace, dimensions: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut rendered: Vec<(String, String)> = dimensions
            .into_iter()
            .map(|(name, value)| {
                (
                    urlencoding::encode(name.as_ref()).into_owned(),
                    urlencoding::encode(value.as_ref()).into_owned(),
                )
            })
            .collect();

        let prefix = namespace.prefix();
        if rendered.is_empty() {
            return Self(prefix);
        }

        rendered.sort();
        let joined = rendered
            .iter()
            .map(|(name, value)| format!("{}:{}", name, value))
            .collect::<Vec<_>>()
            .join(&DIMENSION_SEPARATOR.to_string());

        Self(format!("{}:{}", prefix, urlencoding::encode(&joined)))
    }

    /// Key for a resolved list query (filters, page and sort).
    pub fn list(query: &ListingQuery) -> Self {
        Self::derive(&Namespace::List, query.dimensions())
    }

    /// Key for a single listing.
    pub fn record(id: ListingId) -> Self {
        Self::derive(&Namespace::Record, [("id", id.to_string())])
    }

    /// Key for one page of an owner's listings.
    pub fn owner(owner: OwnerId, pagination: &Pagination, sort: &SortSpec) -> Self {
        let mut dimensions = pagination.dimensions();
        dimensions.extend(sort.dimensions());
        Self::derive(&Namespace::Owner(owner), dimensions)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::RawParams;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn list_key(pairs: &[(&str, &str)]) -> CacheKey {
        let params = RawParams::from_pairs(pairs.iter().copied());
        CacheKey::list(&ListingQuery::from_params(&params).unwrap())
    }

    #[test]
    fn test_parameter_order_does_not_matter() {
        let a = list_key(&[("city", "Austin"), ("minPrice", "200000")]);
        let b = list_key(&[("minPrice", "200000"), ("city", "Austin")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_defaults_are_folded_in() {
        let explicit = list_key(&[
            ("page", "1"),
            ("limit", "10"),
            ("sortBy", "createdAt"),
            ("sortOrder", "desc"),
        ]);
        assert_eq!(list_key(&[]), explicit);
    }

    #[test]
    fn test_distinct_filters_distinct_keys() {
        let austin = list_key(&[("city", "Austin")]);
        let dallas = list_key(&[("city", "Dallas")]);
        let state = list_key(&[("state", "Austin")]);
        assert_ne!(austin, dallas);
        assert_ne!(austin, state);
    }

    #[test]
    fn test_separator_in_value_cannot_forge_dimensions() {
        let forged = CacheKey::derive(&Namespace::List, [("city", "a|state:b")]);
        let real = CacheKey::derive(&Namespace::List, [("city", "a"), ("state", "b")]);
        assert_ne!(forged, real);
    }

    #[test]
    fn test_key_has_no_delimiters_after_namespace() {
        let key = list_key(&[("city", "San Antonio|*:?")]);
        let tail = key
            .as_str()
            .strip_prefix("listings:list:")
            .expect("list prefix");
        assert!(!tail.contains(':'));
        assert!(!tail.contains('|'));
        assert!(!tail.contains('*'));
    }

    #[test]
    fn test_namespace_prefixes() {
        let owner = OwnerId::generate();
        let record = CacheKey::record(ListingId::generate());
        let owned = CacheKey::owner(owner, &Pagination::default(), &SortSpec::default());

        assert!(record.starts_with(&Namespace::Record.prefix()));
        assert!(owned.starts_with(&Namespace::Owner(owner).prefix()));
        assert!(owned.starts_with(&NamespaceKind::Owner.prefix()));
        assert!(!owned.starts_with(&Namespace::Owner(OwnerId::generate()).prefix()));
        assert!(!record.starts_with(&Namespace::List.prefix()));
    }

    #[test]
    fn test_namespace_kind_parsing() {
        assert_eq!("list".parse::<NamespaceKind>().unwrap(), NamespaceKind::List);
        assert_eq!(" Record ".parse::<NamespaceKind>().unwrap(), NamespaceKind::Record);
        assert_eq!("owner".parse::<NamespaceKind>().unwrap(), NamespaceKind::Owner);
        assert!("everything".parse::<NamespaceKind>().is_err());
    }

    fn dimension_set() -> impl Strategy<Value = BTreeMap<String, String>> {
        let names = prop::sample::select(vec![
            "city", "state", "type", "minPrice", "maxPrice", "bedrooms", "page", "sortBy",
        ]);
        prop::collection::btree_map(names.prop_map(String::from), ".{0,12}", 0..6)
    }

    proptest! {
        #[test]
        fn keys_collide_only_for_equal_sets(a in dimension_set(), b in dimension_set()) {
            let ka = CacheKey::derive(&Namespace::List, a.iter());
            let kb = CacheKey::derive(&Namespace::List, b.iter());
            prop_assert_eq!(ka == kb, a == b);
        }

        #[test]
        fn insertion_order_is_irrelevant(set in dimension_set()) {
            let forward = CacheKey::derive(&Namespace::List, set.iter());
            let backward = CacheKey::derive(&Namespace::List, set.iter().rev());
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn resolved_queries_key_deterministically(
            city in "[A-Za-z ]{0,10}",
            price in 0u32..1_000_000,
            page in 0i64..20,
        ) {
            let price = price.to_string();
            let page = page.to_string();
            let (city, price, page) = (city.as_str(), price.as_str(), page.as_str());
            let a = list_key(&[("city", city), ("minPrice", price), ("page", page)]);
            let b = list_key(&[("page", page), ("minPrice", price), ("city", city)]);
            prop_assert_eq!(a, b);
        }
    }
}
