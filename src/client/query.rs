use crate::error::SearchError;
use crate::filters::{FilterRegistry, FilterValue, Operation};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

const ORDER_TRANSLATION: &[(&str, &str)] = &[
    ("new", "nr"),
    ("construction_date", "bj"),
    ("living_area", "wov"),
    ("plot_area", "pov"),
    ("price", "pv"),
    ("distance", "strl"),
];

const DEFAULT_ORDER_CODE: &str = "nr";
const OPERATION_SEPARATOR: &str = "__";

/// Kind of listing being searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Sale,
    Rent,
}

impl ObjectType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Sale, Self::Rent]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Rent => "rent",
        }
    }

    /// Value of the `get` parameter.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sale => "koop",
            Self::Rent => "huur",
        }
    }

    pub fn parse(value: &str) -> Result<Self, SearchError> {
        Self::ordered()
            .into_iter()
            .find(|object_type| object_type.as_str() == value)
            .ok_or_else(|| {
                let options = Self::ordered()
                    .iter()
                    .map(|object_type| object_type.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                SearchError::Validation(format!(
                    "Object type \"{value}\" is not one of {options}"
                ))
            })
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request parameters keyed by name. Later inserts overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, FilterValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn extend(&mut self, other: QueryParams) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Flattens into wire pairs; list values repeat their key.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .flat_map(|(key, value)| {
                value
                    .query_values()
                    .into_iter()
                    .map(move |rendered| (key.clone(), rendered))
            })
            .collect()
    }
}

/// Caller-built search: optional ordering plus `filter[__operation]` arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    order_by: Option<String>,
    filters: Vec<(String, FilterValue)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders by `field`; a leading `-` sorts descending.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn filter(mut self, argument: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.push((argument.into(), value.into()));
        self
    }

    pub fn ordering(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn filters(&self) -> &[(String, FilterValue)] {
        &self.filters
    }
}

/// Translates an ordering field into the `sort` parameter, e.g. `-price` →
/// `pv-d`. Unknown or missing fields fall back to `nr`.
pub fn sort_parameter(order_by: Option<&str>) -> String {
    let order = order_by.unwrap_or_default();
    let suffix = if order.starts_with('-') { "-d" } else { "-a" };
    let field = order.trim_matches('-');
    let code = ORDER_TRANSLATION
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT_ORDER_CODE);
    format!("{code}{suffix}")
}

/// Splits `plot_area__between` into `("plot_area", "between")`. The filter
/// name is the first segment and the operation the last; segments in between
/// are ignored, so `price__lte__gte` reads as `("price", "gte")`.
pub fn split_argument(argument: &str) -> (&str, &str) {
    match (
        argument.split_once(OPERATION_SEPARATOR),
        argument.rsplit_once(OPERATION_SEPARATOR),
    ) {
        (Some((name, _)), Some((_, operation))) => (name, operation),
        _ => (argument, Operation::Exact.as_str()),
    }
}

/// Resolves every filter argument against the registry and merges the
/// results with the `sort` and `get` parameters. Fails on the first bad
/// argument.
pub fn build_params(object_type: &str, query: &SearchQuery) -> Result<QueryParams, SearchError> {
    let mut params = QueryParams::new();
    params.insert("sort", sort_parameter(query.ordering()));
    params.insert("get", ObjectType::parse(object_type)?.code());

    let registry = FilterRegistry::global();
    for (argument, value) in query.filters() {
        let (name, operation) = split_argument(argument);
        let filter = registry.get(name)?;
        let resolved = filter.get_operation(operation, value)?;
        debug!(filter = name, operation, parameters = resolved.len(), "resolved search filter");
        params.extend(resolved);
    }

    Ok(params)
}
