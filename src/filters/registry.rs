use super::filter::{Filter, ValueRule};
use crate::error::SearchError;
use std::collections::HashMap;
use std::sync::OnceLock;

static FILTER_REGISTRY: OnceLock<FilterRegistry> = OnceLock::new();

const DECLARED_FILTERS: &[Filter] = &[
    Filter::exact("province", "ProvinceFilter", "provincie", ValueRule::Province),
    Filter::exact("county", "CountyFilter", "gemeente", ValueRule::Open),
    Filter::exact("city", "CityFilter", "plaats", ValueRule::Open),
    Filter::exact("neighborhood", "NeighborhoodFilter", "wijk", ValueRule::Open),
    Filter::exact("zipcode", "ZipcodeFilter", "pc", ValueRule::Zipcode),
    Filter::exact(
        "minimum_rooms",
        "MinimumRoomsFilter",
        "ka",
        ValueRule::PositiveNumber {
            label: "Minimum rooms",
        },
    ),
    Filter::exact(
        "days_published",
        "DaysPublishedFilter",
        "anbd",
        ValueRule::PositiveNumber {
            label: "Days published",
        },
    ),
    Filter::range("price", "PriceFilter", "pv", "pt"),
    Filter::range("living_area", "LivingAreaFilter", "wov", "wot"),
    Filter::range("plot", "PlotAreaFilter", "pov", "pot"),
    // Same keys as `plot`, named after the `plot_area` ordering field.
    Filter::range("plot_area", "PlotAreaFilter", "pov", "pot"),
    Filter::range("construction_date", "ConstructionDateFilter", "bjv", "bjt"),
];

/// Name → filter table. Populated once, read-only afterwards.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    filters: HashMap<&'static str, Filter>,
    order: Vec<&'static str>,
}

impl FilterRegistry {
    /// Registry holding every declared filter, built on first use.
    pub fn global() -> &'static FilterRegistry {
        FILTER_REGISTRY.get_or_init(|| {
            let mut registry = FilterRegistry::default();
            for filter in DECLARED_FILTERS {
                registry.register(*filter);
            }
            registry
        })
    }

    /// Adds `filter` unless its name is taken. The first registration wins;
    /// returns whether the filter was added.
    pub fn register(&mut self, filter: Filter) -> bool {
        if self.filters.contains_key(filter.name()) {
            return false;
        }
        self.order.push(filter.name());
        self.filters.insert(filter.name(), filter);
        true
    }

    pub fn get(&self, name: &str) -> Result<&Filter, SearchError> {
        self.filters
            .get(name)
            .ok_or_else(|| SearchError::FilterDoesNotExist {
                name: name.to_string(),
                available: self.names().into_iter().map(str::to_string).collect(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = self.order.clone();
        names.sort_unstable();
        names
    }

    /// Filters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Filter> + '_ {
        self.order.iter().filter_map(|name| self.filters.get(name))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
