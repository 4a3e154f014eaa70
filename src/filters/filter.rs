use super::operation::Operation;
use super::value::FilterValue;
use crate::client::query::QueryParams;
use crate::error::SearchError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub const PROVINCES: [&str; 11] = [
    "NH", "ZH", "UT", "FR", "GR", "DR", "OV", "GE", "NB", "LB", "ZE",
];

static ZIPCODE_REGEX: OnceLock<Regex> = OnceLock::new();
static DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();

fn zipcode_regex() -> &'static Regex {
    ZIPCODE_REGEX.get_or_init(|| {
        Regex::new(r"^\d{4}([A-Z]{2})?$").expect("zipcode pattern compiles")
    })
}

fn digits_regex() -> &'static Regex {
    DIGITS_REGEX.get_or_init(|| Regex::new(r"^\d+$").expect("digits pattern compiles"))
}

/// Query parameter(s) a filter writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Single(&'static str),
    Range {
        low: &'static str,
        high: &'static str,
    },
}

/// Domain rule a filter value has to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// One of the province codes in [`PROVINCES`].
    Province,
    /// Free text, passed through untouched.
    Open,
    Zipcode,
    /// Integer or a string of digits.
    PositiveNumber { label: &'static str },
    /// Integer bounds for range filters.
    IntegerBounds,
}

/// Named, immutable rule translating a search argument into query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    name: &'static str,
    label: &'static str,
    key: FilterKey,
    rule: ValueRule,
}

impl Filter {
    pub const fn exact(
        name: &'static str,
        label: &'static str,
        key: &'static str,
        rule: ValueRule,
    ) -> Self {
        Self {
            name,
            label,
            key: FilterKey::Single(key),
            rule,
        }
    }

    pub const fn range(
        name: &'static str,
        label: &'static str,
        low: &'static str,
        high: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            key: FilterKey::Range { low, high },
            rule: ValueRule::IntegerBounds,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn key(&self) -> FilterKey {
        self.key
    }

    pub fn rule(&self) -> ValueRule {
        self.rule
    }

    pub fn supports(&self, operation: Operation) -> bool {
        match self.key {
            FilterKey::Single(_) => operation == Operation::Exact,
            FilterKey::Range { .. } => true,
        }
    }

    pub fn supported_operations(&self) -> Vec<Operation> {
        Operation::all()
            .into_iter()
            .filter(|operation| self.supports(*operation))
            .collect()
    }

    /// Resolves `operation` by name, validates `value` and returns the query
    /// parameters it maps to.
    pub fn get_operation(
        &self,
        operation: &str,
        value: &FilterValue,
    ) -> Result<QueryParams, SearchError> {
        let operation = operation
            .parse::<Operation>()
            .ok()
            .filter(|operation| self.supports(*operation))
            .ok_or_else(|| SearchError::OperationNotImplemented {
                operation: operation.to_string(),
                filter: self.to_string(),
            })?;

        self.validate(value, operation)?;
        Ok(self.apply(operation, value))
    }

    pub fn validate(&self, value: &FilterValue, operation: Operation) -> Result<(), SearchError> {
        match self.rule {
            ValueRule::Open => Ok(()),
            ValueRule::Province => match value.as_text() {
                Some(code) if PROVINCES.contains(&code) => Ok(()),
                _ => Err(SearchError::Validation(format!(
                    "Province should be one of {}",
                    PROVINCES.join(", ")
                ))),
            },
            ValueRule::Zipcode => {
                let valid = match value {
                    FilterValue::Text(text) => zipcode_regex().is_match(text),
                    FilterValue::Int(number) => zipcode_regex().is_match(&number.to_string()),
                    FilterValue::List(_) => false,
                };
                if valid {
                    Ok(())
                } else {
                    Err(SearchError::Validation(
                        "Zipcode should be either 4 digits or 4 digits and 2 letters".to_string(),
                    ))
                }
            }
            ValueRule::PositiveNumber { label } => {
                let valid = match value {
                    FilterValue::Int(_) => true,
                    FilterValue::Text(text) => digits_regex().is_match(text),
                    FilterValue::List(_) => false,
                };
                if valid {
                    Ok(())
                } else {
                    Err(SearchError::Validation(format!(
                        "{label} should be a positive number"
                    )))
                }
            }
            ValueRule::IntegerBounds => self.validate_bounds(value, operation),
        }
    }

    fn validate_bounds(&self, value: &FilterValue, operation: Operation) -> Result<(), SearchError> {
        if operation == Operation::Between {
            let is_pair = matches!(
                value.as_list(),
                Some([FilterValue::Int(_), FilterValue::Int(_)])
            );
            if !is_pair {
                return Err(SearchError::Validation(format!(
                    "{} needs a minimum and a maximum",
                    self.label
                )));
            }
        } else if value.as_int().is_none() {
            return Err(SearchError::Validation(format!(
                "{} needs an integer",
                self.label
            )));
        }

        Ok(())
    }

    fn apply(&self, operation: Operation, value: &FilterValue) -> QueryParams {
        let mut params = QueryParams::new();
        match (self.key, operation) {
            (FilterKey::Single(key), _) => {
                params.insert(key, value.clone());
            }
            (FilterKey::Range { low, high }, Operation::Exact) => {
                params.insert(low, value.clone());
                params.insert(high, value.clone());
            }
            (FilterKey::Range { low, high }, Operation::Between) => {
                if let Some([min, max]) = value.as_list() {
                    params.insert(low, min.clone());
                    params.insert(high, max.clone());
                }
            }
            (FilterKey::Range { low, .. }, Operation::Gte) => {
                params.insert(low, value.clone());
            }
            (FilterKey::Range { high, .. }, Operation::Lte) => {
                params.insert(high, value.clone());
            }
        }
        params
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICE: Filter = Filter::range("price", "PriceFilter", "pv", "pt");
    const ZIPCODE: Filter = Filter::exact("zipcode", "ZipcodeFilter", "pc", ValueRule::Zipcode);
    const ROOMS: Filter = Filter::exact(
        "minimum_rooms",
        "MinimumRoomsFilter",
        "ka",
        ValueRule::PositiveNumber {
            label: "Minimum rooms",
        },
    );

    fn pairs(params: &QueryParams) -> Vec<(String, String)> {
        params.to_pairs()
    }

    #[test]
    fn range_between_sets_both_bounds() {
        let params = PRICE
            .get_operation("between", &FilterValue::from([100_000, 200_000]))
            .expect("between accepted");
        assert_eq!(
            pairs(&params),
            vec![
                ("pt".to_string(), "200000".to_string()),
                ("pv".to_string(), "100000".to_string()),
            ]
        );
    }

    #[test]
    fn range_between_requires_exactly_two_integers() {
        for value in [
            FilterValue::from(vec![100_000]),
            FilterValue::from(vec![1, 2, 3]),
            FilterValue::from(vec!["1", "2"]),
            FilterValue::Int(5),
        ] {
            let err = PRICE
                .get_operation("between", &value)
                .expect_err("invalid between rejected");
            assert!(matches!(err, SearchError::Validation(ref msg) if msg.contains("minimum and a maximum")));
        }
    }

    #[test]
    fn range_lower_and_upper_bound_only_touch_one_key() {
        let gte = PRICE
            .get_operation("gte", &FilterValue::Int(100_000))
            .expect("gte accepted");
        assert_eq!(gte.get("pv"), Some(&FilterValue::Int(100_000)));
        assert!(gte.get("pt").is_none());

        let lte = PRICE
            .get_operation("lte", &FilterValue::Int(300_000))
            .expect("lte accepted");
        assert_eq!(lte.get("pt"), Some(&FilterValue::Int(300_000)));
        assert!(lte.get("pv").is_none());
    }

    #[test]
    fn range_exact_requires_integer() {
        let err = PRICE
            .get_operation("exact", &FilterValue::from("cheap"))
            .expect_err("text rejected");
        assert_eq!(err.to_string(), "PriceFilter needs an integer");
    }

    #[test]
    fn exact_only_filters_reject_range_operations() {
        let err = ZIPCODE
            .get_operation("between", &FilterValue::from([1000, 2000]))
            .expect_err("between unsupported");
        assert!(matches!(
            err,
            SearchError::OperationNotImplemented { ref operation, ref filter }
                if operation == "between" && filter == "ZipcodeFilter"
        ));

        let err = PRICE
            .get_operation("validate", &FilterValue::Int(1))
            .expect_err("unknown operation");
        assert!(matches!(err, SearchError::OperationNotImplemented { .. }));
    }

    #[test]
    fn zipcode_match_is_anchored() {
        assert!(ZIPCODE
            .validate(&FilterValue::from("1234AB"), Operation::Exact)
            .is_ok());
        assert!(ZIPCODE
            .validate(&FilterValue::from("1234"), Operation::Exact)
            .is_ok());
        for bad in ["12AB", "1234ab", "1234ABC", "12345"] {
            assert!(
                ZIPCODE.validate(&FilterValue::from(bad), Operation::Exact).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn positive_numbers_accept_digit_strings() {
        assert!(ROOMS.validate(&FilterValue::Int(3), Operation::Exact).is_ok());
        assert!(ROOMS.validate(&FilterValue::from("3"), Operation::Exact).is_ok());
        let err = ROOMS
            .validate(&FilterValue::from("three"), Operation::Exact)
            .expect_err("words rejected");
        assert_eq!(err.to_string(), "Minimum rooms should be a positive number");
    }
}
