use serde::Serialize;
use std::fmt;

/// Raw argument handed to a filter.
///
/// Filters decide for themselves which shapes they accept; range filters want
/// integers (or a pair of them for `between`), text filters want strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Int(i64),
    Text(String),
    List(Vec<FilterValue>),
}

impl FilterValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FilterValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// Strings sent on the wire for this value. Lists yield one entry per
    /// element so the transport can repeat the query key.
    pub fn query_values(&self) -> Vec<String> {
        match self {
            Self::List(values) => values.iter().flat_map(Self::query_values).collect(),
            other => vec![other.to_string()],
        }
    }

    /// Interprets a command-line argument: digits become integers, comma
    /// separated input becomes a list, anything else stays text.
    pub fn parse_cli(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.contains(',') {
            return Self::List(trimmed.split(',').map(Self::parse_cli).collect());
        }

        if !trimmed.is_empty() && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            if let Ok(value) = trimmed.parse::<i64>() {
                return Self::Int(value);
            }
        }

        Self::Text(trimmed.to_string())
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::List(values) => {
                let rendered = values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                f.write_str(&rendered)
            }
        }
    }
}

macro_rules! int_conversions {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

int_conversions!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<[T; 2]> for FilterValue {
    fn from(values: [T; 2]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cli_detects_integers_lists_and_text() {
        assert_eq!(FilterValue::parse_cli("150000"), FilterValue::Int(150_000));
        assert_eq!(
            FilterValue::parse_cli("100000, 200000"),
            FilterValue::List(vec![FilterValue::Int(100_000), FilterValue::Int(200_000)])
        );
        assert_eq!(
            FilterValue::parse_cli("1234AB"),
            FilterValue::Text("1234AB".to_string())
        );
        assert_eq!(FilterValue::parse_cli(""), FilterValue::Text(String::new()));
    }

    #[test]
    fn list_values_repeat_on_the_wire() {
        let value = FilterValue::from(vec!["Amsterdam", "Haarlem"]);
        assert_eq!(value.query_values(), vec!["Amsterdam", "Haarlem"]);
        assert_eq!(value.to_string(), "Amsterdam,Haarlem");
        assert_eq!(FilterValue::from(42u32).query_values(), vec!["42"]);
    }
}
