use std::fmt;
use std::str::FromStr;

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Exact,
    Between,
    Gte,
    Lte,
}

impl Operation {
    pub const fn all() -> [Self; 4] {
        [Self::Exact, Self::Between, Self::Gte, Self::Lte]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Between => "between",
            Self::Gte => "gte",
            Self::Lte => "lte",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|operation| operation.as_str() == value)
            .ok_or_else(|| UnknownOperation(value.to_string()))
    }
}
