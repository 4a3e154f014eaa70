mod filter;
mod operation;
mod registry;
mod value;

pub use filter::{Filter, FilterKey, ValueRule, PROVINCES};
pub use operation::{Operation, UnknownOperation};
pub use registry::FilterRegistry;
pub use value::FilterValue;
