//! Client for the Huizenzoeker real-estate listings API.
//!
//! Keyword-style search filters (`price__between`, `zipcode`, `province`, ...)
//! are validated against a fixed filter registry and translated into the
//! query parameters the remote endpoint expects.

pub mod client;
pub mod config;
pub mod error;
pub mod filters;
pub mod telemetry;

pub use client::{Entry, Huizenzoeker, ObjectType, SearchQuery};
pub use error::SearchError;
pub use filters::{FilterRegistry, FilterValue, Operation};
