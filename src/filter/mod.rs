pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod list_query;
pub mod listing;
pub mod types;

pub use error::FilterError;
pub use filter::Filter;
pub use list_query::{ListQuery, QueryParams};
pub use listing::{Column, FilterDef, Listing, UnknownSort};
pub use types::*;
