//! Data structures for tabular cleaning.

mod table;
mod value;

pub use table::Table;
pub use value::{is_missing_token, parse_timestamp, Value, MISSING_TOKENS};
