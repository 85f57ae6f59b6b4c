// Operation-string front end, staged: splitter -> loose parser -> coercer

mod coerce;
mod loose;
mod splitter;

pub use coerce::{coerce, json_to_bson};
pub use loose::parse_args;
pub use splitter::{Call, split};
