//! CLI command implementations.

pub mod search;

pub use search::{parse_param, SearchCommand};
